//! Handlers for the `/events` resource (master events, assignments, and
//! script rendering).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::fields::FieldValues;
use sacristy_core::placeholders;
use sacristy_core::types::DbId;
use sacristy_db::models::assignment::CreateAssignment;
use sacristy_db::models::master_event::{
    CreateMasterEvent, UpdateMasterEvent, VALID_STATUSES,
};
use sacristy_db::repositories::master_event_repo::MasterEventFilter;
use sacristy_db::repositories::{
    AssignmentRepo, FieldDefinitionRepo, MasterEventRepo, ScriptRepo,
};
use sacristy_db::resolver;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::event_types::ensure_event_type_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub event_type_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /events/{id}/assignments`.
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub person_id: DbId,
    pub field_definition_id: DbId,
    pub notes: Option<String>,
}

/// One section of a script with its placeholders substituted.
#[derive(Debug, Serialize)]
pub struct RenderedSection {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub page_break_after: bool,
}

fn validate_status(status: &str) -> AppResult<()> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))))
    }
}

/// Reject `field_values` keys that no definition of the event type backs.
async fn validate_field_values(
    pool: &sqlx::PgPool,
    event_type_id: DbId,
    values: &FieldValues,
) -> AppResult<()> {
    let definitions = FieldDefinitionRepo::list_for_event_type(pool, event_type_id).await?;
    values
        .validate_keys(definitions.iter().map(|d| d.property_name.as_str()))
        .map_err(AppError::Core)
}

fn invalidate_event(state: &AppState, id: DbId) {
    state.invalidations.publish("/events");
    state.invalidations.publish(&format!("/events/{id}"));
}

// ---------------------------------------------------------------------------
// GET /events
// ---------------------------------------------------------------------------

/// List the parish's events, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        validate_status(status)?;
    }
    let filter = MasterEventFilter {
        event_type_id: params.event_type_id,
        system_type: None,
        status: params.status.clone(),
        limit: params.limit.unwrap_or(50).min(200),
        offset: params.offset.unwrap_or(0).max(0),
    };
    let items = MasterEventRepo::list(&state.pool, auth.parish_id, &filter).await?;
    tracing::debug!(count = items.len(), "Listed events");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /events
// ---------------------------------------------------------------------------

/// Create a new master event.
pub async fn create(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateMasterEvent>,
) -> AppResult<impl IntoResponse> {
    ensure_event_type_exists(&state.pool, auth.parish_id, input.event_type_id).await?;
    if let Some(ref status) = input.status {
        validate_status(status)?;
    }
    if let Some(ref values) = input.field_values {
        validate_field_values(&state.pool, input.event_type_id, values).await?;
    }

    let created = MasterEventRepo::create(&state.pool, auth.parish_id, &input).await?;
    tracing::info!(id = %created.id, "Event created");
    invalidate_event(&state, created.id);
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /events/{id}
// ---------------------------------------------------------------------------

/// Get an event with its schema, satellites, and resolved field map.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let loaded = resolver::load_event_with_relations(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;
    Ok(Json(DataResponse { data: loaded }))
}

// ---------------------------------------------------------------------------
// PUT /events/{id}
// ---------------------------------------------------------------------------

/// Update an event's field values and/or status. Last write wins.
pub async fn update(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMasterEvent>,
) -> AppResult<impl IntoResponse> {
    let existing = MasterEventRepo::find_by_id(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;

    if let Some(ref status) = input.status {
        validate_status(status)?;
    }
    if let Some(ref values) = input.field_values {
        validate_field_values(&state.pool, existing.event_type_id, values).await?;
    }

    let updated = MasterEventRepo::update(&state.pool, auth.parish_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;
    tracing::info!(%id, "Event updated");
    invalidate_event(&state, id);
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /events/{id}
// ---------------------------------------------------------------------------

/// Soft-delete an event.
pub async fn delete(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MasterEventRepo::soft_delete(&state.pool, auth.parish_id, id).await?;
    if deleted {
        tracing::info!(%id, "Event deleted");
        invalidate_event(&state, id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// POST /events/{id}/assignments
// ---------------------------------------------------------------------------

/// Assign a person to a named role on an event.
pub async fn create_assignment(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAssignmentRequest>,
) -> AppResult<impl IntoResponse> {
    MasterEventRepo::find_by_id(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;

    let input = CreateAssignment {
        master_event_id: id,
        person_id: input.person_id,
        field_definition_id: input.field_definition_id,
        notes: input.notes,
    };
    let created = AssignmentRepo::create(&state.pool, auth.parish_id, &input).await?;
    tracing::info!(event_id = %id, person_id = %created.person_id, "Assignment created");
    invalidate_event(&state, id);
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// DELETE /events/assignments/{id}
// ---------------------------------------------------------------------------

/// Remove (soft-delete) one assignment.
pub async fn delete_assignment(
    RequireStaff(_auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = AssignmentRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        state.invalidations.publish("/events");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// GET /events/{id}/scripts/{script_id}/render
// ---------------------------------------------------------------------------

/// Render a script for an event: every section's placeholders are
/// substituted from the event's resolved field map, with human-label keys
/// translated through the event type's placeholder key map.
pub async fn render_script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, script_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let event = resolver::load_event_with_relations(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;

    let script = ScriptRepo::find_by_id(&state.pool, script_id)
        .await?
        .filter(|s| s.event_type_id == event.event_type.id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Script",
            id: script_id,
        }))?;
    let sections = ScriptRepo::list_sections(&state.pool, script.id).await?;

    let keymap = resolver::keymap(&event.field_definitions);
    let rendered: Vec<RenderedSection> = sections
        .into_iter()
        .map(|section| {
            let content = placeholders::render_template(
                &section.content,
                &event.resolved_fields,
                &keymap,
                event.parish.as_ref(),
            );
            RenderedSection {
                id: section.id,
                name: section.name,
                content,
                page_break_after: section.page_break_after,
            }
        })
        .collect();

    tracing::debug!(event_id = %id, script_id = %script.id, sections = rendered.len(), "Script rendered");
    Ok(Json(DataResponse { data: rendered }))
}
