//! Handlers for the `/event-types` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::types::DbId;
use sacristy_db::models::event_type::{
    CreateEventType, EventType, UpdateEventType, VALID_SYSTEM_TYPES,
};
use sacristy_db::models::field_definition::FieldDefinition;
use sacristy_db::models::script::Script;
use sacristy_db::repositories::{EventTypeRepo, FieldDefinitionRepo, ScriptRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// An event type together with its field definitions and scripts.
#[derive(Debug, Serialize)]
pub struct EventTypeDetail {
    #[serde(flatten)]
    pub event_type: EventType,
    pub input_field_definitions: Vec<FieldDefinition>,
    pub scripts: Vec<Script>,
}

/// Verify that an event type exists in the parish, returning the full row.
pub(crate) async fn ensure_event_type_exists(
    pool: &sqlx::PgPool,
    parish_id: DbId,
    id: DbId,
) -> AppResult<EventType> {
    EventTypeRepo::find_by_id(pool, parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventType",
            id,
        }))
}

fn validate_system_type(system_type: &str) -> AppResult<()> {
    if VALID_SYSTEM_TYPES.contains(&system_type) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid system type '{system_type}'. Must be one of: {}",
            VALID_SYSTEM_TYPES.join(", ")
        ))))
    }
}

// ---------------------------------------------------------------------------
// GET /event-types
// ---------------------------------------------------------------------------

/// List the parish's event types in sidebar order.
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = EventTypeRepo::list(&state.pool, auth.parish_id).await?;
    tracing::debug!(count = items.len(), "Listed event types");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /event-types
// ---------------------------------------------------------------------------

/// Create a new event type.
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEventType>,
) -> AppResult<impl IntoResponse> {
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Event type name must not be empty".into(),
        )));
    }
    if let Some(ref system_type) = input.system_type {
        validate_system_type(system_type)?;
    }

    let created = EventTypeRepo::create(&state.pool, auth.parish_id, &input).await?;
    tracing::info!(id = %created.id, name = %created.name, "Event type created");
    state.invalidations.publish("/settings/event-types");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /event-types/{id}
// ---------------------------------------------------------------------------

/// Get an event type with its field definitions and scripts.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event_type = ensure_event_type_exists(&state.pool, auth.parish_id, id).await?;
    let input_field_definitions =
        FieldDefinitionRepo::list_for_event_type(&state.pool, event_type.id).await?;
    let scripts = ScriptRepo::list_for_event_type(&state.pool, event_type.id).await?;

    Ok(Json(DataResponse {
        data: EventTypeDetail {
            event_type,
            input_field_definitions,
            scripts,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /event-types/{id}
// ---------------------------------------------------------------------------

/// Update an event type.
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventType>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref system_type) = input.system_type {
        validate_system_type(system_type)?;
    }

    let updated = EventTypeRepo::update(&state.pool, auth.parish_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventType",
            id,
        }))?;
    tracing::info!(id = %updated.id, "Event type updated");
    state.invalidations.publish("/settings/event-types");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /event-types/{id}
// ---------------------------------------------------------------------------

/// Soft-delete an event type.
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EventTypeRepo::soft_delete(&state.pool, auth.parish_id, id).await?;
    if deleted {
        tracing::info!(%id, "Event type deleted");
        state.invalidations.publish("/settings/event-types");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "EventType",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// GET /event-types/{id}/fields
// ---------------------------------------------------------------------------

/// List an event type's field definitions in display order.
pub async fn list_fields(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_event_type_exists(&state.pool, auth.parish_id, id).await?;
    let items = FieldDefinitionRepo::list_for_event_type(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /event-types/{id}/scripts
// ---------------------------------------------------------------------------

/// List an event type's scripts in display order.
pub async fn list_scripts(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_event_type_exists(&state.pool, auth.parish_id, id).await?;
    let items = ScriptRepo::list_for_event_type(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}
