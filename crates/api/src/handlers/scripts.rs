//! Handlers for the `/scripts` resource (scripts and their sections).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::types::DbId;
use sacristy_db::models::script::{
    CreateScript, CreateSection, Script, ScriptWithSections, UpdateScript, UpdateSection,
};
use sacristy_db::repositories::ScriptRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::event_types::ensure_event_type_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /scripts/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub event_type_id: DbId,
    pub ordered_ids: Vec<DbId>,
}

/// Load a script and verify its event type belongs to the parish.
async fn ensure_script_in_parish(
    pool: &sqlx::PgPool,
    parish_id: DbId,
    id: DbId,
) -> AppResult<Script> {
    let script = ScriptRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Script",
            id,
        }))?;
    ensure_event_type_exists(pool, parish_id, script.event_type_id).await?;
    Ok(script)
}

fn invalidate_scripts(state: &AppState, event_type_id: DbId) {
    state
        .invalidations
        .publish(&format!("/settings/event-types/{event_type_id}"));
    state
        .invalidations
        .publish(&format!("/settings/event-types/{event_type_id}/scripts"));
}

// ---------------------------------------------------------------------------
// POST /scripts
// ---------------------------------------------------------------------------

/// Create a new script for an event type.
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateScript>,
) -> AppResult<impl IntoResponse> {
    ensure_event_type_exists(&state.pool, auth.parish_id, input.event_type_id).await?;
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Script name must not be empty".into(),
        )));
    }

    let created = ScriptRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %created.id, name = %created.name, "Script created");
    invalidate_scripts(&state, created.event_type_id);
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /scripts/{id}
// ---------------------------------------------------------------------------

/// Get a script with its ordered sections.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let script = ensure_script_in_parish(&state.pool, auth.parish_id, id).await?;
    let sections = ScriptRepo::list_sections(&state.pool, script.id).await?;
    Ok(Json(DataResponse {
        data: ScriptWithSections { script, sections },
    }))
}

// ---------------------------------------------------------------------------
// PUT /scripts/{id}
// ---------------------------------------------------------------------------

/// Update a script's name or description.
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScript>,
) -> AppResult<impl IntoResponse> {
    ensure_script_in_parish(&state.pool, auth.parish_id, id).await?;
    if let Some(ref name) = input.name {
        if name.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Script name must not be empty".into(),
            )));
        }
    }

    let updated = ScriptRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Script",
            id,
        }))?;
    tracing::info!(%id, "Script updated");
    invalidate_scripts(&state, updated.event_type_id);
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /scripts/{id}
// ---------------------------------------------------------------------------

/// Hard-delete a script; its sections cascade.
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let script = ensure_script_in_parish(&state.pool, auth.parish_id, id).await?;

    ScriptRepo::delete(&state.pool, id).await?;
    tracing::info!(%id, "Script deleted");
    invalidate_scripts(&state, script.event_type_id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /scripts/reorder
// ---------------------------------------------------------------------------

/// Reorder an event type's scripts to match the given sequence.
/// Best-effort: a failed update is logged and skipped.
pub async fn reorder(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    ensure_event_type_exists(&state.pool, auth.parish_id, input.event_type_id).await?;

    for (index, id) in input.ordered_ids.iter().enumerate() {
        if let Err(err) =
            ScriptRepo::set_order(&state.pool, input.event_type_id, *id, index as i32).await
        {
            tracing::warn!(error = %err, %id, "Failed to reorder script; continuing");
        }
    }
    invalidate_scripts(&state, input.event_type_id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /scripts/{id}/sections
// ---------------------------------------------------------------------------

/// Add a section to a script.
pub async fn create_section(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSection>,
) -> AppResult<impl IntoResponse> {
    let script = ensure_script_in_parish(&state.pool, auth.parish_id, id).await?;
    if input.name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Section name must not be empty".into(),
        )));
    }

    let created = ScriptRepo::create_section(&state.pool, script.id, &input).await?;
    tracing::info!(id = %created.id, script_id = %script.id, "Section created");
    invalidate_scripts(&state, script.event_type_id);
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /scripts/sections/{id}
// ---------------------------------------------------------------------------

/// Update a section.
pub async fn update_section(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSection>,
) -> AppResult<impl IntoResponse> {
    let updated = ScriptRepo::update_section(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id,
        }))?;
    tracing::info!(%id, "Section updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /scripts/sections/{id}
// ---------------------------------------------------------------------------

/// Hard-delete a section.
pub async fn delete_section(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ScriptRepo::delete_section(&state.pool, id).await?;
    if deleted {
        tracing::info!(%id, "Section deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id,
        }))
    }
}
