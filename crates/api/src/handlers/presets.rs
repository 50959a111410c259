//! Handlers for the `/presets` resource.
//!
//! Presets are immutable snapshots: only creation from a live event,
//! relabeling, soft deletion, and application are exposed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::types::DbId;
use sacristy_db::models::event_preset::UpdateEventPreset;
use sacristy_db::presets;
use sacristy_db::repositories::EventPresetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing presets.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub event_type_id: Option<DbId>,
}

/// Request body for `POST /presets/from-event`.
#[derive(Debug, Deserialize)]
pub struct CreateFromEventRequest {
    pub master_event_id: DbId,
    pub name: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /presets
// ---------------------------------------------------------------------------

/// List the parish's presets, newest first. With `event_type_id`, restricts
/// to that event type.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let response = match params.event_type_id {
        Some(event_type_id) => {
            let items =
                EventPresetRepo::list_for_event_type(&state.pool, auth.parish_id, event_type_id)
                    .await?;
            Json(DataResponse { data: items }).into_response()
        }
        None => {
            let items = EventPresetRepo::list(&state.pool, auth.parish_id).await?;
            Json(DataResponse { data: items }).into_response()
        }
    };
    Ok(response)
}

// ---------------------------------------------------------------------------
// POST /presets/from-event
// ---------------------------------------------------------------------------

/// Snapshot a live event into a new preset.
pub async fn create_from_event(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateFromEventRequest>,
) -> AppResult<impl IntoResponse> {
    let created = presets::create_from_event(
        &state.pool,
        auth.parish_id,
        input.master_event_id,
        &input.name,
        input.description.as_deref(),
        Some(auth.user_id),
    )
    .await?;

    state
        .invalidations
        .publish(&format!("/events/{}", created.event_type_id));
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /presets/{id}
// ---------------------------------------------------------------------------

/// Get a single preset.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let preset = EventPresetRepo::find_by_id(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventPreset",
            id,
        }))?;
    Ok(Json(DataResponse { data: preset }))
}

// ---------------------------------------------------------------------------
// PUT /presets/{id}
// ---------------------------------------------------------------------------

/// Relabel a preset. `preset_data` cannot be modified.
pub async fn update(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEventPreset>,
) -> AppResult<impl IntoResponse> {
    let updated = presets::relabel(&state.pool, auth.parish_id, id, &input).await?;
    tracing::info!(%id, "Preset updated");
    state.invalidations.publish("/events");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /presets/{id}
// ---------------------------------------------------------------------------

/// Soft-delete a preset.
pub async fn delete(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EventPresetRepo::soft_delete(&state.pool, auth.parish_id, id).await?;
    if deleted {
        tracing::info!(%id, "Preset deleted");
        state.invalidations.publish("/events");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "EventPreset",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// POST /presets/{id}/apply
// ---------------------------------------------------------------------------

/// Create a new event seeded from a preset. The caller schedules calendar
/// slots with concrete dates afterwards.
pub async fn apply(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let created = presets::apply(&state.pool, auth.parish_id, id).await?;
    state.invalidations.publish("/events");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
