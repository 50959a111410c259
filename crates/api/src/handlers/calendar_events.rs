//! Handlers for the `/calendar-events` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::types::DbId;
use sacristy_db::models::calendar_event::{
    CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent,
};
use sacristy_db::repositories::{CalendarEventRepo, MasterEventRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a calendar event and verify it belongs to the parish.
async fn ensure_in_parish(
    pool: &sqlx::PgPool,
    parish_id: DbId,
    id: DbId,
) -> AppResult<CalendarEvent> {
    CalendarEventRepo::find_by_id(pool, id)
        .await?
        .filter(|ce| ce.parish_id == parish_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))
}

// ---------------------------------------------------------------------------
// POST /calendar-events
// ---------------------------------------------------------------------------

/// Add a calendar slot to a master event.
pub async fn create(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateCalendarEvent>,
) -> AppResult<impl IntoResponse> {
    MasterEventRepo::find_by_id(&state.pool, auth.parish_id, input.master_event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id: input.master_event_id,
        }))?;

    let created = CalendarEventRepo::create(&state.pool, auth.parish_id, &input).await?;
    tracing::info!(id = %created.id, event_id = %created.master_event_id, "Calendar event created");
    state.invalidations.publish("/calendar");
    state
        .invalidations
        .publish(&format!("/events/{}", created.master_event_id));
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /calendar-events/{id}
// ---------------------------------------------------------------------------

/// Update a calendar slot.
pub async fn update(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCalendarEvent>,
) -> AppResult<impl IntoResponse> {
    ensure_in_parish(&state.pool, auth.parish_id, id).await?;

    let updated = CalendarEventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))?;
    tracing::info!(%id, "Calendar event updated");
    state.invalidations.publish("/calendar");
    state
        .invalidations
        .publish(&format!("/events/{}", updated.master_event_id));
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /calendar-events/{id}
// ---------------------------------------------------------------------------

/// Soft-delete a calendar slot.
pub async fn delete(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ensure_in_parish(&state.pool, auth.parish_id, id).await?;

    CalendarEventRepo::soft_delete(&state.pool, id).await?;
    tracing::info!(%id, "Calendar event deleted");
    state.invalidations.publish("/calendar");
    state
        .invalidations
        .publish(&format!("/events/{}", existing.master_event_id));
    Ok(StatusCode::NO_CONTENT)
}
