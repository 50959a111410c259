//! Handlers for the `/field-definitions` resource.
//!
//! Thin HTTP layer over the definition store in `sacristy_db::definitions`,
//! which owns the flag rules, primary uniqueness, and delete guard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::types::DbId;
use sacristy_db::definitions;
use sacristy_db::models::field_definition::{
    CreateFieldDefinition, FieldDefinition, UpdateFieldDefinition,
};
use sacristy_db::repositories::FieldDefinitionRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::event_types::ensure_event_type_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /field-definitions/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub event_type_id: DbId,
    pub ordered_ids: Vec<DbId>,
}

/// Response payload for `GET /field-definitions/{id}/usage`.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub events: i64,
    pub assignments: i64,
    pub calendar_events: i64,
    pub total: i64,
}

/// Load a definition and verify its event type belongs to the parish.
async fn ensure_definition_in_parish(
    pool: &sqlx::PgPool,
    parish_id: DbId,
    id: DbId,
) -> AppResult<FieldDefinition> {
    let def = FieldDefinitionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FieldDefinition",
            id,
        }))?;
    ensure_event_type_exists(pool, parish_id, def.event_type_id).await?;
    Ok(def)
}

fn invalidate_fields(state: &AppState, event_type_id: DbId) {
    state
        .invalidations
        .publish(&format!("/settings/event-types/{event_type_id}"));
    state
        .invalidations
        .publish(&format!("/settings/event-types/{event_type_id}/fields"));
}

// ---------------------------------------------------------------------------
// POST /field-definitions
// ---------------------------------------------------------------------------

/// Create a new field definition for an event type.
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateFieldDefinition>,
) -> AppResult<impl IntoResponse> {
    ensure_event_type_exists(&state.pool, auth.parish_id, input.event_type_id).await?;

    let created = definitions::create(&state.pool, &input).await?;
    invalidate_fields(&state, created.event_type_id);
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /field-definitions/{id}
// ---------------------------------------------------------------------------

/// Get a single field definition.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let def = ensure_definition_in_parish(&state.pool, auth.parish_id, id).await?;
    Ok(Json(DataResponse { data: def }))
}

// ---------------------------------------------------------------------------
// PUT /field-definitions/{id}
// ---------------------------------------------------------------------------

/// Update a field definition.
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFieldDefinition>,
) -> AppResult<impl IntoResponse> {
    ensure_definition_in_parish(&state.pool, auth.parish_id, id).await?;

    let updated = definitions::update(&state.pool, id, &input).await?;
    tracing::info!(%id, "Field definition updated");
    invalidate_fields(&state, updated.event_type_id);
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /field-definitions/{id}/usage
// ---------------------------------------------------------------------------

/// Report how many records still reference a definition.
pub async fn usage(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_definition_in_parish(&state.pool, auth.parish_id, id).await?;

    let counts = definitions::usage(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: UsageResponse {
            events: counts.events,
            assignments: counts.assignments,
            calendar_events: counts.calendar_events,
            total: counts.total(),
        },
    }))
}

// ---------------------------------------------------------------------------
// DELETE /field-definitions/{id}
// ---------------------------------------------------------------------------

/// Delete a field definition. Rejected with 409 while any record still
/// references it.
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let def = ensure_definition_in_parish(&state.pool, auth.parish_id, id).await?;

    definitions::delete(&state.pool, id).await?;
    invalidate_fields(&state, def.event_type_id);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /field-definitions/reorder
// ---------------------------------------------------------------------------

/// Reorder an event type's field definitions to match the given sequence.
pub async fn reorder(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    ensure_event_type_exists(&state.pool, auth.parish_id, input.event_type_id).await?;

    definitions::reorder(&state.pool, input.event_type_id, &input.ordered_ids).await?;
    invalidate_fields(&state, input.event_type_id);
    Ok(StatusCode::NO_CONTENT)
}
