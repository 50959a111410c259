//! Handlers for the `/masses` resource: the mass-liturgy list view with
//! joined names, stats, and mass intention linking.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sacristy_core::error::CoreError;
use sacristy_core::fields::FieldValues;
use sacristy_core::types::{DbId, Timestamp};
use sacristy_db::models::event_type::SYSTEM_TYPE_MASS_LITURGY;
use sacristy_db::models::master_event::{
    CreateMasterEvent, MasterEventWithNames, VALID_STATUSES,
};
use sacristy_db::repositories::master_event_repo::MasterEventFilter;
use sacristy_db::repositories::{
    AssignmentRepo, CalendarEventRepo, EventTypeRepo, FieldDefinitionRepo, MassIntentionRepo,
    MasterEventRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing masses.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MassListParams {
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub search: Option<String>,
    /// `date_asc`, `date_desc`, `created_asc`, or `created_desc` (default).
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /masses`. The mass-liturgy event type is looked
/// up implicitly.
#[derive(Debug, Deserialize)]
pub struct CreateMassRequest {
    pub field_values: Option<FieldValues>,
    pub status: Option<String>,
}

/// Aggregate counters for the masses dashboard.
#[derive(Debug, Serialize)]
pub struct MassStats {
    pub total: i64,
    pub upcoming: i64,
    pub past: i64,
    pub filtered: i64,
}

/// Load mass rows with their primary slot and presider/homilist names, then
/// apply the post-fetch date/search filters and date sorting.
async fn load_masses(
    state: &AppState,
    parish_id: DbId,
    params: &MassListParams,
) -> AppResult<Vec<MasterEventWithNames>> {
    let filter = MasterEventFilter {
        event_type_id: None,
        system_type: Some(SYSTEM_TYPE_MASS_LITURGY.to_string()),
        status: params.status.clone(),
        limit: params.limit.unwrap_or(50).min(500),
        offset: params.offset.unwrap_or(0).max(0),
    };
    let events = MasterEventRepo::list(&state.pool, parish_id, &filter).await?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_type_names: HashMap<DbId, String> = EventTypeRepo::list(&state.pool, parish_id)
        .await?
        .into_iter()
        .map(|et| (et.id, et.name))
        .collect();

    let ids: Vec<DbId> = events.iter().map(|e| e.id).collect();
    let primary_slots: HashMap<DbId, _> =
        CalendarEventRepo::list_primary_for_events(&state.pool, &ids)
            .await?
            .into_iter()
            .map(|ce| (ce.master_event_id, ce))
            .collect();

    let mut presiders: HashMap<DbId, String> = HashMap::new();
    let mut homilists: HashMap<DbId, String> = HashMap::new();
    for assignment in AssignmentRepo::list_for_events(&state.pool, &ids).await? {
        match assignment.property_name.as_str() {
            "presider" => {
                presiders.insert(assignment.master_event_id, assignment.person_full_name);
            }
            "homilist" => {
                homilists.insert(assignment.master_event_id, assignment.person_full_name);
            }
            _ => {}
        }
    }

    let mut masses: Vec<MasterEventWithNames> = events
        .into_iter()
        .map(|event| MasterEventWithNames {
            event_type_name: event_type_names
                .get(&event.event_type_id)
                .cloned()
                .unwrap_or_default(),
            primary_calendar_event: primary_slots.get(&event.id).cloned(),
            presider_name: presiders.get(&event.id).cloned(),
            homilist_name: homilists.get(&event.id).cloned(),
            event,
        })
        .collect();

    // Date-range filters apply to the primary slot, post-fetch.
    if let Some(start) = params.start_date {
        masses.retain(|m| {
            m.primary_calendar_event
                .as_ref()
                .and_then(|ce| ce.start_datetime)
                .is_some_and(|dt| dt >= start)
        });
    }
    if let Some(end) = params.end_date {
        masses.retain(|m| {
            m.primary_calendar_event
                .as_ref()
                .and_then(|ce| ce.start_datetime)
                .is_some_and(|dt| dt <= end)
        });
    }

    if let Some(ref search) = params.search {
        let term = search.to_lowercase();
        masses.retain(|m| {
            m.presider_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term))
                || m.homilist_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&term))
                || m.event_type_name.to_lowercase().contains(&term)
        });
    }

    match params.sort.as_deref() {
        Some("date_asc") => masses.sort_by_key(|m| {
            m.primary_calendar_event
                .as_ref()
                .and_then(|ce| ce.start_datetime)
        }),
        Some("date_desc") => {
            masses.sort_by_key(|m| {
                std::cmp::Reverse(
                    m.primary_calendar_event
                        .as_ref()
                        .and_then(|ce| ce.start_datetime),
                )
            });
        }
        // created_asc/created_desc are applied at the database level.
        _ => {}
    }

    Ok(masses)
}

// ---------------------------------------------------------------------------
// GET /masses
// ---------------------------------------------------------------------------

/// List the parish's masses with primary slot and role names.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MassListParams>,
) -> AppResult<impl IntoResponse> {
    let masses = load_masses(&state, auth.parish_id, &params).await?;
    tracing::debug!(count = masses.len(), "Listed masses");
    Ok(Json(DataResponse { data: masses }))
}

// ---------------------------------------------------------------------------
// POST /masses
// ---------------------------------------------------------------------------

/// Create a new mass under the parish's mass-liturgy event type.
pub async fn create(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateMassRequest>,
) -> AppResult<impl IntoResponse> {
    let event_type =
        EventTypeRepo::find_by_system_type(&state.pool, auth.parish_id, SYSTEM_TYPE_MASS_LITURGY)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "No mass event type configured for this parish".into(),
                ))
            })?;

    if let Some(ref status) = input.status {
        if !VALID_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid status '{status}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))));
        }
    }
    if let Some(ref values) = input.field_values {
        let definitions =
            FieldDefinitionRepo::list_for_event_type(&state.pool, event_type.id).await?;
        values
            .validate_keys(definitions.iter().map(|d| d.property_name.as_str()))
            .map_err(AppError::Core)?;
    }

    let created = MasterEventRepo::create(
        &state.pool,
        auth.parish_id,
        &CreateMasterEvent {
            event_type_id: event_type.id,
            field_values: input.field_values,
            status: input.status,
        },
    )
    .await?;
    tracing::info!(id = %created.id, "Mass created");
    state.invalidations.publish("/masses");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /masses/stats
// ---------------------------------------------------------------------------

/// Aggregate counters for the masses dashboard.
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MassListParams>,
) -> AppResult<impl IntoResponse> {
    let total =
        MasterEventRepo::count(&state.pool, auth.parish_id, Some(SYSTEM_TYPE_MASS_LITURGY)).await?;

    // Upcoming/past are judged by the primary slot across all masses.
    let all = load_masses(
        &state,
        auth.parish_id,
        &MassListParams {
            limit: Some(500),
            ..Default::default()
        },
    )
    .await?;
    let now = chrono::Utc::now();
    let upcoming = all
        .iter()
        .filter(|m| {
            m.primary_calendar_event
                .as_ref()
                .and_then(|ce| ce.start_datetime)
                .is_some_and(|dt| dt >= now)
        })
        .count() as i64;
    let past = all
        .iter()
        .filter(|m| {
            m.primary_calendar_event
                .as_ref()
                .and_then(|ce| ce.start_datetime)
                .is_some_and(|dt| dt < now)
        })
        .count() as i64;

    let filtered = load_masses(&state, auth.parish_id, &params).await?.len() as i64;

    Ok(Json(DataResponse {
        data: MassStats {
            total,
            upcoming,
            past,
            filtered,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /masses/{id}/intention/{intention_id}
// ---------------------------------------------------------------------------

/// Link a mass intention to a mass.
pub async fn link_intention(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path((id, intention_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    MasterEventRepo::find_by_id(&state.pool, auth.parish_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterEvent",
            id,
        }))?;

    let linked = MassIntentionRepo::link(&state.pool, auth.parish_id, intention_id, id).await?;
    if !linked {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MassIntention",
            id: intention_id,
        }));
    }

    tracing::info!(mass_id = %id, intention_id = %intention_id, "Mass intention linked");
    state.invalidations.publish("/masses");
    state.invalidations.publish(&format!("/masses/{id}"));
    state.invalidations.publish("/mass-intentions");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// DELETE /masses/intentions/{intention_id}
// ---------------------------------------------------------------------------

/// Unlink a mass intention from whatever mass it is attached to.
pub async fn unlink_intention(
    RequireStaff(auth): RequireStaff,
    State(state): State<AppState>,
    Path(intention_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let intention = MassIntentionRepo::find_by_id(&state.pool, auth.parish_id, intention_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MassIntention",
            id: intention_id,
        }))?;

    MassIntentionRepo::unlink(&state.pool, auth.parish_id, intention_id).await?;

    tracing::info!(intention_id = %intention_id, "Mass intention unlinked");
    if let Some(mass_id) = intention.master_event_id {
        state.invalidations.publish("/masses");
        state.invalidations.publish(&format!("/masses/{mass_id}"));
    }
    state.invalidations.publish("/mass-intentions");
    Ok(StatusCode::NO_CONTENT)
}
