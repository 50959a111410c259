pub mod auth;
pub mod calendar_events;
pub mod event_types;
pub mod field_definitions;
pub mod health;
pub mod masses;
pub mod master_events;
pub mod presets;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/me                                     profile (requires auth)
///
/// /event-types                                 list, create
/// /event-types/{id}                            get, update, delete
/// /event-types/{id}/fields                     list field definitions
/// /event-types/{id}/scripts                    list scripts
///
/// /field-definitions                           create
/// /field-definitions/reorder                   reorder
/// /field-definitions/{id}                      get, update, delete
/// /field-definitions/{id}/usage                usage counts
///
/// /events                                      list, create
/// /events/{id}                                 get (with relations), update, delete
/// /events/{id}/assignments                     assign person to role
/// /events/assignments/{id}                     remove assignment
/// /events/{id}/scripts/{script_id}/render      render script for event
///
/// /masses                                      list with names
/// /masses/stats                                dashboard counters
/// /masses/{id}/intention/{intention_id}        link intention
/// /masses/intentions/{intention_id}            unlink intention
///
/// /calendar-events                             create
/// /calendar-events/{id}                        update, delete
///
/// /scripts                                     create
/// /scripts/reorder                             reorder
/// /scripts/{id}                                get (with sections), update, delete
/// /scripts/{id}/sections                       add section
/// /scripts/sections/{id}                       update, delete section
///
/// /presets                                     list
/// /presets/from-event                          snapshot event into preset
/// /presets/{id}                                get, relabel, delete
/// /presets/{id}/apply                          seed new event from preset
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/event-types", event_types::router())
        .nest("/field-definitions", field_definitions::router())
        .nest("/events", master_events::router())
        .nest("/masses", masses::router())
        .nest("/calendar-events", calendar_events::router())
        .nest("/scripts", scripts::router())
        .nest("/presets", presets::router())
}
