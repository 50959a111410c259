//! Master event routes -- mounted at `/events`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::master_events;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(master_events::list).post(master_events::create))
        .route(
            "/{id}",
            get(master_events::get)
                .put(master_events::update)
                .delete(master_events::delete),
        )
        .route("/{id}/assignments", post(master_events::create_assignment))
        .route(
            "/assignments/{id}",
            delete(master_events::delete_assignment),
        )
        .route(
            "/{id}/scripts/{script_id}/render",
            get(master_events::render_script),
        )
}
