//! Script routes -- mounted at `/scripts`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scripts::create))
        .route("/reorder", post(scripts::reorder))
        .route(
            "/{id}",
            get(scripts::get).put(scripts::update).delete(scripts::delete),
        )
        .route("/{id}/sections", post(scripts::create_section))
        .route(
            "/sections/{id}",
            put(scripts::update_section).delete(scripts::delete_section),
        )
}
