//! Mass routes -- mounted at `/masses`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::masses;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(masses::list).post(masses::create))
        .route("/stats", get(masses::stats))
        .route(
            "/{id}/intention/{intention_id}",
            post(masses::link_intention),
        )
        .route(
            "/intentions/{intention_id}",
            delete(masses::unlink_intention),
        )
}
