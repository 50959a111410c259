//! Field definition routes -- mounted at `/field-definitions`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::field_definitions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(field_definitions::create))
        .route("/reorder", post(field_definitions::reorder))
        .route(
            "/{id}",
            get(field_definitions::get)
                .put(field_definitions::update)
                .delete(field_definitions::delete),
        )
        .route("/{id}/usage", get(field_definitions::usage))
}
