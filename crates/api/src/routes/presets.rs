//! Preset routes -- mounted at `/presets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::presets;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(presets::list))
        .route("/from-event", post(presets::create_from_event))
        .route(
            "/{id}",
            get(presets::get).put(presets::update).delete(presets::delete),
        )
        .route("/{id}/apply", post(presets::apply))
}
