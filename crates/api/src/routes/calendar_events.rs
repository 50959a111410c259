//! Calendar event routes -- mounted at `/calendar-events`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::calendar_events;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(calendar_events::create))
        .route(
            "/{id}",
            put(calendar_events::update).delete(calendar_events::delete),
        )
}
