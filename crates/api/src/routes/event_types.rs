//! Event type routes -- mounted at `/event-types`.

use axum::routing::get;
use axum::Router;

use crate::handlers::event_types;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event_types::list).post(event_types::create))
        .route(
            "/{id}",
            get(event_types::get)
                .put(event_types::update)
                .delete(event_types::delete),
        )
        .route("/{id}/fields", get(event_types::list_fields))
        .route("/{id}/scripts", get(event_types::list_scripts))
}
