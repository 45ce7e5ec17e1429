mod dto;
pub mod handlers;
pub mod policy;
pub mod repo;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{auth::extractors::require_auth, state::AppState};
use handlers::{
    cancel_registration, create_event, delete_event, get_event, list_events, register_for_event,
    update_event,
};

/// Reads are public. Writes sit behind the access guard, layered per method so an
/// unsupported method still falls through to 405 instead of 401.
pub fn router(state: &AppState) -> Router<AppState> {
    let guard = || middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/events", get(list_events))
        .route("/event", post(create_event).route_layer(guard()))
        .route(
            "/event/:id",
            get(get_event).merge(
                put(update_event)
                    .delete(delete_event)
                    .route_layer(guard()),
            ),
        )
        .route(
            "/event/:id/register",
            post(register_for_event)
                .delete(cancel_registration)
                .route_layer(guard()),
        )
}
