use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::{extractors::AuthUser, MessageResponse},
    error::AppError,
    events::{
        dto::{EventRequest, EventResponse},
        policy::ensure_owner,
        repo::{Event, NewEvent},
    },
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

#[instrument(skip(state, id))]
pub async fn get_event(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, AppError> {
    let Path(id) = id?;
    let event = state.events.get(id).await?;
    Ok(Json(event))
}

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let Json(payload) = payload?;
    let new_event = NewEvent::try_from(payload)?;

    let event = state.events.create(new_event, user.id).await?;

    info!(event_id = event.id, user_id = user.id, email = %user.email, "event created");
    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event Created",
            event,
        }),
    ))
}

#[instrument(skip(state, id, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let Path(id) = id?;
    let existing = state.events.get(id).await?;
    ensure_owner(&user, &existing, "update")?;

    let Json(payload) = payload?;
    let event = state.events.update(id, NewEvent::try_from(payload)?).await?;

    info!(event_id = id, user_id = user.id, "event updated");
    Ok(Json(EventResponse {
        message: "Event updated successfully",
        event,
    }))
}

#[instrument(skip(state, id))]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    let existing = state.events.get(id).await?;
    ensure_owner(&user, &existing, "delete")?;

    state.events.delete(id).await?;

    info!(event_id = id, user_id = user.id, "event deleted");
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

#[instrument(skip(state, id))]
pub async fn register_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Path(id) = id?;
    state.events.register(id, user.id).await?;

    info!(event_id = id, user_id = user.id, "registered for event");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

#[instrument(skip(state, id))]
pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    state.events.unregister(id, user.id).await?;

    info!(event_id = id, user_id = user.id, "registration cancelled");
    Ok(Json(MessageResponse::new("Registration cancelled")))
}
