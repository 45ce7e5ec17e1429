use tracing::warn;

use crate::{auth::extractors::AuthUser, error::AppError, events::repo::Event};

/// Only the creator may change or remove an event. Ids below 1 never name a
/// real user, so they match nothing.
pub fn can_mutate(requesting_user_id: i64, owner_user_id: i64) -> bool {
    requesting_user_id > 0 && requesting_user_id == owner_user_id
}

pub fn ensure_owner(user: &AuthUser, event: &Event, action: &'static str) -> Result<(), AppError> {
    if can_mutate(user.id, event.owner_id) {
        return Ok(());
    }
    warn!(
        user_id = user.id,
        owner_id = event.owner_id,
        event_id = event.id,
        action,
        "ownership check failed"
    );
    Err(AppError::Forbidden(format!("Not authorized to {action} event")))
}
