use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
mod services;

pub(crate) use dto::MessageResponse;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
