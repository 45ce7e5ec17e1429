use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Subject,
        dto::{CredentialsRequest, LoginResponse, MessageResponse},
        password::CredentialHasher,
        services::validate_credentials,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Argon2 is CPU-bound, so it runs on the blocking pool.
async fn hash_blocking(hasher: CredentialHasher, password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(hash)
}

async fn verify_blocking(
    hasher: CredentialHasher,
    password: String,
    hash: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    let payload = validate_credentials(payload)?;

    // Cheap check first so a taken email does not pay for a hash.
    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_blocking(state.hasher.clone(), payload.password).await?;
    let user = state.users.create(&payload.email, &hash).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let payload = validate_credentials(payload)?;

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(AppError::Unauthorized);
    };

    let ok = verify_blocking(
        state.hasher.clone(),
        payload.password,
        user.password_hash.clone(),
    )
    .await?;
    if !ok {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized);
    }

    let subject = Subject {
        user_id: user.id,
        email: user.email,
    };
    let token = state.tokens.issue(&subject, state.tokens.ttl())?;

    info!(user_id = subject.user_id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Successful login",
        token,
    }))
}
