use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, TokenPair,
};
use crate::auth::guard::{BearerToken, CurrentUser};
use crate::auth::service;
use crate::auth::tokens::TokenKeys;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::PublicProfile;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let user = service::register(state.directory.as_ref(), payload).await?;
    Ok(Json(RegisterResponse { user }))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let keys = TokenKeys::from_ref(&state);
    let tokens = service::login(state.directory.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse { tokens }))
}

#[instrument(skip(state, token))]
async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenPair>, AppError> {
    let keys = TokenKeys::from_ref(&state);
    let pair = service::refresh(&keys, &token)?;
    Ok(Json(pair))
}

#[instrument(skip(profile))]
async fn me(CurrentUser(profile): CurrentUser) -> Json<PublicProfile> {
    Json(profile)
}
