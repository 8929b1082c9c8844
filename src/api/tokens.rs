//! Login and token management endpoints.
//!
//! - POST `/login` - Exchange email and password for an access and a refresh token
//! - POST `/refresh` - Exchange a refresh token for a new access token
//! - POST `/revoke` - Revoke a refresh token

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use super::users::{CredentialsRequest, UserResponse};
use crate::auth::{BearerToken, RefreshTokenError, RefreshTokenManager};
use crate::db::Database;
use crate::jwt::{ACCESS_TOKEN_TTL, JwtConfig};
use crate::password::verify_stored_password;

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub refresh: RefreshTokenManager,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/revoke", post(revoke_token))
        .with_state(state)
}

#[derive(Serialize)]
struct LoginResponse {
    #[serde(flatten)]
    user: UserResponse,
    token: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

fn require_empty_body(body: &Bytes) -> Result<(), ApiError> {
    if body.is_empty() {
        Ok(())
    } else {
        Err(ApiError::bad_request("Request body must be empty"))
    }
}

/// Log in with email and password.
/// Unknown email and wrong password are indistinguishable to the caller.
async fn login(
    State(state): State<TokensState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let email = payload.validated()?;

    let user = state
        .db
        .users()
        .get_by_email(email)
        .await
        .db_err("Failed to get user")?;

    // Unknown emails still pay for a bcrypt check.
    let digest = user.as_ref().map(|u| u.hashed_password.clone());
    verify_stored_password(payload.password.clone(), digest).await?;
    let user = user.ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    let token = state.jwt.mint(user.id, ACCESS_TOKEN_TTL)?;
    let refresh = state.refresh.issue(user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
        refresh_token: refresh.token,
    }))
}

/// Mint a new access token for the owner of a valid refresh token.
/// The refresh token itself is left unchanged.
async fn refresh_token(
    State(state): State<TokensState>,
    BearerToken(token): BearerToken,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    require_empty_body(&body)?;

    let user_id = state.refresh.validate(&token).await?;
    let token = state.jwt.mint(user_id, ACCESS_TOKEN_TTL)?;

    Ok(Json(TokenResponse { token }))
}

/// Revoke a refresh token. Unknown tokens get the same response as known
/// ones so the endpoint does not reveal which tokens exist.
async fn revoke_token(
    State(state): State<TokensState>,
    BearerToken(token): BearerToken,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    require_empty_body(&body)?;

    match state.refresh.revoke(&token).await {
        Ok(()) | Err(RefreshTokenError::NotFound) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into()),
    }
}
