//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::{ApiAuthError, AuthErrorKind};
use super::header::{api_key_matches, get_api_key, get_bearer_token};
use super::state::{HasAuthBackend, HasWebhookKey};
use super::types::AuthenticatedUser;

/// Extractor for endpoints that require a valid access token in
/// `Authorization: Bearer <token>`. Stateless: no database lookup.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = get_bearer_token(&parts.headers)?;
        let user_id = state.jwt().validate(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            ApiAuthError::from(e)
        })?;
        Ok(Auth(AuthenticatedUser { user_id }))
    }
}

/// Raw bearer token material, for endpoints that take a refresh token.
/// The caller decides which token namespace it belongs to.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = get_bearer_token(&parts.headers)?;
        Ok(BearerToken(token.to_string()))
    }
}

/// Guard for the webhook endpoint: `Authorization: ApiKey <key>` must match
/// the configured key.
pub struct WebhookAuth;

impl<S> FromRequestParts<S> for WebhookAuth
where
    S: HasWebhookKey + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let key = get_api_key(&parts.headers)?;
        if !api_key_matches(key, state.webhook_key()) {
            tracing::warn!("Webhook called with wrong API key");
            return Err(ApiAuthError::new(AuthErrorKind::InvalidApiKey));
        }
        Ok(WebhookAuth)
    }
}
