//! Refresh token issuing, validation and revocation.
//!
//! Refresh tokens are opaque random hex strings looked up in the
//! `refresh_tokens` table. Validation is read-only: a refresh token is reused
//! until it expires or is revoked, it is never rotated.

use chrono::{Duration, Utc};
use rand::RngCore;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{RefreshToken, TokenStore};

/// Refresh token lifetime: 60 days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Random bytes per token (hex-encoded to twice this length).
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum RefreshTokenError {
    #[error("refresh token not found")]
    NotFound,
    #[error("refresh token has been revoked")]
    Revoked,
    #[error("refresh token expired")]
    Expired,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct RefreshTokenManager {
    store: TokenStore,
    ttl: Duration,
}

impl RefreshTokenManager {
    pub fn new(store: TokenStore) -> Self {
        Self::with_ttl(store, Duration::days(REFRESH_TOKEN_TTL_DAYS))
    }

    /// Manager issuing tokens that live for `ttl`. A negative `ttl` issues
    /// tokens that are already expired.
    pub fn with_ttl(store: TokenStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Issue and persist a new refresh token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshToken, RefreshTokenError> {
        let now = Utc::now();
        let token = generate_token();
        Ok(self
            .store
            .create(&token, user_id, now, now + self.ttl)
            .await?)
    }

    /// Check a refresh token and return the user it belongs to.
    pub async fn validate(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        let record = self
            .store
            .get(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        if record.revoked_at.is_some() {
            return Err(RefreshTokenError::Revoked);
        }
        if Utc::now() >= record.expires_at {
            return Err(RefreshTokenError::Expired);
        }
        Ok(record.user_id)
    }

    /// Revoke a refresh token. Revoking an already revoked token succeeds.
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        if self.store.revoke(token, Utc::now()).await? {
            Ok(())
        } else {
            Err(RefreshTokenError::NotFound)
        }
    }
}

/// Generate fresh token material from the thread-local CSPRNG.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
