//! Refresh token storage.
//!
//! Only refresh tokens are stored. Access tokens are stateless and short-lived.
//! Revoking a token stamps `revoked_at`; rows are never deleted except by
//! cascade when their user goes away.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

/// A persisted refresh token record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Store for refresh token rows.
#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new refresh token created at `now`.
    pub async fn create(
        &self,
        token: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
             VALUES (?, ?, ?, ?, ?, NULL)
             RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a refresh token by its value.
    pub async fn get(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error> {
        sqlx::query_as(
            "SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
             FROM refresh_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    /// Stamp `revoked_at` and `updated_at` with `now`. Returns false if no such token.
    pub async fn revoke(&self, token: &str, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE refresh_tokens SET revoked_at = ?, updated_at = ? WHERE token = ?")
                .bind(now)
                .bind(now)
                .bind(token)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
