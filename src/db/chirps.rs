//! Chirp storage.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChirpStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordering of chirp listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl ChirpStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a chirp. The body must already be validated and filtered.
    pub async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as(
            "INSERT INTO chirps (id, body, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)
             RETURNING id, body, user_id, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(body)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a chirp by ID.
    pub async fn get(&self, id: Uuid) -> Result<Option<Chirp>, sqlx::Error> {
        sqlx::query_as("SELECT id, body, user_id, created_at, updated_at FROM chirps WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// List chirps, optionally only those by `author`.
    pub async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<Chirp>, sqlx::Error> {
        match (author, order) {
            (None, SortOrder::Asc) => {
                sqlx::query_as(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     ORDER BY julianday(created_at) ASC, rowid ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
            (None, SortOrder::Desc) => {
                sqlx::query_as(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     ORDER BY julianday(created_at) DESC, rowid DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
            (Some(author), SortOrder::Asc) => {
                sqlx::query_as(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     WHERE user_id = ? ORDER BY julianday(created_at) ASC, rowid ASC",
                )
                .bind(author)
                .fetch_all(&self.pool)
                .await
            }
            (Some(author), SortOrder::Desc) => {
                sqlx::query_as(
                    "SELECT id, body, user_id, created_at, updated_at FROM chirps
                     WHERE user_id = ? ORDER BY julianday(created_at) DESC, rowid DESC",
                )
                .bind(author)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// Delete a chirp by ID.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all chirps.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chirps")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Delete every chirp.
    pub async fn delete_all(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chirps")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
