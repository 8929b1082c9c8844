//! Chirps API.
//!
//! Reading is public; creating and deleting require an access token.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ApiError, ResultExt, parse_uuid};
use crate::auth::Auth;
use crate::db::{Chirp, Database, SortOrder};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

/// Maximum chirp length in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by [`CENSORED`], matched case-insensitively.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const CENSORED: &str = "****";

/// State for chirps endpoints.
#[derive(Clone)]
pub struct ChirpsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

impl_has_auth_backend!(ChirpsState);

pub fn router(state: ChirpsState) -> Router {
    Router::new()
        .route("/", get(list_chirps).post(create_chirp))
        .route("/{id}", get(get_chirp).delete(delete_chirp))
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct CreateChirpRequest {
    body: String,
}

#[derive(Deserialize)]
struct ListChirpsQuery {
    author_id: Option<Uuid>,
    #[serde(default)]
    sort: SortOrder,
}

#[derive(Serialize)]
struct ChirpResponse {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    body: String,
    user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

// --- Validation ---

/// Check length limits and censor profanity. Returns the body to store.
pub fn validate_chirp(body: &str) -> Result<String, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("Chirp cannot be empty"));
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::bad_request("Chirp is too long"));
    }
    Ok(censor(body))
}

/// Replace profane words. Only whole space-separated words are matched, so
/// a word with punctuation attached (`sharbert!`) is kept.
fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// --- Handlers ---

async fn create_chirp(
    State(state): State<ChirpsState>,
    Auth(auth): Auth,
    payload: Result<Json<CreateChirpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let body = validate_chirp(&payload.body)?;

    let chirp = state
        .db
        .chirps()
        .create(auth.user_id, &body)
        .await
        .map_err(|e| {
            // Access token outlived its user (admin reset)
            if matches!(&e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()) {
                ApiError::not_found("User not found")
            } else {
                ApiError::db_error("Failed to create chirp", e)
            }
        })?;

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

async fn list_chirps(
    State(state): State<ChirpsState>,
    query: Result<Query<ListChirpsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;

    let chirps = state
        .db
        .chirps()
        .list(query.author_id, query.sort)
        .await
        .db_err("Failed to list chirps")?;

    let response: Vec<ChirpResponse> = chirps.into_iter().map(ChirpResponse::from).collect();
    Ok(Json(response))
}

async fn get_chirp(
    State(state): State<ChirpsState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&id)?;

    let chirp = state
        .db
        .chirps()
        .get(id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    Ok(Json(ChirpResponse::from(chirp)))
}

async fn delete_chirp(
    State(state): State<ChirpsState>,
    Auth(auth): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid(&id)?;

    let chirp = state
        .db
        .chirps()
        .get(id)
        .await
        .db_err("Failed to get chirp")?
        .ok_or_else(|| ApiError::not_found("Chirp not found"))?;

    if chirp.user_id != auth.user_id {
        return Err(ApiError::forbidden("You can only delete your own chirps"));
    }

    let deleted = state
        .db
        .chirps()
        .delete(id)
        .await
        .db_err("Failed to delete chirp")?;

    if !deleted {
        return Err(ApiError::not_found("Chirp not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_censor_replaces_whole_words() {
        assert_eq!(
            censor("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(censor("Sharbert FORNAX kerFuffle"), "**** **** ****");
    }

    #[test]
    fn test_censor_leaves_punctuated_words() {
        let body = "I hear Mastodon is better than Chirpy. sharbert!";
        assert_eq!(censor(body), body);
    }

    #[test]
    fn test_censor_keeps_spacing() {
        assert_eq!(censor("a  fornax "), "a  **** ");
    }

    #[test]
    fn test_validate_chirp_length() {
        let exact = "a".repeat(MAX_CHIRP_LENGTH);
        assert_eq!(validate_chirp(&exact).unwrap(), exact);

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(
            validate_chirp(&too_long),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_chirp_counts_characters() {
        // 140 two-byte characters
        let body = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp(&body).is_ok());
    }

    #[test]
    fn test_validate_chirp_empty() {
        assert!(matches!(validate_chirp(""), Err(ApiError::BadRequest(_))));
    }
}
