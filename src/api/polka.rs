//! Payment provider webhook.
//!
//! - POST `/webhooks` - Event delivery, authenticated with `Authorization: ApiKey <key>`

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ApiError, ResultExt};
use crate::auth::{HasWebhookKey, WebhookAuth};
use crate::db::Database;

/// The only event acted upon; everything else is acknowledged and ignored.
const USER_UPGRADED: &str = "user.upgraded";

#[derive(Clone)]
pub struct PolkaState {
    pub db: Database,
    pub api_key: Arc<str>,
}

impl HasWebhookKey for PolkaState {
    fn webhook_key(&self) -> &str {
        &self.api_key
    }
}

pub fn router(state: PolkaState) -> Router {
    Router::new()
        .route("/webhooks", post(handle_webhook))
        .with_state(state)
}

#[derive(Deserialize)]
struct WebhookRequest {
    event: String,
    data: Option<WebhookData>,
}

#[derive(Deserialize)]
struct WebhookData {
    user_id: Uuid,
}

async fn handle_webhook(
    State(state): State<PolkaState>,
    _auth: WebhookAuth,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    if payload.event != USER_UPGRADED {
        tracing::debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let data = payload
        .data
        .ok_or_else(|| ApiError::bad_request("Missing event data"))?;

    let upgraded = state
        .db
        .users()
        .upgrade_to_red(data.user_id)
        .await
        .db_err("Failed to upgrade user")?;

    if !upgraded {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %data.user_id, "User upgraded to Chirpy Red");

    Ok(StatusCode::NO_CONTENT)
}
