//! Admin endpoints.
//!
//! - GET `/metrics` - HTML page with hit and row counts
//! - POST `/reset` - Delete every user and zero the hit counter (dev platform only)

use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::cli::Platform;
use crate::db::Database;
use crate::metrics::Metrics;

/// State for admin endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub db: Database,
    pub metrics: Arc<Metrics>,
    pub platform: Platform,
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_page))
        .route("/reset", post(reset))
        .with_state(state)
}

async fn metrics_page(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .db
        .users()
        .count()
        .await
        .db_err("Failed to count users")?;
    let chirps = state
        .db
        .chirps()
        .count()
        .await
        .db_err("Failed to count chirps")?;

    Ok(Html(format!(
        "<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
    <p>{} users have posted {} chirps.</p>
  </body>
</html>
",
        state.metrics.hits(),
        users,
        chirps
    )))
}

/// Delete all users (chirps and refresh tokens cascade) and reset the counter.
async fn reset(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    if state.platform != Platform::Dev {
        return Err(ApiError::forbidden("Reset is only allowed in dev environment"));
    }

    let deleted = state
        .db
        .users()
        .delete_all()
        .await
        .db_err("Failed to delete users")?;
    state.metrics.reset();

    tracing::warn!(users = deleted, "Database reset");

    Ok("OK")
}
