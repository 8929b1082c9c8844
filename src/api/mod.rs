mod admin;
mod chirps;
mod error;
mod polka;
mod tokens;
mod users;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::auth::RefreshTokenManager;
use crate::cli::Platform;
use crate::db::Database;
use crate::jwt::JwtConfig;
use crate::metrics::Metrics;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, polka_key: Arc<str>) -> Router {
    let tokens_state = tokens::TokensState {
        db: db.clone(),
        jwt: jwt.clone(),
        refresh: RefreshTokenManager::new(db.tokens()),
    };

    let chirps_state = chirps::ChirpsState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let polka_state = polka::PolkaState {
        db: db.clone(),
        api_key: polka_key,
    };

    let users_state = users::UsersState { db, jwt };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/users", users::router(users_state))
        .nest("/chirps", chirps::router(chirps_state))
        .nest("/polka", polka::router(polka_state))
        .merge(tokens::router(tokens_state))
}

/// Create the admin router.
pub fn create_admin_router(db: Database, metrics: Arc<Metrics>, platform: Platform) -> Router {
    admin::router(admin::AdminState {
        db,
        metrics,
        platform,
    })
}

async fn healthz() -> &'static str {
    "OK"
}
