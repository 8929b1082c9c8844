pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod metrics;
pub mod password;

use api::{create_admin_router, create_api_router};
use axum::Router;
use cli::Platform;
use db::Database;
use jwt::JwtConfig;
use metrics::Metrics;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing access tokens
    pub jwt_secret: Vec<u8>,
    /// Shared key the payment provider sends with webhook calls
    pub polka_key: String,
    /// Deployment platform; admin reset is only allowed on `Dev`
    pub platform: Platform,
    /// Hit counter for the app page, reported on the admin metrics page
    pub metrics: Arc<Metrics>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));

    let api_router = create_api_router(
        config.db.clone(),
        jwt,
        Arc::from(config.polka_key.as_str()),
    );

    let admin_router = create_admin_router(
        config.db.clone(),
        config.metrics.clone(),
        config.platform,
    );

    Router::new()
        .nest("/api", api_router)
        .nest("/admin", admin_router)
        .merge(metrics::app_router(config.metrics.clone()))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let the OS choose a random port.
/// Returns the actual address the server is listening on.
/// Note: For production use, prefer `run_server` directly in main.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> Result<(tokio::task::JoinHandle<()>, SocketAddr), std::io::Error> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = run_server(config, listener).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((handle, local_addr))
}
