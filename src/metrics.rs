//! Request counting for the public app page.

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{Html, Response},
    routing::get,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const APP_PAGE: &str = "<html>
  <body>
    <h1>Welcome to Chirpy</h1>
  </body>
</html>
";

/// Hit counter shared by the app routes and the admin endpoints.
#[derive(Debug, Default)]
pub struct Metrics {
    file_server_hits: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.file_server_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.file_server_hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.file_server_hits.store(0, Ordering::Relaxed);
    }
}

/// Middleware counting every request that reaches the wrapped routes.
async fn count_hits(State(metrics): State<Arc<Metrics>>, request: Request, next: Next) -> Response {
    metrics.record_hit();
    next.run(request).await
}

/// Routes for the public app page, counted by `metrics`.
pub fn app_router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/app", get(app_page))
        .route("/app/", get(app_page))
        .layer(middleware::from_fn_with_state(metrics, count_hits))
}

async fn app_page() -> Html<&'static str> {
    Html(APP_PAGE)
}
