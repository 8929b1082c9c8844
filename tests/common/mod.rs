#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chirpy::{ServerConfig, cli::Platform, db::Database, metrics::Metrics};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

/// App plus a handle on its database for direct setup and inspection.
pub struct TestApp {
    pub router: Router,
    pub db: Database,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_on(Platform::Prod).await
}

pub async fn create_test_app_on(platform: Platform) -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: JWT_SECRET.to_vec(),
        polka_key: POLKA_KEY.to_string(),
        platform,
        metrics: Arc::new(Metrics::new()),
    };
    TestApp {
        router: chirpy::create_app(&config),
        db,
    }
}

/// Response status and body, parsed as JSON when possible.
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
    pub json: Value,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let text = String::from_utf8_lossy(&body).into_owned();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        TestResponse { status, text, json }
    }

    pub async fn signup(&self, email: &str, password: &str) -> Value {
        let response = self
            .send(json_request(
                "POST",
                "/api/users",
                None,
                &serde_json::json!({ "email": email, "password": password }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json
    }

    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .send(json_request(
                "POST",
                "/api/login",
                None,
                &serde_json::json!({ "email": email, "password": password }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json
    }

    /// Sign up and log in, returning the login response.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        self.signup(email, password).await;
        self.login(email, password).await
    }

    pub async fn create_chirp(&self, token: &str, body: &str) -> TestResponse {
        self.send(json_request(
            "POST",
            "/api/chirps",
            Some(&bearer(token)),
            &serde_json::json!({ "body": body }),
        ))
        .await
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub fn empty_request(method: &str, uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}
