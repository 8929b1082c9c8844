//! Tests for login, access token checks, refresh and revoke.

mod common;

use axum::http::StatusCode;
use chirpy::jwt::JwtConfig;
use chrono::{Duration, Utc};
use common::{JWT_SECRET, bearer, create_test_app, empty_request, json_request};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_login_response_shape() {
    let app = create_test_app().await;
    let user = app.signup("alice@example.com", "04234").await;
    let login = app.login("alice@example.com", "04234").await;

    assert_eq!(login["id"], user["id"]);
    assert_eq!(login["email"], "alice@example.com");
    assert_eq!(login["is_chirpy_red"], false);
    assert!(login["created_at"].as_str().is_some());
    assert!(login["updated_at"].as_str().is_some());
    assert!(login.get("hashed_password").is_none());
    assert!(login.get("password").is_none());

    let refresh = login["refresh_token"].as_str().unwrap();
    assert_eq!(refresh.len(), 64);
    assert!(refresh.chars().all(|c| c.is_ascii_hexdigit()));

    let token = login["token"].as_str().unwrap();
    let subject = JwtConfig::new(JWT_SECRET).validate(token).unwrap();
    assert_eq!(subject.to_string(), user["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    app.signup("alice@example.com", "04234").await;

    let response = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "email": "alice@example.com", "password": "wrong" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = create_test_app().await;
    app.signup("alice@example.com", "04234").await;

    let unknown = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "email": "nobody@example.com", "password": "04234" }),
        ))
        .await;
    let wrong = app
        .send(json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "email": "alice@example.com", "password": "nope" }),
        ))
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.json, wrong.json);
}

#[tokio::test]
async fn test_each_login_issues_new_refresh_token() {
    let app = create_test_app().await;
    app.signup("alice@example.com", "04234").await;

    let first = app.login("alice@example.com", "04234").await;
    let second = app.login("alice@example.com", "04234").await;
    assert_ne!(first["refresh_token"], second["refresh_token"]);
}

#[tokio::test]
async fn test_protected_endpoint_missing_header() {
    let app = create_test_app().await;

    let response = app
        .send(json_request(
            "POST",
            "/api/chirps",
            None,
            &json!({ "body": "hello" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_protected_endpoint_malformed_header() {
    let app = create_test_app().await;

    for value in ["Bearer ", "Bearer    ", "Basic dXNlcjpwYXNz", "bearer abc"] {
        let response = app
            .send(json_request(
                "POST",
                "/api/chirps",
                Some(value),
                &json!({ "body": "hello" }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "header {:?}", value);
    }
}

#[tokio::test]
async fn test_protected_endpoint_malformed_token() {
    let app = create_test_app().await;

    let response = app.create_chirp("not.a.jwt", "hello").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_endpoint_wrong_secret() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let user_id = Uuid::parse_str(login["id"].as_str().unwrap()).unwrap();

    let forged = JwtConfig::new(b"some-other-secret-of-sufficient-size")
        .mint(user_id, chirpy::jwt::ACCESS_TOKEN_TTL)
        .unwrap();

    let response = app.create_chirp(&forged, "hello").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_endpoint_expired_token() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let user_id = Uuid::parse_str(login["id"].as_str().unwrap()).unwrap();

    let expired = JwtConfig::new(JWT_SECRET)
        .mint(user_id, std::time::Duration::ZERO)
        .unwrap();

    let response = app.create_chirp(&expired, "hello").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;

    let response = app
        .create_chirp(login["refresh_token"].as_str().unwrap(), "hello")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;

    let response = app
        .send(empty_request(
            "POST",
            "/api/refresh",
            Some(&bearer(login["token"].as_str().unwrap())),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_success() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let refresh = login["refresh_token"].as_str().unwrap();

    let response = app
        .send(empty_request("POST", "/api/refresh", Some(&bearer(refresh))))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let token = response.json["token"].as_str().unwrap();
    let subject = JwtConfig::new(JWT_SECRET).validate(token).unwrap();
    assert_eq!(subject.to_string(), login["id"].as_str().unwrap());

    // Not rotated: the same refresh token keeps working
    let again = app
        .send(empty_request("POST", "/api/refresh", Some(&bearer(refresh))))
        .await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_missing_header() {
    let app = create_test_app().await;

    let response = app.send(empty_request("POST", "/api/refresh", None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_unknown_token() {
    let app = create_test_app().await;

    let response = app
        .send(empty_request(
            "POST",
            "/api/refresh",
            Some(&bearer(&"ab".repeat(32))),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_body() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;

    let response = app
        .send(json_request(
            "POST",
            "/api/refresh",
            Some(&bearer(login["refresh_token"].as_str().unwrap())),
            &json!({ "refresh_token": login["refresh_token"] }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_expired_token() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let user_id = Uuid::parse_str(login["id"].as_str().unwrap()).unwrap();

    let now = Utc::now();
    app.db
        .tokens()
        .create("expired-token", user_id, now - Duration::days(61), now - Duration::days(1))
        .await
        .unwrap();

    let response = app
        .send(empty_request(
            "POST",
            "/api/refresh",
            Some(&bearer("expired-token")),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoke_keeps_row() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let refresh = login["refresh_token"].as_str().unwrap();

    let response = app
        .send(empty_request("POST", "/api/revoke", Some(&bearer(refresh))))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.text.is_empty());

    let record = app.db.tokens().get(refresh).await.unwrap().unwrap();
    assert!(record.revoked_at.is_some());
    assert_eq!(Some(record.updated_at), record.revoked_at);
}

#[tokio::test]
async fn test_revoke_twice() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;
    let auth = bearer(login["refresh_token"].as_str().unwrap());

    for _ in 0..2 {
        let response = app
            .send(empty_request("POST", "/api/revoke", Some(&auth)))
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn test_revoke_unknown_token_looks_like_success() {
    let app = create_test_app().await;

    let response = app
        .send(empty_request(
            "POST",
            "/api/revoke",
            Some(&bearer("never-issued")),
        ))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_revoke_requires_header_and_empty_body() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;

    let missing = app.send(empty_request("POST", "/api/revoke", None)).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let with_body = app
        .send(json_request(
            "POST",
            "/api/revoke",
            Some(&bearer(login["refresh_token"].as_str().unwrap())),
            &json!({}),
        ))
        .await;
    assert_eq!(with_body.status, StatusCode::BAD_REQUEST);

    // Still usable: the rejected revoke did nothing
    let refresh = app
        .send(empty_request(
            "POST",
            "/api/refresh",
            Some(&bearer(login["refresh_token"].as_str().unwrap())),
        ))
        .await;
    assert_eq!(refresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_revoke_does_not_invalidate_access_token() {
    let app = create_test_app().await;
    let login = app.register("alice@example.com", "04234").await;

    app.send(empty_request(
        "POST",
        "/api/revoke",
        Some(&bearer(login["refresh_token"].as_str().unwrap())),
    ))
    .await;

    let response = app
        .create_chirp(login["token"].as_str().unwrap(), "still here")
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = create_test_app().await;
    let alice = app.register("alice@example.com", "04234").await;
    let bob = app.register("bob@example.com", "hunter2").await;
    let alice_token = alice["token"].as_str().unwrap();
    let bob_token = bob["token"].as_str().unwrap();

    let chirp = app.create_chirp(alice_token, "Hello from Alice").await;
    assert_eq!(chirp.status, StatusCode::CREATED);
    let uri = format!("/api/chirps/{}", chirp.json["id"].as_str().unwrap());

    let forbidden = app
        .send(empty_request("DELETE", &uri, Some(&bearer(bob_token))))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let deleted = app
        .send(empty_request("DELETE", &uri, Some(&bearer(alice_token))))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.send(empty_request("GET", &uri, None)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    // Tokens carry second resolution; make sure the new one differs
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let refresh_auth = bearer(alice["refresh_token"].as_str().unwrap());
    let refreshed = app
        .send(empty_request("POST", "/api/refresh", Some(&refresh_auth)))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_token = refreshed.json["token"].as_str().unwrap();
    assert_ne!(new_token, alice_token);

    let with_new_token = app.create_chirp(new_token, "Refreshed").await;
    assert_eq!(with_new_token.status, StatusCode::CREATED);

    let revoked = app
        .send(empty_request("POST", "/api/revoke", Some(&refresh_auth)))
        .await;
    assert_eq!(revoked.status, StatusCode::NO_CONTENT);

    let after_revoke = app
        .send(empty_request("POST", "/api/refresh", Some(&refresh_auth)))
        .await;
    assert_eq!(after_revoke.status, StatusCode::UNAUTHORIZED);
}
