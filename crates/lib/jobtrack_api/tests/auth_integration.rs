//! Integration tests for the account routes, served over an in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use jobtrack_api::config::ApiConfig;
use jobtrack_api::middleware::rate_limit::RATE_LIMIT_MESSAGE;
use jobtrack_api::{AppState, router};
use jobtrack_core::store::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        ApiConfig::with_secret("test-secret"),
    );
    router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "10.0.0.1");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

fn ada() -> Value {
    json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" })
}

#[tokio::test]
async fn register_returns_session_shape() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["location"], "my city");
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["lastName"], "lastName");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_missing_values_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Please provide all values");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = app();
    send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;
    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Email already in use");
}

#[tokio::test]
async fn login_round_trip_and_bad_password() {
    let app = app();
    send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Invalid Credentials");
}

#[tokio::test]
async fn update_user_requires_token() {
    let app = app();
    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/auth/updateUser",
        None,
        Some(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "lastName": "Lovelace",
            "location": "London"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "Authentication Invalid");

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/jobs",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_returns_new_location() {
    let app = app();
    let (_, session) = send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;
    let token = session["token"].as_str().expect("token");

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/auth/updateUser",
        Some(token),
        Some(json!({
            "email": "ada@example.com",
            "name": "Ada",
            "lastName": "Lovelace",
            "location": "London"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "London");
    assert_eq!(body["user"]["lastName"], "Lovelace");
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn eleventh_auth_attempt_is_rate_limited() {
    let app = app();
    let attempt = json!({ "email": "nobody@example.com", "password": "secret1" });
    for _ in 0..10 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(attempt.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = send(&app, "POST", "/api/v1/auth/login", None, Some(attempt)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["msg"], RATE_LIMIT_MESSAGE);

    // Register shares the same per-address budget.
    let (status, _) = send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn wrongly_typed_field_is_bad_request_with_error_body() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": 5, "email": "ada@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["msg"].as_str().is_some_and(|m| m.contains("name")));
}

#[tokio::test]
async fn body_without_json_content_type_is_bad_request_with_error_body() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("x-forwarded-for", "10.0.0.2")
        .body(Body::from(
            json!({ "email": "ada@example.com", "password": "secret1" }).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: Value = serde_json::from_slice(&bytes).expect("JSON error body");
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["msg"], "Expected a JSON request body");
}

#[tokio::test]
async fn malformed_job_body_is_bad_request() {
    let app = app();
    let (_, session) = send(&app, "POST", "/api/v1/auth/register", None, Some(ada())).await;
    let token = session["token"].as_str().expect("token");

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/jobs")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"company\": \"Acme\","))
        .unwrap();
    let resp = app.oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: Value = serde_json::from_slice(&bytes).expect("JSON error body");
    assert_eq!(body["msg"], "Request body is not valid JSON");
}
