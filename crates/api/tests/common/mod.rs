#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use inkwell_api::auth::jwt::JwtConfig;
use inkwell_api::config::ServerConfig;
use inkwell_api::router::build_app_router;
use inkwell_api::state::AppState;
use inkwell_api::storage::s3::S3Config;

/// Build a test `ServerConfig` with fixed secrets and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            access_secret: "test-access-secret-long-enough-for-hmac".to_string(),
            refresh_secret: "test-refresh-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        s3: S3Config {
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            presign_expiry_secs: 180,
        },
    }
}

/// S3 client with static credentials. Pre-signing is a local signing
/// operation, so no AWS endpoint is ever contacted in tests.
pub fn test_s3_client() -> aws_sdk_s3::Client {
    let credentials =
        aws_credential_types::Credentials::new("test-access-key", "test-secret-key", None, None, "test");
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .credentials_provider(credentials)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        s3: test_s3_client(),
    };
    build_app_router(state, &config)
}

/// Send a request through the router. `headers` are extra request headers
/// (used for device fingerprint tests).
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    headers: &[(&str, &str)],
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, &[]).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let auth = format!("Bearer {token}");
    send(app, Method::GET, uri, None, &[("authorization", &auth)]).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), &[]).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let auth = format!("Bearer {token}");
    send(app, Method::POST, uri, Some(body), &[("authorization", &auth)]).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let auth = format!("Bearer {token}");
    send(app, Method::PUT, uri, Some(body), &[("authorization", &auth)]).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let auth = format!("Bearer {token}");
    send(app, Method::DELETE, uri, None, &[("authorization", &auth)]).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user via the API and assert success.
pub async fn register_user(app: Router, name: &str, email: &str, password: &str) {
    let body = serde_json::json!({ "name": name, "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Log in via the API with the given device headers and return the JSON
/// response containing `user` and `tokens`.
pub async fn login_user(
    app: Router,
    email: &str,
    password: &str,
    headers: &[(&str, &str)],
) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = send(app, Method::POST, "/api/v1/auth/login", Some(body), headers).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
