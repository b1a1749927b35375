//! Smoke tests for the status endpoint and the outer middleware stack.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

/// `/status` reports the crate version and a live database.
#[sqlx::test(migrations = "../db/migrations")]
async fn status_reports_healthy(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["db_healthy"], true);
}

/// Every response carries the request ID set by the middleware stack.
#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/status").await;
    assert!(response.headers().contains_key("x-request-id"));
}

/// Unknown routes fall through to a plain 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_is_not_found(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
