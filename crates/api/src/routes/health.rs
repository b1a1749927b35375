use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Mount the health check route (under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(health::status))
}
