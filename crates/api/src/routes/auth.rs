//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register       -> register
/// POST /login          -> login
/// POST /refresh-token  -> refresh
/// POST /logout         -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
