pub mod auth;
pub mod health;
pub mod posts;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET  /status                      health
///
/// POST /auth/register               register (public)
/// POST /auth/login                  login (public)
/// POST /auth/refresh-token          refresh (public)
/// POST /auth/logout                 logout (public, token in body)
///
/// GET  /posts                       list others' posts (public)
/// POST /posts                       create (requires auth)
/// GET  /posts/mine                  own posts (requires auth)
/// PUT  /posts/{id}                  update (author only)
/// DELETE /posts/{id}                delete (author only)
///
/// POST /uploads/presign             pre-signed upload URL (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/posts", posts::router())
        .nest("/uploads", uploads::router())
}
