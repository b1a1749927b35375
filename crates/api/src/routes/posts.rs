//! Route definitions for the `/posts` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route("/mine", get(posts::my_posts))
        .route("/{id}", put(posts::update_post).delete(posts::delete_post))
}
