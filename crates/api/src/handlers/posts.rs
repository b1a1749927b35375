//! Handlers for the `/posts` resource.
//!
//! Create, update, and delete require authentication; only the author may
//! modify their own post. The public listing excludes the caller's own
//! posts when a valid token is presented.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use inkwell_core::error::CoreError;
use inkwell_core::types::{DbId, Timestamp};
use inkwell_db::models::post::{CreatePost, PostWithAuthor, UpdatePost};
use inkwell_db::models::user::UserResponse;
use inkwell_db::repositories::post_repo::{clamp_limit, clamp_page};
use inkwell_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::PageParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /posts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "must be 3 to 200 characters"))]
    pub heading: String,
    #[validate(length(min = 10, max = 5000, message = "must be 10 to 5000 characters"))]
    pub body: String,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: String,
}

/// Request body for `PUT /posts/{id}`. At least one field must be present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "must be 3 to 200 characters"))]
    pub heading: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "must be 10 to 5000 characters"))]
    pub body: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub image_url: Option<String>,
}

/// A post with its author embedded, as returned to clients.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: DbId,
    pub heading: String,
    pub body: String,
    pub image_url: String,
    pub author: UserResponse,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            id: p.id,
            heading: p.heading,
            body: p.body,
            image_url: p.image_url,
            author: UserResponse {
                id: p.author_id,
                name: p.author_name,
                email: p.author_email,
            },
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Pagination metadata for list responses.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// A page of posts plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct PostsPage {
    pub posts: Vec<PostResponse>,
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/posts
///
/// Create a new post authored by the caller.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PostResponse>>)> {
    input.validate()?;

    let post = PostRepo::create(
        &state.pool,
        &CreatePost {
            author_id: auth.user_id,
            heading: input.heading,
            body: input.body,
            image_url: input.image_url,
        },
    )
    .await?;

    tracing::info!(post_id = post.id, user_id = auth.user_id, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: post.into() }),
    ))
}

/// PUT /api/v1/posts/{id}
///
/// Partially update a post. Only the author may update it.
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<UpdatePostRequest>,
) -> AppResult<Json<DataResponse<PostResponse>>> {
    input.validate()?;
    if input.heading.is_none() && input.body.is_none() && input.image_url.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one field (heading, body, or image_url) must be provided".into(),
        )));
    }

    require_author(&state, post_id, auth.user_id, "update").await?;

    let updated = PostRepo::update(
        &state.pool,
        post_id,
        &UpdatePost {
            heading: input.heading,
            body: input.body,
            image_url: input.image_url,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Post",
        id: post_id,
    }))?;

    tracing::info!(post_id, user_id = auth.user_id, "Post updated");

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// DELETE /api/v1/posts/{id}
///
/// Delete a post. Only the author may delete it.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    require_author(&state, post_id, auth.user_id, "delete").await?;

    PostRepo::delete(&state.pool, post_id).await?;

    tracing::info!(post_id, user_id = auth.user_id, "Post deleted");

    Ok(Json(MessageResponse {
        message: "Post deleted successfully",
    }))
}

/// GET /api/v1/posts
///
/// Public, paginated, newest-first listing. When the caller is
/// authenticated their own posts are excluded; an `author_id` query
/// parameter narrows the listing to one author.
pub async fn list_posts(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<PostsPage>>> {
    let exclude_author = auth.map(|u| u.user_id);
    let page = clamp_page(params.page);
    let limit = clamp_limit(params.limit);
    let offset = (page - 1) * limit;

    let posts =
        PostRepo::list(&state.pool, exclude_author, params.author_id, limit, offset).await?;
    let total = PostRepo::count(&state.pool, exclude_author, params.author_id).await?;

    Ok(Json(DataResponse {
        data: page_response(posts, page, limit, total),
    }))
}

/// GET /api/v1/posts/mine
///
/// Paginated, newest-first listing of the caller's own posts.
pub async fn my_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<PostsPage>>> {
    let page = clamp_page(params.page);
    let limit = clamp_limit(params.limit);
    let offset = (page - 1) * limit;

    let posts = PostRepo::list_by_author(&state.pool, auth.user_id, limit, offset).await?;
    let total = PostRepo::count_by_author(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: page_response(posts, page, limit, total),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify the post exists and is authored by `user_id`.
async fn require_author(
    state: &AppState,
    post_id: DbId,
    user_id: DbId,
    action: &str,
) -> Result<(), AppError> {
    let post = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))?;

    if post.author_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "You can only {action} your own posts"
        ))));
    }
    Ok(())
}

/// Assemble a page payload from rows and counts.
fn page_response(posts: Vec<PostWithAuthor>, page: i64, limit: i64, total: i64) -> PostsPage {
    PostsPage {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        },
    }
}
