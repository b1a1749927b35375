//! Blog post entity model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A post row from the `posts` table.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: DbId,
    pub author_id: DbId,
    pub heading: String,
    pub body: String,
    pub image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A post joined with its author's public fields, for list/detail responses.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: DbId,
    pub author_id: DbId,
    pub heading: String,
    pub body: String,
    pub image_url: String,
    pub author_name: String,
    pub author_email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new post.
pub struct CreatePost {
    pub author_id: DbId,
    pub heading: String,
    pub body: String,
    pub image_url: String,
}

/// DTO for updating an existing post. All fields are optional.
pub struct UpdatePost {
    pub heading: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}
