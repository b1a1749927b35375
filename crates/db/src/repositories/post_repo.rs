//! Repository for the `posts` table.

use inkwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, PostWithAuthor, UpdatePost};

/// Column list for bare post rows.
const COLUMNS: &str = "id, author_id, heading, body, image_url, created_at, updated_at";

/// Column list for posts joined with their author's public fields.
const JOINED_COLUMNS: &str = "p.id, p.author_id, p.heading, p.body, p.image_url, \
                               u.name AS author_name, u.email AS author_email, \
                               p.created_at, p.updated_at";

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on page size to keep list responses bounded.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to a sane value (1-based).
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Provides CRUD operations for blog posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row joined with its author.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<PostWithAuthor, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                 INSERT INTO posts (author_id, heading, body, image_url)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {COLUMNS}
             )
             SELECT {JOINED_COLUMNS} FROM inserted p
             JOIN users u ON u.id = p.author_id"
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(input.author_id)
            .bind(&input.heading)
            .bind(&input.body)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a post by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a post. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Ownership is
    /// checked by the handler before calling this.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<PostWithAuthor>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                 UPDATE posts SET
                     heading = COALESCE($2, heading),
                     body = COALESCE($3, body),
                     image_url = COALESCE($4, image_url),
                     updated_at = NOW()
                 WHERE id = $1
                 RETURNING {COLUMNS}
             )
             SELECT {JOINED_COLUMNS} FROM updated p
             JOIN users u ON u.id = p.author_id"
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(id)
            .bind(&input.heading)
            .bind(&input.body)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts newest-first, excluding `exclude_author` (the caller, when
    /// authenticated) and optionally restricted to one `author_id`.
    pub async fn list(
        pool: &PgPool,
        exclude_author: Option<DbId>,
        author_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE ($1::BIGINT IS NULL OR p.author_id <> $1)
               AND ($2::BIGINT IS NULL OR p.author_id = $2)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, PostWithAuthor>(&query)
            .bind(exclude_author)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count posts matching the same filters as [`Self::list`].
    pub async fn count(
        pool: &PgPool,
        exclude_author: Option<DbId>,
        author_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts
             WHERE ($1::BIGINT IS NULL OR author_id <> $1)
               AND ($2::BIGINT IS NULL OR author_id = $2)",
        )
        .bind(exclude_author)
        .bind(author_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// List one author's posts newest-first.
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
        Self::list(pool, None, Some(author_id), limit, offset).await
    }

    /// Count one author's posts.
    pub async fn count_by_author(pool: &PgPool, author_id: DbId) -> Result<i64, sqlx::Error> {
        Self::count(pool, None, Some(author_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_page_defaults_and_floors() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn clamp_limit_bounds() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1000)), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
