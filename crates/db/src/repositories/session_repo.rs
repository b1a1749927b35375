//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, refresh_token_hash, user_agent, ip_address, \
                        device_id, is_valid, expires_at, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session with a caller-generated id, returning the row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions
                 (id, user_id, refresh_token_hash, user_agent, ip_address, device_id, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .bind(&input.device_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id, excluding rows past their expiry.
    ///
    /// Expired rows are never read; they wait for [`Self::cleanup_expired`].
    /// Revoked rows ARE returned so the caller can distinguish a revoked
    /// session from a missing one if it needs to.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE id = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a session invalid. Returns `true` if a row was updated.
    ///
    /// Safe to call for an already-invalid or nonexistent session; logout
    /// relies on this being idempotent.
    pub async fn invalidate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_valid = false, updated_at = NOW()
             WHERE id = $1 AND is_valid = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or invalidated sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_valid = false")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
