//! User session model and DTOs.

use inkwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use uuid::Uuid;

/// A session row from the `user_sessions` table.
///
/// One row per login. The refresh token itself is never stored; only its
/// SHA-256 hash, so a database leak does not yield usable tokens.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub device_id: Option<String>,
    pub is_valid: bool,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
///
/// The id is supplied by the caller: it must be generated before the refresh
/// token is minted, because the token embeds it. This lets the row be
/// inserted once with its final hash -- no placeholder state.
pub struct CreateSession {
    pub id: Uuid,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub device_id: Option<String>,
    pub expires_at: Timestamp,
}
