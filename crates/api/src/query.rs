//! Shared query parameter types for API handlers.

use inkwell_core::types::DbId;
use serde::Deserialize;

/// Pagination parameters for post listings (`?page=&limit=&author_id=`).
///
/// Values are clamped in the repository layer via `clamp_page` / `clamp_limit`.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Optional filter: only posts by this author.
    pub author_id: Option<DbId>,
}
