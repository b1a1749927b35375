use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inkwell_db::DbPool,
    /// Server configuration (secrets, TTLs, bucket settings).
    pub config: Arc<ServerConfig>,
    /// S3 client used only to pre-sign upload URLs.
    pub s3: aws_sdk_s3::Client,
}
