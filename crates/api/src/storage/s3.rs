//! S3 pre-signed upload URL generation.
//!
//! The backend never proxies file bytes. Clients request a pre-signed
//! PutObject URL, upload directly to the bucket, and then reference the
//! object's public URL in their post. Pre-signing is a local HMAC
//! operation; no network round-trip to AWS is involved.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use crate::error::AppError;

/// Default pre-signed URL lifetime in seconds.
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 180;

/// Object storage configuration for pre-signed uploads.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Target bucket name.
    pub bucket: String,
    /// AWS region (used for the public object URL).
    pub region: String,
    /// Pre-signed URL lifetime in seconds (default: 180).
    pub presign_expiry_secs: u64,
}

impl S3Config {
    /// Load S3 configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `AWS_BUCKET_NAME`     | **yes**  | --      |
    /// | `AWS_REGION`          | **yes**  | --      |
    /// | `PRESIGN_EXPIRY_SECS` | no       | `180`   |
    ///
    /// # Panics
    ///
    /// Panics if the bucket name or region is not set.
    pub fn from_env() -> Self {
        let bucket = std::env::var("AWS_BUCKET_NAME")
            .expect("AWS_BUCKET_NAME must be set in the environment");
        let region =
            std::env::var("AWS_REGION").expect("AWS_REGION must be set in the environment");

        let presign_expiry_secs: u64 = std::env::var("PRESIGN_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_PRESIGN_EXPIRY_SECS.to_string())
            .parse()
            .expect("PRESIGN_EXPIRY_SECS must be a valid u64");

        Self {
            bucket,
            region,
            presign_expiry_secs,
        }
    }

    /// Public URL of an object after a successful upload.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

/// Build the S3 client from the ambient AWS environment (credentials chain,
/// region). Called once at startup; the client is carried in `AppState`.
pub async fn build_client(config: &S3Config) -> Client {
    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new(config.region.clone()))
        .load()
        .await;
    Client::new(&shared)
}

/// Generate a pre-signed PutObject URL for `key` with the given content type.
pub async fn presign_put(
    client: &Client,
    config: &S3Config,
    key: &str,
    content_type: &str,
) -> Result<String, AppError> {
    let presigning = PresigningConfig::expires_in(Duration::from_secs(config.presign_expiry_secs))
        .map_err(|e| AppError::InternalError(format!("Invalid presign expiry: {e}")))?;

    let request = client
        .put_object()
        .bucket(&config.bucket)
        .key(key)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| AppError::InternalError(format!("Presigning error: {e}")))?;

    Ok(request.uri().to_string())
}

/// Map an image file extension to its MIME content type.
///
/// Only image uploads are allowed; anything else is rejected upstream.
pub fn image_content_type(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
