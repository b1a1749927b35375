//! Access- and refresh-token codec.
//!
//! Both token kinds are HS256-signed JWTs over *distinct* secrets, so one
//! kind can never be presented where the other is expected. Access tokens
//! carry the user id and email; refresh tokens carry the user id plus the
//! id of the session they belong to. Refresh tokens are stored server-side
//! only as a SHA-256 hash, so a database leak does not yield usable tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use inkwell_core::types::DbId;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issuance time.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The session this token belongs to.
    pub sid: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from the access secret.
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `ACCESS_TOKEN_SECRET`        | **yes**  | --      |
    /// | `REFRESH_TOKEN_SECRET`       | **yes**  | --      |
    /// | `ACCESS_TOKEN_EXPIRY_MINS`   | no       | `15`    |
    /// | `REFRESH_TOKEN_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if either secret is missing or empty.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in the environment");
        assert!(
            !access_secret.is_empty(),
            "ACCESS_TOKEN_SECRET must not be empty"
        );

        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in the environment");
        assert!(
            !refresh_secret.is_empty(),
            "REFRESH_TOKEN_SECRET must not be empty"
        );

        let access_token_expiry_mins: i64 = std::env::var("ACCESS_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_EXPIRY_DAYS must be a valid i64");

        Self {
            access_secret,
            refresh_secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn issue_access_token(
    user_id: DbId,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id,
        email: email.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
}

/// Generate an HS256 refresh token bound to one session.
///
/// The session id must already exist (or be about to be inserted), since the
/// refresh flow looks the session up by the embedded `sid` claim.
pub fn issue_refresh_token(
    user_id: DbId,
    session_id: Uuid,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id,
        sid: session_id,
        exp: now + config.refresh_token_expiry_days * 24 * 60 * 60,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`AccessClaims`].
///
/// Validates the signature and expiration automatically. A refresh token
/// presented here fails: it is signed with the other secret.
pub fn verify_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Validate and decode a refresh token, returning the embedded [`RefreshClaims`].
pub fn verify_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a refresh token.
///
/// This is what gets persisted and what an incoming token is compared against.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with known secrets.
    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-long-enough-for-hmac".to_string(),
            refresh_secret: "refresh-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let token = issue_access_token(42, "a@x.com", &config)
            .expect("token generation should succeed");

        let claims = verify_access_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trip() {
        let config = test_config();
        let sid = Uuid::new_v4();
        let token =
            issue_refresh_token(7, sid, &config).expect("token generation should succeed");

        let claims = verify_refresh_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.sid, sid);
    }

    /// Access and refresh secrets must never be interchangeable.
    #[test]
    fn key_classes_are_distinct() {
        let config = test_config();

        let access = issue_access_token(1, "a@x.com", &config).unwrap();
        assert!(
            verify_refresh_token(&access, &config).is_err(),
            "access token must not verify as a refresh token"
        );

        let refresh = issue_refresh_token(1, Uuid::new_v4(), &config).unwrap();
        assert!(
            verify_access_token(&refresh, &config).is_err(),
            "refresh token must not verify as an access token"
        );
    }

    /// Flipping a single character anywhere in the token invalidates it.
    #[test]
    fn tampered_token_fails() {
        let config = test_config();
        let token = issue_access_token(1, "a@x.com", &config).unwrap();

        let mut bytes = token.into_bytes();
        let i = bytes.len() / 2;
        bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(verify_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn expired_access_token_fails() {
        let config = test_config();

        // Manually create an already-expired token, well past the default
        // 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            email: "a@x.com".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(verify_access_token(&token, &config).is_err());
    }

    #[test]
    fn refresh_token_hash_is_stable() {
        let config = test_config();
        let token = issue_refresh_token(1, Uuid::new_v4(), &config).unwrap();

        let h1 = hash_refresh_token(&token);
        let h2 = hash_refresh_token(&token);
        assert_eq!(h1, h2);
        // SHA-256 hex digest is 64 characters.
        assert_eq!(h1.len(), 64);
    }
}
