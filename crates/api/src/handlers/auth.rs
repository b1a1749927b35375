//! Handlers for the `/auth` resource (register, login, refresh, logout).
//!
//! This is the session manager: it orchestrates the token codec and the
//! session repository, enforcing device binding and the revocation policy.
//! All store calls are plain sequential awaits; sessions are keyed by
//! client-generated UUIDs so concurrent logins never contend, and a
//! refresh/logout race on one session resolves last-write-wins.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use inkwell_core::error::CoreError;
use inkwell_db::models::session::CreateSession;
use inkwell_db::models::user::{CreateUser, UserResponse};
use inkwell_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{
    hash_refresh_token, issue_access_token, issue_refresh_token, verify_refresh_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::device::DeviceInfo;
use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "must be 6 to 128 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "is required"))]
    pub password: String,
}

/// Request body for refresh and logout. The token is optional so a missing
/// field maps to 400 rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// Access + refresh token pair minted at login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response for a successful refresh: a new access token only.
///
/// The refresh token is deliberately not rotated; the one presented stays
/// valid until its own expiry or logout.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account. Returns 409 if the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Creates one session row for this
/// login and returns access + refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    device: DeviceInfo,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    // Unknown email and wrong password must be indistinguishable to the
    // caller, so both take the same error path.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    // Generate the session id before minting the refresh token that embeds
    // it, then hash the token and insert the row once with its final hash.
    // There is no transient placeholder state to crash out of.
    let session_id = Uuid::new_v4();
    let refresh_token = issue_refresh_token(user.id, session_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let access_token = issue_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            id: session_id,
            user_id: user.id,
            refresh_token_hash: hash_refresh_token(&refresh_token),
            user_agent: Some(device.user_agent),
            ip_address: device.ip,
            device_id: device.device_id,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, %session_id, "User logged in");

    Ok(Json(LoginResponse {
        user: UserResponse::from(&user),
        tokens: TokenPair {
            access_token,
            refresh_token,
        },
    }))
}

/// POST /api/v1/auth/refresh-token
///
/// Exchange a valid refresh token for a fresh access token. The refresh
/// token itself is not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    device: DeviceInfo,
    Json(input): Json<RefreshTokenRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let refresh_token = require_token(&input)?;

    let claims = verify_refresh_token(refresh_token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    })?;

    // Missing, expired, and revoked sessions all collapse into one error.
    let session = SessionRepo::find_by_id(&state.pool, claims.sid)
        .await?
        .filter(|s| s.is_valid)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Session invalid".into())))?;

    // Device binding: the user-agent must match what was seen at login, and
    // a device id captured at login must be presented again unchanged.
    let ua_mismatch = session.user_agent.as_deref() != Some(device.user_agent.as_str());
    let device_id_mismatch =
        session.device_id.is_some() && session.device_id != device.device_id;
    if ua_mismatch || device_id_mismatch {
        tracing::warn!(session_id = %session.id, "Refresh rejected: device mismatch");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Token not valid for this device".into(),
        )));
    }

    // Only the session owner can present a token hashing to the stored
    // value; a mismatch means reuse of a stale token or forgery.
    if hash_refresh_token(refresh_token) != session.refresh_token_hash {
        tracing::warn!(session_id = %session.id, "Refresh rejected: token hash mismatch");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid refresh token".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: session.user_id,
        }))?;

    let access_token = issue_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/v1/auth/logout
///
/// Invalidate the session the refresh token belongs to. Idempotent: an
/// already-invalid or missing session still yields 200.
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<RefreshTokenRequest>,
) -> AppResult<Json<MessageResponse>> {
    let refresh_token = require_token(&input)?;

    let claims = verify_refresh_token(refresh_token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid refresh token".into())))?;

    let revoked = SessionRepo::invalidate(&state.pool, claims.sid).await?;
    if revoked {
        tracing::info!(user_id = claims.sub, session_id = %claims.sid, "User logged out");
    }

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Extract a non-empty refresh token from the request body, or 400.
fn require_token(input: &RefreshTokenRequest) -> Result<&str, AppError> {
    input
        .refresh_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh token is required".into()))
}
