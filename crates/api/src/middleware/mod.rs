//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token resolving to a live user.
//! - [`auth::MaybeAuthUser`] -- Infallible variant for public endpoints that
//!   behave differently for logged-in callers.

pub mod auth;
