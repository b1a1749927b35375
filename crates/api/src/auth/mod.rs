//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access/refresh token issuance, verification, and refresh-token hashing.

pub mod jwt;
pub mod password;
