//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `inkwell_db` and
//! map errors via [`crate::error::AppError`].

pub mod auth;
pub mod health;
pub mod posts;
pub mod uploads;
