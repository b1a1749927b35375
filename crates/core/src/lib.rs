//! Shared domain types and error taxonomy for the Inkwell backend.
//!
//! This crate is I/O-free. It holds what every other crate agrees on:
//! id/timestamp aliases and the [`error::CoreError`] taxonomy that the API
//! layer translates into HTTP responses.

pub mod error;
pub mod types;
