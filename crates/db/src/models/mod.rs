//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs used by the repository layer

pub mod post;
pub mod session;
pub mod user;
