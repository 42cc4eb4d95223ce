//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts

pub mod game;
pub mod inventory;
pub mod item;
pub mod listing;
pub mod session;
pub mod user;
