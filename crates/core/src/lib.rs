//! Domain layer of the bazaar marketplace.
//!
//! Pure types, rules and validation shared by the store and service crates.
//! Nothing in here performs I/O.

pub mod error;
pub mod filters;
pub mod roles;
pub mod session;
pub mod types;
pub mod user_agent;
pub mod validation;
