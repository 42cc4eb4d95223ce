//! Transactional marketplace core.
//!
//! Every component here is a cheap-to-clone handle over the shared
//! [`DbPool`](bazaar_db::DbPool). The store is the only synchronisation
//! point: no component keeps mutable in-process state between calls.
//!
//! - [`credentials`] -- accounts and password verification.
//! - [`sessions`] -- bearer session tokens and login history.
//! - [`catalog`] -- games and their items.
//! - [`inventory`] -- owned item instances and retired provenance.
//! - [`listings`] -- listing creation and purchase settlement.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod listings;
pub mod market;
pub mod sessions;

pub use market::Market;
