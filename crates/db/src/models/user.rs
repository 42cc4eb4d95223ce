//! User entity model and DTOs.

use bazaar_core::roles::UserRole;
use bazaar_core::types::{DbId, Money, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Carries the password hash and is therefore not `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub balance: Money,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The typed role. The `ck_users_role` constraint keeps the column valid.
    pub fn role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or_default()
    }
}

/// DTO for creating a new user. `password_hash` is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub balance: Money,
    pub role: UserRole,
}

/// Balance snapshot of one account, read under a row lock.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct BalanceRow {
    pub id: DbId,
    pub balance: Money,
}
