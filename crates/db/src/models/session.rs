//! Session and login-history models.

use bazaar_core::session::{state_at, SessionState};
use bazaar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sessions` table. `id` is the token digest, never the
/// plaintext token.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl Session {
    pub fn state_at(&self, now: Timestamp) -> SessionState {
        state_at(self.expires_at, now)
    }
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub id: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

/// An immutable login audit row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoginHistory {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub session_id: String,
    pub user_id: DbId,
    pub browser: String,
    pub platform: String,
    pub login_at: Timestamp,
}

/// DTO for appending a login audit row.
pub struct CreateLoginHistory {
    pub session_id: String,
    pub user_id: DbId,
    pub browser: String,
    pub platform: String,
}
