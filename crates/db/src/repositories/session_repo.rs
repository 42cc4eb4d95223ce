//! Repository for the `sessions` table.

use bazaar_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::session::{CreateSession, Session};
use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, expires_at, created_at";

/// Provides create, lookup and tombstone operations for sessions.
///
/// Sessions are never deleted here: expiring one moves `expires_at` back to
/// the given instant and keeps the row.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    ///
    /// Fails with a unique violation if `input.id` collides with an existing
    /// session.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (id, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(&input.id)
            .bind(input.user_id)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by digest regardless of its state.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the owner of a session that is still active at `now`.
    pub async fn find_active_user(
        pool: &PgPool,
        id: &str,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.display_name, u.password_hash, u.balance, u.role,
                    u.created_at, u.updated_at
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.id = $1 AND s.expires_at > $2",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(pool)
        .await
    }

    /// List every session of a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions WHERE user_id = $1 ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Tombstone a session at `now`. Returns `true` if an active session was
    /// expired; unknown or already-expired sessions are left untouched.
    pub async fn expire(pool: &PgPool, id: &str, now: Timestamp) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1 AND expires_at > $2")
                .bind(id)
                .bind(now)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tombstone every active session of a user. Returns the count expired.
    pub async fn expire_all_for_user(
        conn: &mut PgConnection,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET expires_at = $2 WHERE user_id = $1 AND expires_at > $2",
        )
        .bind(user_id)
        .bind(now)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
