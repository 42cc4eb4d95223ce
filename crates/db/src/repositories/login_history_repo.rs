//! Repository for the append-only `login_history` table.

use bazaar_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateLoginHistory, LoginHistory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, user_id, browser, platform, login_at";

/// Append and read login audit rows. There is no update or delete.
pub struct LoginHistoryRepo;

impl LoginHistoryRepo {
    /// Append a login record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLoginHistory,
    ) -> Result<LoginHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO login_history (session_id, user_id, browser, platform)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoginHistory>(&query)
            .bind(&input.session_id)
            .bind(input.user_id)
            .bind(&input.browser)
            .bind(&input.platform)
            .fetch_one(pool)
            .await
    }

    /// List a user's logins, most recent first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LoginHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM login_history WHERE user_id = $1 ORDER BY login_at DESC, id DESC"
        );
        sqlx::query_as::<_, LoginHistory>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
