//! Repository for the `users` table.

use bazaar_core::roles::UserRole;
use bazaar_core::types::{DbId, Money};
use sqlx::{PgConnection, PgPool};

use crate::models::user::{BalanceRow, CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, display_name, password_hash, balance, role, \
                        created_at, updated_at";

/// Provides CRUD and balance operations for users.
///
/// Balance mutations take a `&mut PgConnection` so they can only run inside
/// a caller-owned transaction.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name, password_hash, balance, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(input.balance)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Replace username and display name.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        username: &str,
        display_name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET username = $2, display_name = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(username)
            .bind(display_name)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a user's role. Returns `None` if the user does not exist.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role: UserRole,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Lock the given accounts for update, always in ascending id order, and
    /// return their balances. Missing ids are simply absent from the result.
    pub async fn lock_balances(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<BalanceRow>, sqlx::Error> {
        sqlx::query_as::<_, BalanceRow>(
            "SELECT id, balance FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }

    /// Subtract `amount` from a balance, only if the balance covers it.
    ///
    /// Returns the new balance, or `None` when the guard rejected the debit
    /// (or the user does not exist).
    pub async fn debit(
        conn: &mut PgConnection,
        id: DbId,
        amount: Money,
    ) -> Result<Option<Money>, sqlx::Error> {
        sqlx::query_scalar::<_, Money>(
            "UPDATE users SET balance = balance - $2
             WHERE id = $1 AND balance >= $2
             RETURNING balance",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(conn)
        .await
    }

    /// Add `amount` to a balance. Returns the new balance, or `None` if the
    /// user does not exist.
    pub async fn credit(
        conn: &mut PgConnection,
        id: DbId,
        amount: Money,
    ) -> Result<Option<Money>, sqlx::Error> {
        sqlx::query_scalar::<_, Money>(
            "UPDATE users SET balance = balance + $2 WHERE id = $1 RETURNING balance",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(conn)
        .await
    }

    /// Sum of every balance in the system.
    pub async fn total_balance(pool: &PgPool) -> Result<Money, sqlx::Error> {
        sqlx::query_scalar::<_, Money>("SELECT COALESCE(SUM(balance), 0)::NUMERIC(14, 2) FROM users")
            .fetch_one(pool)
            .await
    }

    /// Hard-delete a user row. Dependent sessions, login history and
    /// inventory cascade; listings and sales restrict.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
