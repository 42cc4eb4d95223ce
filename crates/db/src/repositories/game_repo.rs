//! Repository for the `games` table.

use bazaar_core::types::DbId;
use sqlx::PgPool;

use crate::models::game::{CreateGame, Game};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD operations for games.
pub struct GameRepo;

impl GameRepo {
    /// Insert a new game, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGame) -> Result<Game, sqlx::Error> {
        let query = format!(
            "INSERT INTO games (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a game by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE id = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a game by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE name = $1");
        sqlx::query_as::<_, Game>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all games ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games ORDER BY name");
        sqlx::query_as::<_, Game>(&query).fetch_all(pool).await
    }

    /// Count inventory, lost-inventory and listing rows that point at any
    /// item of this game.
    pub async fn count_item_references(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT
                (SELECT COUNT(*) FROM inventory_items x JOIN items i ON i.id = x.item_id WHERE i.game_id = $1)
              + (SELECT COUNT(*) FROM lost_inventory_items x JOIN items i ON i.id = x.item_id WHERE i.game_id = $1)
              + (SELECT COUNT(*) FROM listings x JOIN items i ON i.id = x.item_id WHERE i.game_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a game and, by cascade, its items. Returns `true` if a row was
    /// removed. Fails with a foreign-key violation if an item is in use.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
