//! Repository for the `items` table.

use bazaar_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, game_id, name, description, created_at, updated_at";

/// Provides CRUD operations for item templates.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (game_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(input.game_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an item by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the first item (lowest id) carrying the given name.
    ///
    /// Names are only unique within a game.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE name = $1 ORDER BY id LIMIT 1");
        sqlx::query_as::<_, Item>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all items ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY id");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// List the items of one game.
    pub async fn list_by_game(pool: &PgPool, game_id: DbId) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE game_id = $1 ORDER BY id");
        sqlx::query_as::<_, Item>(&query)
            .bind(game_id)
            .fetch_all(pool)
            .await
    }

    /// List the items of the game with the given name.
    pub async fn list_by_game_name(
        pool: &PgPool,
        game_name: &str,
    ) -> Result<Vec<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(
            "SELECT i.id, i.game_id, i.name, i.description, i.created_at, i.updated_at
             FROM items i
             JOIN games g ON g.id = i.game_id
             WHERE g.name = $1
             ORDER BY i.id",
        )
        .bind(game_name)
        .fetch_all(pool)
        .await
    }

    /// Count inventory, lost-inventory and listing rows pointing at the item.
    pub async fn count_references(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT
                (SELECT COUNT(*) FROM inventory_items WHERE item_id = $1)
              + (SELECT COUNT(*) FROM lost_inventory_items WHERE item_id = $1)
              + (SELECT COUNT(*) FROM listings WHERE item_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete an item. Returns `true` if a row was removed. Fails with a
    /// foreign-key violation if the item is referenced.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
