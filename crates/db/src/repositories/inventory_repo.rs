//! Repository for the `inventory_items` and `lost_inventory_items` tables.

use bazaar_core::filters::InventoryCriterion;
use bazaar_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::inventory::{InventoryEntry, InventoryView, LostInventoryEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, item_id, obtained_on";

/// Column list for `lost_inventory_items`.
const LOST_COLUMNS: &str = "id, entry_id, user_id, item_id, obtained_on, lost_on";

/// Joined display columns; expects aliases `x` (entry), `i`, `g`, `u`.
const VIEW_SELECT: &str = "SELECT x.id, g.name AS game_name, u.username, \
        i.name AS item_name, i.description AS item_description, x.obtained_on \
     FROM inventory_items x \
     JOIN items i ON i.id = x.item_id \
     JOIN games g ON g.id = i.game_id \
     JOIN users u ON u.id = x.user_id";

/// Tracks owned item instances and the provenance of retired ones.
///
/// Writes take a `&mut PgConnection` so they compose into settlement and
/// listing transactions.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Grant `item_id` to `user_id`, timestamped now.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        item_id: DbId,
    ) -> Result<InventoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items (user_id, item_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_one(conn)
            .await
    }

    /// Find an owned entry by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1");
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every currently-owned entry.
    pub async fn list(pool: &PgPool) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items ORDER BY id");
        sqlx::query_as::<_, InventoryEntry>(&query)
            .fetch_all(pool)
            .await
    }

    /// Entries matching one criterion, oldest first.
    pub async fn list_filtered(
        pool: &PgPool,
        criterion: &InventoryCriterion,
    ) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        match criterion {
            InventoryCriterion::User(user_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM inventory_items WHERE user_id = $1 \
                     ORDER BY obtained_on, id"
                );
                sqlx::query_as::<_, InventoryEntry>(&query)
                    .bind(user_id)
                    .fetch_all(pool)
                    .await
            }
            InventoryCriterion::UserAndItem { user_id, item_id } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM inventory_items WHERE user_id = $1 AND item_id = $2 \
                     ORDER BY obtained_on, id"
                );
                sqlx::query_as::<_, InventoryEntry>(&query)
                    .bind(user_id)
                    .bind(item_id)
                    .fetch_all(pool)
                    .await
            }
            InventoryCriterion::Item(item_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM inventory_items WHERE item_id = $1 \
                     ORDER BY obtained_on, id"
                );
                sqlx::query_as::<_, InventoryEntry>(&query)
                    .bind(item_id)
                    .fetch_all(pool)
                    .await
            }
            InventoryCriterion::ObtainedRange { from, to } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM inventory_items WHERE obtained_on BETWEEN $1 AND $2 \
                     ORDER BY obtained_on, id"
                );
                sqlx::query_as::<_, InventoryEntry>(&query)
                    .bind(from)
                    .bind(to)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Joined display rows for one owner.
    pub async fn list_view_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<InventoryView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE x.user_id = $1 ORDER BY x.obtained_on, x.id");
        sqlx::query_as::<_, InventoryView>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Remove an entry from the active table and return it.
    ///
    /// `DELETE ... RETURNING` makes the removal its own guard: of two
    /// concurrent callers only one gets the row back.
    pub async fn take(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!("DELETE FROM inventory_items WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Like [`take`](Self::take) but only if the entry belongs to `user_id`.
    pub async fn take_owned(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "DELETE FROM inventory_items WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Append the provenance row for a retired entry.
    pub async fn record_lost(
        conn: &mut PgConnection,
        entry: &InventoryEntry,
    ) -> Result<LostInventoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO lost_inventory_items (entry_id, user_id, item_id, obtained_on)
             VALUES ($1, $2, $3, $4)
             RETURNING {LOST_COLUMNS}"
        );
        sqlx::query_as::<_, LostInventoryEntry>(&query)
            .bind(entry.id)
            .bind(entry.user_id)
            .bind(entry.item_id)
            .bind(entry.obtained_on)
            .fetch_one(conn)
            .await
    }

    /// Find the provenance row of a retired entry by its original id.
    pub async fn find_lost_by_entry(
        pool: &PgPool,
        entry_id: DbId,
    ) -> Result<Option<LostInventoryEntry>, sqlx::Error> {
        let query = format!("SELECT {LOST_COLUMNS} FROM lost_inventory_items WHERE entry_id = $1");
        sqlx::query_as::<_, LostInventoryEntry>(&query)
            .bind(entry_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's retired entries, most recently lost first.
    pub async fn list_lost_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<LostInventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {LOST_COLUMNS} FROM lost_inventory_items WHERE user_id = $1 \
             ORDER BY lost_on DESC, id DESC"
        );
        sqlx::query_as::<_, LostInventoryEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
