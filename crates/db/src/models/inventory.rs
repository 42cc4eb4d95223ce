//! Inventory ledger models.

use bazaar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One unit of ownership: a row from `inventory_items`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct InventoryEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    pub obtained_on: Timestamp,
}

/// A retired entry from `lost_inventory_items`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LostInventoryEntry {
    pub id: DbId,
    pub entry_id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    pub obtained_on: Timestamp,
    pub lost_on: Timestamp,
}

/// Display row joining an entry with its item, game and owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryView {
    pub id: DbId,
    pub game_name: String,
    pub username: String,
    pub item_name: String,
    pub item_description: String,
    pub obtained_on: Timestamp,
}
