//! Item template model and DTOs.

use bazaar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `items` table. Items are templates, not owned instances.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub game_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new item under a game.
#[derive(Debug, Deserialize)]
pub struct CreateItem {
    pub game_id: DbId,
    pub name: String,
    pub description: String,
}
