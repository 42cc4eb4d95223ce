//! Catalog: games and the item templates they contain.
//!
//! Deletion never cascades into inventory or listings. A game or item that
//! is still referenced by an inventory entry, a retired entry or a listing
//! is kept and the call fails with [`CoreError::ReferentialConflict`].

use bazaar_core::error::CoreError;
use bazaar_core::types::DbId;
use bazaar_db::models::game::{CreateGame, Game};
use bazaar_db::models::item::{CreateItem, Item};
use bazaar_db::repositories::{GameRepo, ItemRepo};
use bazaar_db::DbPool;

use crate::error::MarketResult;

#[derive(Clone)]
pub struct Catalog {
    pool: DbPool,
}

impl Catalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------------
    // Games
    // ---------------------------------------------------------------------

    /// Create a game. A taken name surfaces as [`CoreError::Conflict`].
    pub async fn create_game(&self, name: &str, description: &str) -> MarketResult<Game> {
        let input = CreateGame {
            name: required("Game name", name)?,
            description: description.trim().to_string(),
        };
        let game = GameRepo::create(&self.pool, &input).await?;
        tracing::info!(game_id = game.id, name = %game.name, "Game created");
        Ok(game)
    }

    pub async fn find_game(&self, id: DbId) -> MarketResult<Game> {
        GameRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "game", id }.into())
    }

    pub async fn find_game_by_name(&self, name: &str) -> MarketResult<Option<Game>> {
        Ok(GameRepo::find_by_name(&self.pool, name.trim()).await?)
    }

    pub async fn list_games(&self) -> MarketResult<Vec<Game>> {
        Ok(GameRepo::list(&self.pool).await?)
    }

    /// Delete a game together with its items, provided none of those items
    /// is referenced.
    pub async fn delete_game(&self, id: DbId) -> MarketResult<()> {
        let references = GameRepo::count_item_references(&self.pool, id).await?;
        if references > 0 {
            tracing::debug!(game_id = id, references, "Game delete rejected");
            return Err(CoreError::ReferentialConflict(format!(
                "Game {id} has items referenced by {references} inventory or listing rows"
            ))
            .into());
        }
        if !GameRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound { entity: "game", id }.into());
        }
        tracing::info!(game_id = id, "Game deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub async fn create_item(
        &self,
        game_id: DbId,
        name: &str,
        description: &str,
    ) -> MarketResult<Item> {
        let name = required("Item name", name)?;
        self.find_game(game_id).await?;

        let input = CreateItem {
            game_id,
            name,
            description: description.trim().to_string(),
        };
        let item = ItemRepo::create(&self.pool, &input).await?;
        tracing::info!(item_id = item.id, game_id, "Item created");
        Ok(item)
    }

    pub async fn find_item(&self, id: DbId) -> MarketResult<Item> {
        ItemRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "item", id }.into())
    }

    /// Item names are unique per game only; this returns the oldest match.
    pub async fn find_item_by_name(&self, name: &str) -> MarketResult<Option<Item>> {
        Ok(ItemRepo::find_by_name(&self.pool, name.trim()).await?)
    }

    pub async fn list_items(&self) -> MarketResult<Vec<Item>> {
        Ok(ItemRepo::list(&self.pool).await?)
    }

    pub async fn list_items_by_game(&self, game_id: DbId) -> MarketResult<Vec<Item>> {
        Ok(ItemRepo::list_by_game(&self.pool, game_id).await?)
    }

    pub async fn list_items_by_game_name(&self, game_name: &str) -> MarketResult<Vec<Item>> {
        Ok(ItemRepo::list_by_game_name(&self.pool, game_name.trim()).await?)
    }

    pub async fn delete_item(&self, id: DbId) -> MarketResult<()> {
        let references = ItemRepo::count_references(&self.pool, id).await?;
        if references > 0 {
            tracing::debug!(item_id = id, references, "Item delete rejected");
            return Err(CoreError::ReferentialConflict(format!(
                "Item {id} is referenced by {references} inventory or listing rows"
            ))
            .into());
        }
        if !ItemRepo::delete(&self.pool, id).await? {
            return Err(CoreError::NotFound { entity: "item", id }.into());
        }
        tracing::info!(item_id = id, "Item deleted");
        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}
