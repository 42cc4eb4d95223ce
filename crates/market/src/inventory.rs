//! Inventory Ledger: who currently owns which item instances, plus the
//! provenance of every retired entry.

use bazaar_core::error::CoreError;
use bazaar_core::filters::InventoryCriterion;
use bazaar_core::types::DbId;
use bazaar_db::models::inventory::{InventoryEntry, InventoryView, LostInventoryEntry};
use bazaar_db::repositories::{InventoryRepo, ItemRepo, UserRepo};
use bazaar_db::DbPool;
use sqlx::PgConnection;

use crate::error::MarketResult;

#[derive(Clone)]
pub struct InventoryLedger {
    pool: DbPool,
}

impl InventoryLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Give `user_id` one new instance of `item_id`.
    pub async fn grant(&self, user_id: DbId, item_id: DbId) -> MarketResult<InventoryEntry> {
        if UserRepo::find_by_id(&self.pool, user_id).await?.is_none() {
            return Err(CoreError::NotFound { entity: "user", id: user_id }.into());
        }
        if ItemRepo::find_by_id(&self.pool, item_id).await?.is_none() {
            return Err(CoreError::NotFound { entity: "item", id: item_id }.into());
        }

        let mut conn = self.pool.acquire().await?;
        let entry = InventoryRepo::create(&mut *conn, user_id, item_id).await?;
        tracing::info!(entry_id = entry.id, user_id, item_id, "Inventory granted");
        Ok(entry)
    }

    /// Everything `user_id` currently owns, oldest first.
    pub async fn list_owned(&self, user_id: DbId) -> MarketResult<Vec<InventoryEntry>> {
        Ok(InventoryRepo::list_filtered(&self.pool, &InventoryCriterion::User(user_id)).await?)
    }

    pub async fn find_entry(&self, entry_id: DbId) -> MarketResult<InventoryEntry> {
        InventoryRepo::find_by_id(&self.pool, entry_id)
            .await?
            .ok_or_else(|| CoreError::EntryNotFound(entry_id).into())
    }

    pub async fn list_all(&self) -> MarketResult<Vec<InventoryEntry>> {
        Ok(InventoryRepo::list(&self.pool).await?)
    }

    pub async fn list_filtered(
        &self,
        criterion: &InventoryCriterion,
    ) -> MarketResult<Vec<InventoryEntry>> {
        criterion.check()?;
        Ok(InventoryRepo::list_filtered(&self.pool, criterion).await?)
    }

    /// Owned entries joined with their item and game, for display.
    pub async fn owned_view(&self, user_id: DbId) -> MarketResult<Vec<InventoryView>> {
        Ok(InventoryRepo::list_view_by_user(&self.pool, user_id).await?)
    }

    /// Entries `user_id` no longer owns, most recently lost first.
    pub async fn list_lost(&self, user_id: DbId) -> MarketResult<Vec<LostInventoryEntry>> {
        Ok(InventoryRepo::list_lost_by_user(&self.pool, user_id).await?)
    }

    /// Provenance of a retired entry, by its original id.
    pub async fn lost_record(&self, entry_id: DbId) -> MarketResult<Option<LostInventoryEntry>> {
        Ok(InventoryRepo::find_lost_by_entry(&self.pool, entry_id).await?)
    }

    /// Move an entry from the active table into the lost-inventory history.
    pub async fn retire(&self, entry_id: DbId) -> MarketResult<LostInventoryEntry> {
        let mut tx = self.pool.begin().await?;
        let lost = retire_in(&mut *tx, entry_id, None).await?;
        tx.commit().await?;
        tracing::info!(entry_id, user_id = lost.user_id, "Inventory retired");
        Ok(lost)
    }
}

/// Retire an entry inside the caller's transaction and return its
/// provenance row.
///
/// With `owner` set, an entry held by anyone else counts as missing. Of
/// several concurrent callers on the same entry exactly one succeeds; the
/// rest get [`CoreError::EntryNotFound`].
pub(crate) async fn retire_in(
    conn: &mut PgConnection,
    entry_id: DbId,
    owner: Option<DbId>,
) -> MarketResult<LostInventoryEntry> {
    let taken = match owner {
        Some(user_id) => InventoryRepo::take_owned(&mut *conn, entry_id, user_id).await?,
        None => InventoryRepo::take(&mut *conn, entry_id).await?,
    };
    let entry = taken.ok_or(CoreError::EntryNotFound(entry_id))?;
    Ok(InventoryRepo::record_lost(&mut *conn, &entry).await?)
}
