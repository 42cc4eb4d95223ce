//! Listing & Settlement Engine.
//!
//! Listing creation retires the source inventory entry and inserts the
//! listing in one transaction. Settlement debits the buyer, credits the
//! seller, closes the listing, records the sale and grants the buyer a new
//! inventory entry, all in one transaction.
//!
//! The conditional `UPDATE listings SET sold = true ... AND sold = false` is
//! the authoritative guard against double settlement; the earlier read of the
//! listing only produces friendlier errors.

use bazaar_core::error::CoreError;
use bazaar_core::filters::ListingQuery;
use bazaar_core::types::{DbId, Money, Timestamp};
use bazaar_core::validation::validate_price;
use bazaar_db::models::listing::{CreateListing, Listing, SoldListing};
use bazaar_db::repositories::{InventoryRepo, ListingRepo, UserRepo};
use bazaar_db::DbPool;
use serde::Serialize;

use crate::error::MarketResult;
use crate::inventory::retire_in;

/// Outcome of a settled purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub listing_id: DbId,
    pub item_id: DbId,
    pub seller_id: DbId,
    pub buyer_id: DbId,
    pub price: Money,
    /// The inventory entry granted to the buyer.
    pub entry_id: DbId,
    pub bought_at: Timestamp,
    pub buyer_balance: Money,
    pub seller_balance: Money,
}

#[derive(Clone)]
pub struct ListingEngine {
    pool: DbPool,
}

impl ListingEngine {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List an inventory entry for sale on behalf of its owner.
    pub async fn create_listing_from_inventory(
        &self,
        entry_id: DbId,
        price: Money,
    ) -> MarketResult<Listing> {
        self.open_listing(entry_id, None, price).await
    }

    /// Like [`create_listing_from_inventory`](Self::create_listing_from_inventory),
    /// but an entry not owned by `seller_id` counts as missing.
    pub async fn list_owned_entry(
        &self,
        seller_id: DbId,
        entry_id: DbId,
        price: Money,
    ) -> MarketResult<Listing> {
        self.open_listing(entry_id, Some(seller_id), price).await
    }

    async fn open_listing(
        &self,
        entry_id: DbId,
        owner: Option<DbId>,
        price: Money,
    ) -> MarketResult<Listing> {
        validate_price(price)?;

        let mut tx = self.pool.begin().await?;
        let retired = retire_in(&mut *tx, entry_id, owner).await?;
        let input = CreateListing {
            item_id: retired.item_id,
            seller_id: retired.user_id,
            price,
            source_entry_id: Some(retired.entry_id),
        };
        let listing = ListingRepo::create(&mut *tx, &input).await?;
        tx.commit().await?;

        tracing::info!(
            listing_id = listing.id,
            entry_id,
            seller_id = listing.seller_id,
            price = %listing.price,
            "Listing created"
        );
        Ok(listing)
    }

    pub async fn get_listing(&self, listing_id: DbId) -> MarketResult<Listing> {
        ListingRepo::find_by_id(&self.pool, listing_id)
            .await?
            .ok_or_else(|| CoreError::ListingNotFound(listing_id).into())
    }

    /// Every listing, sold ones included.
    pub async fn get_all_listings(&self) -> MarketResult<Vec<Listing>> {
        Ok(ListingRepo::list(&self.pool).await?)
    }

    pub async fn get_filtered_listings(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>> {
        query.criterion.check()?;
        Ok(ListingRepo::list_filtered(&self.pool, query).await?)
    }

    /// The sale record of a listing, if it has settled.
    pub async fn sale_record(&self, listing_id: DbId) -> MarketResult<Option<SoldListing>> {
        Ok(ListingRepo::find_sale(&self.pool, listing_id).await?)
    }

    /// Everything `buyer_id` has bought, most recent first.
    pub async fn purchases_of(&self, buyer_id: DbId) -> MarketResult<Vec<SoldListing>> {
        Ok(ListingRepo::list_sales_by_buyer(&self.pool, buyer_id).await?)
    }

    /// Buy a listing.
    ///
    /// Fails with `ListingNotFound`, `AlreadySold`, `SellerEqualsBuyer` or
    /// `InsufficientFunds` without touching anything. On success every effect
    /// of the trade is committed together.
    pub async fn buy(&self, listing_id: DbId, buyer_id: DbId) -> MarketResult<Receipt> {
        let mut tx = self.pool.begin().await?;

        let listing = ListingRepo::find_in(&mut *tx, listing_id)
            .await?
            .ok_or(CoreError::ListingNotFound(listing_id))?;
        if listing.sold {
            return Err(CoreError::AlreadySold(listing_id).into());
        }
        if listing.seller_id == buyer_id {
            return Err(CoreError::SellerEqualsBuyer.into());
        }

        // Row locks in ascending id order; two opposite trades cannot
        // deadlock on each other.
        let balances = UserRepo::lock_balances(&mut *tx, &[buyer_id, listing.seller_id]).await?;
        let available = balances
            .iter()
            .find(|row| row.id == buyer_id)
            .map(|row| row.balance)
            .ok_or(CoreError::NotFound { entity: "user", id: buyer_id })?;
        if available < listing.price {
            tracing::debug!(listing_id, buyer_id, price = %listing.price, %available, "Purchase rejected");
            return Err(CoreError::InsufficientFunds {
                needed: listing.price,
                available,
            }
            .into());
        }

        if !ListingRepo::mark_sold(&mut *tx, listing_id).await? {
            tracing::debug!(listing_id, buyer_id, "Lost the race for a listing");
            return Err(CoreError::AlreadySold(listing_id).into());
        }

        let buyer_balance = UserRepo::debit(&mut *tx, buyer_id, listing.price)
            .await?
            .ok_or(CoreError::InsufficientFunds {
                needed: listing.price,
                available,
            })?;
        let seller_balance = UserRepo::credit(&mut *tx, listing.seller_id, listing.price)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: listing.seller_id,
            })?;
        let sale = ListingRepo::record_sale(&mut *tx, listing_id, buyer_id).await?;
        let entry = InventoryRepo::create(&mut *tx, buyer_id, listing.item_id).await?;

        tx.commit().await?;

        tracing::info!(
            listing_id,
            buyer_id,
            seller_id = listing.seller_id,
            price = %listing.price,
            entry_id = entry.id,
            "Listing settled"
        );

        Ok(Receipt {
            listing_id,
            item_id: listing.item_id,
            seller_id: listing.seller_id,
            buyer_id,
            price: listing.price,
            entry_id: entry.id,
            bought_at: sale.bought_at,
            buyer_balance,
            seller_balance,
        })
    }
}
