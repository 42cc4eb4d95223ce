//! Listing and settlement models.

use bazaar_core::types::{DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `listings` table. Listings are never deleted once sold;
/// `sold` flips from `false` to `true` exactly once.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub item_id: DbId,
    pub seller_id: DbId,
    pub price: Money,
    pub list_date: Timestamp,
    pub sold: bool,
    pub source_entry_id: Option<DbId>,
}

/// DTO for creating a listing.
pub struct CreateListing {
    pub item_id: DbId,
    pub seller_id: DbId,
    pub price: Money,
    pub source_entry_id: Option<DbId>,
}

/// A row from `sold_listings`, appended when a listing settles.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SoldListing {
    pub listing_id: DbId,
    pub buyer_id: DbId,
    pub bought_at: Timestamp,
}
