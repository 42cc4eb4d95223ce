//! Repository for the `listings` and `sold_listings` tables.

use bazaar_core::filters::{ListingCriterion, ListingQuery};
use bazaar_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::listing::{CreateListing, Listing, SoldListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, item_id, seller_id, price, list_date, sold, source_entry_id";

/// Column list for `sold_listings`.
const SALE_COLUMNS: &str = "listing_id, buyer_id, bought_at";

/// Provides listing reads plus the write primitives the settlement
/// transaction is built from.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new unsold listing, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings (item_id, seller_id, price, source_entry_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.item_id)
            .bind(input.seller_id)
            .bind(input.price)
            .bind(input.source_entry_id)
            .fetch_one(conn)
            .await
    }

    /// Find a listing by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Same as [`find_by_id`](Self::find_by_id) on a transaction connection.
    pub async fn find_in(conn: &mut PgConnection, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// All listings, sold ones included, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings ORDER BY list_date, id");
        sqlx::query_as::<_, Listing>(&query).fetch_all(pool).await
    }

    /// Listings matching a criterion. Sold listings are included unless
    /// `query.exclude_sold` is set.
    pub async fn list_filtered(
        pool: &PgPool,
        query: &ListingQuery,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let exclude_sold = query.exclude_sold;
        match &query.criterion {
            ListingCriterion::All => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM listings WHERE (NOT $1 OR sold = false) \
                     ORDER BY list_date, id"
                );
                sqlx::query_as::<_, Listing>(&sql)
                    .bind(exclude_sold)
                    .fetch_all(pool)
                    .await
            }
            ListingCriterion::Item(item_id) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM listings WHERE item_id = $1 AND (NOT $2 OR sold = false) \
                     ORDER BY list_date, id"
                );
                sqlx::query_as::<_, Listing>(&sql)
                    .bind(item_id)
                    .bind(exclude_sold)
                    .fetch_all(pool)
                    .await
            }
            ListingCriterion::Seller(seller_id) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM listings WHERE seller_id = $1 AND (NOT $2 OR sold = false) \
                     ORDER BY list_date, id"
                );
                sqlx::query_as::<_, Listing>(&sql)
                    .bind(seller_id)
                    .bind(exclude_sold)
                    .fetch_all(pool)
                    .await
            }
            ListingCriterion::PriceRange { min, max } => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM listings WHERE price BETWEEN $1 AND $2 \
                       AND (NOT $3 OR sold = false) \
                     ORDER BY price, list_date, id"
                );
                sqlx::query_as::<_, Listing>(&sql)
                    .bind(min)
                    .bind(max)
                    .bind(exclude_sold)
                    .fetch_all(pool)
                    .await
            }
            ListingCriterion::ListDateRange { from, to } => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM listings WHERE list_date BETWEEN $1 AND $2 \
                       AND (NOT $3 OR sold = false) \
                     ORDER BY list_date, id"
                );
                sqlx::query_as::<_, Listing>(&sql)
                    .bind(from)
                    .bind(to)
                    .bind(exclude_sold)
                    .fetch_all(pool)
                    .await
            }
            ListingCriterion::Game(game_id) => {
                sqlx::query_as::<_, Listing>(
                    "SELECT l.id, l.item_id, l.seller_id, l.price, l.list_date, l.sold, l.source_entry_id
                     FROM listings l
                     JOIN items i ON i.id = l.item_id
                     WHERE i.game_id = $1 AND (NOT $2 OR l.sold = false)
                     ORDER BY l.list_date, l.id",
                )
                .bind(game_id)
                .bind(exclude_sold)
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Flip `sold` from `false` to `true`.
    ///
    /// Returns `true` only for the single caller whose update matched an
    /// unsold row; every later or concurrent caller gets `false`.
    pub async fn mark_sold(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE listings SET sold = true WHERE id = $1 AND sold = false")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Append the sale record for a settled listing.
    pub async fn record_sale(
        conn: &mut PgConnection,
        listing_id: DbId,
        buyer_id: DbId,
    ) -> Result<SoldListing, sqlx::Error> {
        let query = format!(
            "INSERT INTO sold_listings (listing_id, buyer_id)
             VALUES ($1, $2)
             RETURNING {SALE_COLUMNS}"
        );
        sqlx::query_as::<_, SoldListing>(&query)
            .bind(listing_id)
            .bind(buyer_id)
            .fetch_one(conn)
            .await
    }

    /// The sale record of a listing, if it has settled.
    pub async fn find_sale(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Option<SoldListing>, sqlx::Error> {
        let query = format!("SELECT {SALE_COLUMNS} FROM sold_listings WHERE listing_id = $1");
        sqlx::query_as::<_, SoldListing>(&query)
            .bind(listing_id)
            .fetch_optional(pool)
            .await
    }

    /// A buyer's purchases, most recent first.
    pub async fn list_sales_by_buyer(
        pool: &PgPool,
        buyer_id: DbId,
    ) -> Result<Vec<SoldListing>, sqlx::Error> {
        let query = format!(
            "SELECT {SALE_COLUMNS} FROM sold_listings WHERE buyer_id = $1 \
             ORDER BY bought_at DESC, listing_id DESC"
        );
        sqlx::query_as::<_, SoldListing>(&query)
            .bind(buyer_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a seller's open listings. Sold listings are price history and
    /// stay. Returns the number removed.
    pub async fn delete_unsold_by_seller(
        conn: &mut PgConnection,
        seller_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE seller_id = $1 AND sold = false")
            .bind(seller_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
