//! Typed query criteria for listing and inventory searches.
//!
//! Every range criterion is inclusive on both ends.

use crate::error::CoreError;
use crate::types::{DbId, Money, Timestamp};
use crate::validation::validate_range;

/// Criterion for `get_filtered_listings`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingCriterion {
    All,
    Item(DbId),
    Seller(DbId),
    PriceRange { min: Money, max: Money },
    ListDateRange { from: Timestamp, to: Timestamp },
    /// Listings whose item belongs to the given game.
    Game(DbId),
}

impl ListingCriterion {
    pub fn check(&self) -> Result<(), CoreError> {
        match self {
            Self::PriceRange { min, max } => validate_range("price", min, max),
            Self::ListDateRange { from, to } => validate_range("list_date", from, to),
            _ => Ok(()),
        }
    }
}

/// Listing search: a criterion plus whether settled listings are hidden.
///
/// Sold listings are included unless `exclude_sold` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub criterion: ListingCriterion,
    pub exclude_sold: bool,
}

impl ListingQuery {
    pub fn new(criterion: ListingCriterion) -> Self {
        Self {
            criterion,
            exclude_sold: false,
        }
    }

    pub fn unsold(mut self) -> Self {
        self.exclude_sold = true;
        self
    }
}

/// Criterion for filtered inventory reads.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryCriterion {
    User(DbId),
    UserAndItem { user_id: DbId, item_id: DbId },
    Item(DbId),
    ObtainedRange { from: Timestamp, to: Timestamp },
}

impl InventoryCriterion {
    pub fn check(&self) -> Result<(), CoreError> {
        match self {
            Self::ObtainedRange { from, to } => validate_range("obtained_on", from, to),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn unsold_builder_sets_flag() {
        let q = ListingQuery::new(ListingCriterion::All);
        assert!(!q.exclude_sold);
        assert!(q.unsold().exclude_sold);
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let now = Utc::now();
        assert!(ListingCriterion::PriceRange {
            min: Decimal::new(500, 2),
            max: Decimal::new(100, 2),
        }
        .check()
        .is_err());
        assert!(ListingCriterion::ListDateRange {
            from: now,
            to: now - Duration::days(1),
        }
        .check()
        .is_err());
        assert!(InventoryCriterion::ObtainedRange { from: now, to: now }
            .check()
            .is_ok());
        assert!(ListingCriterion::Seller(4).check().is_ok());
    }
}
