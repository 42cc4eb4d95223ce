use rust_decimal::Decimal;

use crate::types::DbId;

/// Typed failures of the marketplace core.
///
/// Validation and not-found variants are raised before any write happens.
/// Conflict-style variants (`DuplicateUsername`, `AlreadySold`,
/// `SellerEqualsBuyer`, `ReferentialConflict`) are distinguishable from
/// not-found so callers can message them differently.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username is already taken: {0}")]
    DuplicateUsername(String),

    /// Bad credentials. Carries no detail so an unknown username and a wrong
    /// password produce identical payloads.
    #[error("Invalid username or password")]
    AuthFailure,

    #[error("Could not create a session after {attempts} attempts")]
    SessionCreationFailed { attempts: u32 },

    #[error("Inventory entry not found: {0}")]
    EntryNotFound(DbId),

    #[error("Listing not found: {0}")]
    ListingNotFound(DbId),

    #[error("Listing {0} has already been sold")]
    AlreadySold(DbId),

    #[error("Sellers cannot buy their own listings")]
    SellerEqualsBuyer,

    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("Referential conflict: {0}")]
    ReferentialConflict(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            Self::AuthFailure => "AUTH_FAILURE",
            Self::SessionCreationFailed { .. } => "SESSION_CREATION_FAILED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::ListingNotFound(_) => "LISTING_NOT_FOUND",
            Self::AlreadySold(_) => "ALREADY_SOLD",
            Self::SellerEqualsBuyer => "SELLER_EQUALS_BUYER",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::ReferentialConflict(_) => "REFERENTIAL_CONFLICT",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this failure means the addressed row does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::EntryNotFound(_) | Self::ListingNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_message_is_generic() {
        let msg = CoreError::AuthFailure.to_string();
        assert_eq!(msg, "Invalid username or password");
        assert!(!msg.to_lowercase().contains("exist"));
    }

    #[test]
    fn not_found_family_is_distinct_from_conflicts() {
        assert!(CoreError::ListingNotFound(1).is_not_found());
        assert!(CoreError::EntryNotFound(1).is_not_found());
        assert!(!CoreError::AlreadySold(1).is_not_found());
        assert!(!CoreError::SellerEqualsBuyer.is_not_found());
        assert!(!CoreError::DuplicateUsername("a".into()).is_not_found());
    }

    #[test]
    fn insufficient_funds_reports_amounts() {
        let err = CoreError::InsufficientFunds {
            needed: Decimal::new(15000, 2),
            available: Decimal::new(14999, 2),
        };
        assert_eq!(err.code(), "INSUFFICIENT_FUNDS");
        assert!(err.to_string().contains("150.00"));
        assert!(err.to_string().contains("149.99"));
    }
}
