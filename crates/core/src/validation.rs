//! Input validation that runs before any store access.

use std::fmt;

use rust_decimal::Decimal;
use validator::Validate;

use crate::error::CoreError;
use crate::types::{has_money_scale, money_from_cents, Money, MONEY_SCALE};

/// Maximum username length, matching `users.username VARCHAR(64)`.
pub const MAX_USERNAME_LEN: u64 = 64;

/// Maximum display name length, matching `users.display_name VARCHAR(128)`.
pub const MAX_DISPLAY_NAME_LEN: usize = 128;

/// Largest price accepted (fits `NUMERIC(12, 2)`).
pub const MAX_PRICE_CENTS: i64 = 99_999_999_999;

/// A username/password pair as submitted by a caller.
#[derive(Clone, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// Reject empty or oversized fields.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

/// Validate a username on its own (profile updates).
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Username cannot be empty".into()));
    }
    if trimmed.chars().count() as u64 > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Resolve the display name to store: falls back to the username when the
/// caller omitted it or sent only whitespace.
pub fn resolve_display_name(username: &str, display_name: Option<&str>) -> Result<String, CoreError> {
    let resolved = match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => username.trim().to_string(),
    };
    if resolved.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(resolved)
}

/// A listing price must be positive, carry at most two decimals and fit the
/// column.
pub fn validate_price(price: Money) -> Result<(), CoreError> {
    if price <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "Price must be greater than zero, got {price}"
        )));
    }
    if !has_money_scale(price) {
        return Err(CoreError::Validation(format!(
            "Price may have at most {MONEY_SCALE} decimal places, got {price}"
        )));
    }
    if price > money_from_cents(MAX_PRICE_CENTS) {
        return Err(CoreError::Validation(format!("Price {price} is too large")));
    }
    Ok(())
}

/// Inclusive range check used by the price and date filters.
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    min: &T,
    max: &T,
) -> Result<(), CoreError> {
    if min > max {
        return Err(CoreError::Validation(format!(
            "{field} range is inverted: {min} > {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_credentials_are_rejected() {
        assert_matches!(
            Credentials::new("", "secret").check(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            Credentials::new("   ", "secret").check(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            Credentials::new("alice", "").check(),
            Err(CoreError::Validation(_))
        );
        assert!(Credentials::new("alice", "secret").check().is_ok());
    }

    #[test]
    fn debug_output_hides_the_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "hunter22-secret"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter22-secret"));
    }

    #[test]
    fn oversized_username_is_rejected() {
        let long = "x".repeat(65);
        assert!(Credentials::new(&long, "pw").check().is_err());
        assert!(validate_username(&long).is_err());
        assert!(validate_username(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn display_name_defaults_to_username() {
        assert_eq!(resolve_display_name("alice", None).unwrap(), "alice");
        assert_eq!(resolve_display_name("alice", Some("  ")).unwrap(), "alice");
        assert_eq!(
            resolve_display_name("alice", Some("Alice A.")).unwrap(),
            "Alice A."
        );
    }

    #[test]
    fn price_must_be_positive_with_cent_precision() {
        assert!(validate_price(Decimal::new(15000, 2)).is_ok());
        assert!(validate_price(Decimal::new(1, 2)).is_ok());
        assert_matches!(validate_price(Decimal::ZERO), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_price(Decimal::new(-100, 2)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_price(Decimal::new(1001, 3)),
            Err(CoreError::Validation(_))
        );
        assert!(validate_price(Decimal::new(MAX_PRICE_CENTS + 1, 2)).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(validate_range("price", &1, &2).is_ok());
        assert!(validate_range("price", &2, &2).is_ok());
        assert!(validate_range("price", &3, &2).is_err());
    }
}
