use rust_decimal::Decimal;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Currency amounts. Stored as `NUMERIC(12, 2)`.
pub type Money = Decimal;

/// Number of fractional digits carried by every currency amount.
pub const MONEY_SCALE: u32 = 2;

/// Build a currency amount from a whole number of cents.
pub fn money_from_cents(cents: i64) -> Money {
    Decimal::new(cents, MONEY_SCALE)
}

/// Whether `amount` fits the two-decimal currency representation.
pub fn has_money_scale(amount: Money) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_round_trip_through_decimal() {
        assert_eq!(money_from_cents(15000).to_string(), "150.00");
        assert_eq!(money_from_cents(1), Decimal::new(1, 2));
    }

    #[test]
    fn scale_check_ignores_trailing_zeros() {
        assert!(has_money_scale(Decimal::new(1500, 1)));
        assert!(has_money_scale(Decimal::new(150_000, 4)));
        assert!(!has_money_scale(Decimal::new(15_001, 3)));
    }
}
