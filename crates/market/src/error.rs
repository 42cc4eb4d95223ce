use bazaar_core::error::CoreError;

/// PostgreSQL SQLSTATE for a unique violation.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for a foreign-key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Error type returned by every marketplace operation.
///
/// Wraps [`CoreError`] for typed domain failures. Store errors that carry a
/// domain meaning (unique and foreign-key violations) are converted into
/// `Core` variants on the way in; anything else stays `Database`.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// A domain-level error from `bazaar_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An unexpected database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience alias for marketplace return values.
pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    /// Stable machine-readable code for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Core(core) => core.code(),
            MarketError::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            MarketError::Core(core) => Some(core),
            MarketError::Database(_) => None,
        }
    }
}

impl From<sqlx::Error> for MarketError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx_error(err)
    }
}

/// Classify a sqlx error.
///
/// - Unique violations on `uq_` constraints become [`CoreError::Conflict`].
/// - Foreign-key violations become [`CoreError::ReferentialConflict`].
/// - Everything else is logged and kept as [`MarketError::Database`].
fn classify_sqlx_error(err: sqlx::Error) -> MarketError {
    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code();
        let constraint = db_err.constraint().unwrap_or("unknown");
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ))
                .into();
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::ReferentialConflict(format!(
                    "Row is still referenced or references a missing row: {constraint}"
                ))
                .into();
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    MarketError::Database(err)
}

/// Whether `err` is a unique violation of the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_stay_database() {
        let err = MarketError::from(sqlx::Error::PoolTimedOut);
        assert_matches!(err, MarketError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(err.as_core().is_none());
    }

    #[test]
    fn core_errors_keep_their_code() {
        let err = MarketError::from(CoreError::AlreadySold(3));
        assert_eq!(err.code(), "ALREADY_SOLD");
        assert_matches!(err.as_core(), Some(CoreError::AlreadySold(3)));
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound, "uq_users_username"));
    }
}
