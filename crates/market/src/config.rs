use std::str::FromStr;

use bazaar_core::session::{DEFAULT_SESSION_CREATE_ATTEMPTS, DEFAULT_SESSION_TTL_DAYS};
use bazaar_core::types::{has_money_scale, Money};
use bazaar_db::DEFAULT_MAX_CONNECTIONS;
use rust_decimal::Decimal;

/// Default minimum password length at registration and password change.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Marketplace configuration loaded from environment variables.
///
/// Every field has a default suitable for local development and tests.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Connection pool size (default: `20`).
    pub max_connections: u32,
    /// Session validity window in days (default: `30`).
    pub session_ttl_days: i64,
    /// Insert attempts before session creation gives up (default: `3`).
    pub session_create_attempts: u32,
    /// Minimum password length in characters (default: `8`).
    pub min_password_length: usize,
    /// Balance granted to newly registered accounts (default: `0.00`).
    pub starting_balance: Money,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            session_create_attempts: DEFAULT_SESSION_CREATE_ATTEMPTS,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            starting_balance: Decimal::ZERO,
        }
    }
}

impl MarketConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `DB_MAX_CONNECTIONS`      | `20`    |
    /// | `SESSION_TTL_DAYS`        | `30`    |
    /// | `SESSION_CREATE_ATTEMPTS` | `3`     |
    /// | `MIN_PASSWORD_LENGTH`     | `8`     |
    /// | `STARTING_BALANCE`        | `0.00`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "0", "must be at least 1"));
        }

        let session_ttl_days = parse_or(&lookup, "SESSION_TTL_DAYS", defaults.session_ttl_days)?;
        if session_ttl_days <= 0 {
            return Err(invalid(
                "SESSION_TTL_DAYS",
                &session_ttl_days.to_string(),
                "must be positive",
            ));
        }

        let session_create_attempts = parse_or(
            &lookup,
            "SESSION_CREATE_ATTEMPTS",
            defaults.session_create_attempts,
        )?;
        if session_create_attempts == 0 {
            return Err(invalid("SESSION_CREATE_ATTEMPTS", "0", "must be at least 1"));
        }

        let min_password_length =
            parse_or(&lookup, "MIN_PASSWORD_LENGTH", defaults.min_password_length)?;

        let starting_balance: Money =
            parse_or(&lookup, "STARTING_BALANCE", defaults.starting_balance)?;
        if starting_balance < Decimal::ZERO || !has_money_scale(starting_balance) {
            return Err(invalid(
                "STARTING_BALANCE",
                &starting_balance.to_string(),
                "must be a non-negative amount with at most two decimals",
            ));
        }

        Ok(Self {
            max_connections,
            session_ttl_days,
            session_create_attempts,
            min_password_length,
            starting_balance,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
