//! Session validity window and lifecycle rules.
//!
//! A session has exactly two states. It is `Active` while `now < expires_at`
//! and `Expired` afterwards, whether the window ran out or a logout moved
//! `expires_at` back to the logout instant. Expiry never moves forward once
//! set.

use crate::types::Timestamp;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Default number of insert attempts before session creation gives up.
pub const DEFAULT_SESSION_CREATE_ATTEMPTS: u32 = 3;

/// Random bytes per session token (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Expired,
}

/// Expiry instant for a session created at `created_at`.
pub fn expiry_from(created_at: Timestamp, ttl_days: i64) -> Timestamp {
    created_at + chrono::Duration::days(ttl_days)
}

/// State of a session with the given expiry, observed at `now`.
pub fn state_at(expires_at: Timestamp, now: Timestamp) -> SessionState {
    if now < expires_at {
        SessionState::Active
    } else {
        SessionState::Expired
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn window_is_thirty_days() {
        let expiry = expiry_from(t0(), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(expiry - t0(), Duration::days(30));
    }

    #[test]
    fn active_strictly_before_expiry() {
        let expiry = expiry_from(t0(), DEFAULT_SESSION_TTL_DAYS);
        assert_eq!(state_at(expiry, t0()), SessionState::Active);
        assert_eq!(
            state_at(expiry, expiry - Duration::seconds(1)),
            SessionState::Active
        );
        assert_eq!(state_at(expiry, expiry), SessionState::Expired);
        assert_eq!(
            state_at(expiry, t0() + Duration::days(31)),
            SessionState::Expired
        );
    }
}
