//! Account roles.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20261019000001_create_users_table.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_BASIC: &str = "basic";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Basic,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => ROLE_BASIC,
            Self::Admin => ROLE_ADMIN,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_BASIC => Ok(Self::Basic),
            ROLE_ADMIN => Ok(Self::Admin),
            other => Err(CoreError::Validation(format!("Unknown role: '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips() {
        for role in [UserRole::Basic, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(UserRole::parse("owner").is_err());
        assert!(UserRole::parse("Admin").is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let parsed: UserRole = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(parsed, UserRole::Basic);
    }

    #[test]
    fn default_is_basic() {
        assert_eq!(UserRole::default(), UserRole::Basic);
    }
}
