//! Credential Store: account registration, password verification and
//! account administration.

use std::sync::Arc;

use bazaar_core::error::CoreError;
use bazaar_core::roles::UserRole;
use bazaar_core::types::DbId;
use bazaar_core::validation::{resolve_display_name, validate_username, Credentials};
use bazaar_db::models::user::{CreateUser, User};
use bazaar_db::repositories::{ListingRepo, SessionRepo, UserRepo};
use bazaar_db::DbPool;
use chrono::Utc;

use crate::auth::password::{hash_password, validate_password_strength, verify_dummy, verify_password};
use crate::config::MarketConfig;
use crate::error::{is_unique_violation, MarketResult};

/// Unique constraint on `users.username`.
const USERNAME_CONSTRAINT: &str = "uq_users_username";

#[derive(Clone)]
pub struct CredentialStore {
    pool: DbPool,
    config: Arc<MarketConfig>,
}

impl CredentialStore {
    pub fn new(pool: DbPool, config: Arc<MarketConfig>) -> Self {
        Self { pool, config }
    }

    /// Create a basic account with the configured starting balance.
    ///
    /// The display name falls back to the username when omitted.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> MarketResult<User> {
        let credentials = Credentials::new(username, password);
        credentials.check()?;
        validate_password_strength(&credentials.password, self.config.min_password_length)
            .map_err(CoreError::Validation)?;
        let display_name = resolve_display_name(&credentials.username, display_name)?;

        let password_hash = hash(&credentials.password)?;
        let input = CreateUser {
            username: credentials.username.clone(),
            display_name,
            password_hash,
            balance: self.config.starting_balance,
            role: UserRole::Basic,
        };

        match UserRepo::create(&self.pool, &input).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "Account registered");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err, USERNAME_CONSTRAINT) => {
                tracing::debug!(username = %credentials.username, "Registration rejected: username taken");
                Err(CoreError::DuplicateUsername(credentials.username).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Check a username/password pair.
    ///
    /// An unknown username and a wrong password both yield
    /// [`CoreError::AuthFailure`], after the same amount of hashing work.
    pub async fn verify(&self, username: &str, password: &str) -> MarketResult<User> {
        let credentials = Credentials::new(username, password);
        credentials.check()?;

        let Some(user) = UserRepo::find_by_username(&self.pool, &credentials.username).await?
        else {
            verify_dummy(&credentials.password);
            tracing::debug!("Credential check failed");
            return Err(CoreError::AuthFailure.into());
        };

        match verify_password(&credentials.password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::debug!("Credential check failed");
                Err(CoreError::AuthFailure.into())
            }
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                Err(CoreError::AuthFailure.into())
            }
        }
    }

    pub async fn find_user(&self, id: DbId) -> MarketResult<User> {
        UserRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| user_not_found(id).into())
    }

    pub async fn find_by_username(&self, username: &str) -> MarketResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username.trim()).await?)
    }

    pub async fn list_users(&self) -> MarketResult<Vec<User>> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    /// Replace username and display name. An empty display name falls back
    /// to the new username.
    pub async fn update_profile(
        &self,
        user_id: DbId,
        username: &str,
        display_name: Option<&str>,
    ) -> MarketResult<User> {
        validate_username(username)?;
        let username = username.trim();
        let display_name = resolve_display_name(username, display_name)?;

        match UserRepo::update_profile(&self.pool, user_id, username, &display_name).await {
            Ok(Some(user)) => {
                tracing::info!(user_id, "Profile updated");
                Ok(user)
            }
            Ok(None) => Err(user_not_found(user_id).into()),
            Err(err) if is_unique_violation(&err, USERNAME_CONSTRAINT) => {
                Err(CoreError::DuplicateUsername(username.to_string()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn change_password(&self, user_id: DbId, new_password: &str) -> MarketResult<()> {
        if new_password.is_empty() {
            return Err(CoreError::Validation("Password cannot be empty".into()).into());
        }
        validate_password_strength(new_password, self.config.min_password_length)
            .map_err(CoreError::Validation)?;

        let password_hash = hash(new_password)?;
        if !UserRepo::update_password(&self.pool, user_id, &password_hash).await? {
            return Err(user_not_found(user_id).into());
        }
        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    /// Administrative role change.
    pub async fn set_role(&self, user_id: DbId, role: UserRole) -> MarketResult<User> {
        let user = UserRepo::set_role(&self.pool, user_id, role)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        tracing::info!(user_id, role = role.as_str(), "Role changed");
        Ok(user)
    }

    /// Remove an account in one transaction: tombstone its sessions, drop its
    /// open listings, then delete the user row (inventory, lost inventory,
    /// sessions and login history cascade).
    ///
    /// An account that took part in a settled trade is kept and the call
    /// fails with [`CoreError::ReferentialConflict`].
    pub async fn delete_account(&self, user_id: DbId) -> MarketResult<()> {
        let mut tx = self.pool.begin().await?;

        let expired = SessionRepo::expire_all_for_user(&mut *tx, user_id, Utc::now()).await?;
        let withdrawn = ListingRepo::delete_unsold_by_seller(&mut *tx, user_id).await?;

        if !UserRepo::delete(&mut *tx, user_id).await? {
            return Err(user_not_found(user_id).into());
        }
        tx.commit().await?;

        tracing::info!(user_id, expired, withdrawn, "Account deleted");
        Ok(())
    }
}

fn hash(password: &str) -> Result<String, CoreError> {
    hash_password(password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        CoreError::Internal("Password hashing failed".into())
    })
}

fn user_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "user", id }
}
