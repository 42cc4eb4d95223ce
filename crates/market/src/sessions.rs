//! Session Manager: issues, validates and expires bearer session tokens.
//!
//! A session is `Active` while `now < expires_at` and `Expired` afterwards.
//! Logout writes the logout instant into `expires_at` and keeps the row, so
//! login history rows stay joinable.

use std::sync::Arc;

use bazaar_core::error::CoreError;
use bazaar_core::session::{expiry_from, SessionState};
use bazaar_core::types::{DbId, Timestamp};
use bazaar_core::user_agent::parse_user_agent;
use bazaar_db::models::session::{CreateLoginHistory, CreateSession, LoginHistory, Session};
use bazaar_db::models::user::User;
use bazaar_db::repositories::{LoginHistoryRepo, SessionRepo};
use bazaar_db::DbPool;
use chrono::Utc;
use serde::Serialize;

use crate::auth::token::{hash_token, RandomTokenGenerator, TokenGenerator};
use crate::config::MarketConfig;
use crate::credentials::CredentialStore;
use crate::error::MarketResult;

/// A freshly issued session. `token` is the only copy of the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

/// Result of a successful [`SessionManager::login`].
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub session: IssuedSession,
}

#[derive(Clone)]
pub struct SessionManager {
    pool: DbPool,
    config: Arc<MarketConfig>,
    credentials: CredentialStore,
    tokens: Arc<dyn TokenGenerator>,
}

impl SessionManager {
    pub fn new(pool: DbPool, config: Arc<MarketConfig>, credentials: CredentialStore) -> Self {
        Self::with_token_generator(pool, config, credentials, Arc::new(RandomTokenGenerator))
    }

    pub fn with_token_generator(
        pool: DbPool,
        config: Arc<MarketConfig>,
        credentials: CredentialStore,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            pool,
            config,
            credentials,
            tokens,
        }
    }

    /// Verify credentials, then open a session for the user.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        user_agent: &str,
    ) -> MarketResult<LoginOutcome> {
        let user = self.credentials.verify(username, password).await?;
        let session = self.create_session(user.id, user_agent).await?;
        Ok(LoginOutcome { user, session })
    }

    /// Open a session for `user_id`, expiring after the configured window.
    ///
    /// Each attempt draws a fresh token. After `session_create_attempts`
    /// failed inserts this returns [`CoreError::SessionCreationFailed`]. A
    /// failure to write the login history row is logged and ignored.
    pub async fn create_session(
        &self,
        user_id: DbId,
        user_agent: &str,
    ) -> MarketResult<IssuedSession> {
        let attempts = self.config.session_create_attempts;

        for attempt in 1..=attempts {
            let token = self.tokens.generate();
            let input = CreateSession {
                id: hash_token(&token),
                user_id,
                expires_at: expiry_from(Utc::now(), self.config.session_ttl_days),
            };

            match SessionRepo::create(&self.pool, &input).await {
                Ok(session) => {
                    self.record_login(&session, user_agent).await;
                    tracing::info!(user_id, attempt, "Session created");
                    return Ok(IssuedSession {
                        token,
                        user_id,
                        expires_at: session.expires_at,
                    });
                }
                Err(err) => {
                    tracing::warn!(user_id, attempt, error = %err, "Session insert failed");
                }
            }
        }

        tracing::error!(user_id, attempts, "Giving up on session creation");
        Err(CoreError::SessionCreationFailed { attempts }.into())
    }

    async fn record_login(&self, session: &Session, user_agent: &str) {
        let client = parse_user_agent(user_agent);
        let input = CreateLoginHistory {
            session_id: session.id.clone(),
            user_id: session.user_id,
            browser: client.browser,
            platform: client.platform,
        };
        if let Err(err) = LoginHistoryRepo::create(&self.pool, &input).await {
            tracing::warn!(user_id = session.user_id, error = %err, "Failed to record login history");
        }
    }

    /// The owner of `token` if its session is active now.
    ///
    /// `None` means "not logged in"; the caller should drop the token.
    pub async fn validate(&self, token: &str) -> MarketResult<Option<User>> {
        self.validate_at(token, Utc::now()).await
    }

    /// Like [`validate`](Self::validate), observed at `at`.
    pub async fn validate_at(&self, token: &str, at: Timestamp) -> MarketResult<Option<User>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(SessionRepo::find_active_user(&self.pool, &hash_token(token), at).await?)
    }

    /// State of the session behind `token`, or `None` if there is none.
    pub async fn state(&self, token: &str) -> MarketResult<Option<SessionState>> {
        let session = SessionRepo::find_by_id(&self.pool, &hash_token(token)).await?;
        Ok(session.map(|s| s.state_at(Utc::now())))
    }

    /// Log out. Unknown and already-expired tokens are a no-op.
    pub async fn expire(&self, token: &str) -> MarketResult<()> {
        let expired = SessionRepo::expire(&self.pool, &hash_token(token), Utc::now()).await?;
        tracing::debug!(expired, "Session expire requested");
        Ok(())
    }

    /// Tombstone every active session of a user. Returns how many were
    /// active.
    pub async fn expire_all_for_user(&self, user_id: DbId) -> MarketResult<u64> {
        let mut conn = self.pool.acquire().await?;
        let expired = SessionRepo::expire_all_for_user(&mut *conn, user_id, Utc::now()).await?;
        tracing::info!(user_id, expired, "Expired all sessions for user");
        Ok(expired)
    }

    pub async fn list_sessions(&self, user_id: DbId) -> MarketResult<Vec<Session>> {
        Ok(SessionRepo::list_by_user(&self.pool, user_id).await?)
    }

    /// The user's login audit trail, most recent first.
    pub async fn login_history(&self, user_id: DbId) -> MarketResult<Vec<LoginHistory>> {
        Ok(LoginHistoryRepo::list_by_user(&self.pool, user_id).await?)
    }
}
