use std::sync::Arc;

use bazaar_db::DbPool;

use crate::auth::token::TokenGenerator;
use crate::catalog::Catalog;
use crate::config::MarketConfig;
use crate::credentials::CredentialStore;
use crate::inventory::InventoryLedger;
use crate::listings::ListingEngine;
use crate::sessions::SessionManager;

/// Every marketplace component, wired to one pool and one configuration.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`), so a presentation layer can hand a copy to each request.
#[derive(Clone)]
pub struct Market {
    /// Database connection pool.
    pub pool: DbPool,
    pub config: Arc<MarketConfig>,
    pub credentials: CredentialStore,
    pub sessions: SessionManager,
    pub catalog: Catalog,
    pub inventory: InventoryLedger,
    pub listings: ListingEngine,
}

impl Market {
    pub fn new(pool: DbPool, config: MarketConfig) -> Self {
        let config = Arc::new(config);
        let credentials = CredentialStore::new(pool.clone(), Arc::clone(&config));
        let sessions = SessionManager::new(pool.clone(), Arc::clone(&config), credentials.clone());
        Self::assemble(pool, config, credentials, sessions)
    }

    /// Same as [`new`](Self::new) with a custom session token source.
    pub fn with_token_generator(
        pool: DbPool,
        config: MarketConfig,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        let config = Arc::new(config);
        let credentials = CredentialStore::new(pool.clone(), Arc::clone(&config));
        let sessions = SessionManager::with_token_generator(
            pool.clone(),
            Arc::clone(&config),
            credentials.clone(),
            tokens,
        );
        Self::assemble(pool, config, credentials, sessions)
    }

    fn assemble(
        pool: DbPool,
        config: Arc<MarketConfig>,
        credentials: CredentialStore,
        sessions: SessionManager,
    ) -> Self {
        Self {
            catalog: Catalog::new(pool.clone()),
            inventory: InventoryLedger::new(pool.clone()),
            listings: ListingEngine::new(pool.clone()),
            pool,
            config,
            credentials,
            sessions,
        }
    }
}
