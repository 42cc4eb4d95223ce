use anyhow::Context;
use bazaar_core::filters::{ListingCriterion, ListingQuery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_market::config::MarketConfig;
use bazaar_market::Market;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_market=debug,bazaar_db=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = MarketConfig::from_env().context("Invalid marketplace configuration")?;
    tracing::info!(
        session_ttl_days = config.session_ttl_days,
        session_create_attempts = config.session_create_attempts,
        starting_balance = %config.starting_balance,
        "Loaded marketplace configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = bazaar_db::create_pool(&database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!(max_connections = config.max_connections, "Database connection pool created");

    bazaar_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    bazaar_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Marketplace ---
    let market = Market::new(pool, config);
    let open = market
        .listings
        .get_filtered_listings(&ListingQuery::new(ListingCriterion::All).unsold())
        .await?;
    let games = market.catalog.list_games().await?;
    tracing::info!(
        open_listings = open.len(),
        games = games.len(),
        "Marketplace core ready"
    );

    market.pool.close().await;
    Ok(())
}
