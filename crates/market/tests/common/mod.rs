//! Shared helpers for marketplace integration tests.

#![allow(dead_code)]

use bazaar_db::models::inventory::InventoryEntry;
use bazaar_db::models::item::Item;
use bazaar_db::models::user::User;
use bazaar_market::config::MarketConfig;
use bazaar_market::Market;
use rust_decimal::Decimal;
use sqlx::PgPool;

pub const PASSWORD: &str = "correct-horse-battery";

/// Parse a money literal such as `"150.00"`.
pub fn money(s: &str) -> Decimal {
    s.parse().expect("valid money literal")
}

/// A market where every new account starts with 200.00.
pub fn market(pool: PgPool) -> Market {
    market_with_balance(pool, "200.00")
}

pub fn market_with_balance(pool: PgPool, starting_balance: &str) -> Market {
    let config = MarketConfig {
        starting_balance: money(starting_balance),
        ..MarketConfig::default()
    };
    Market::new(pool, config)
}

pub async fn register(market: &Market, username: &str) -> User {
    market
        .credentials
        .register(username, PASSWORD, None)
        .await
        .expect("registration should succeed")
}

/// Create a game with one item and return the item.
pub async fn seed_item(market: &Market, game: &str, item: &str) -> Item {
    let game = market
        .catalog
        .create_game(game, "test game")
        .await
        .expect("game creation should succeed");
    market
        .catalog
        .create_item(game.id, item, "test item")
        .await
        .expect("item creation should succeed")
}

pub async fn grant(market: &Market, user: &User, item: &Item) -> InventoryEntry {
    market
        .inventory
        .grant(user.id, item.id)
        .await
        .expect("grant should succeed")
}

pub async fn balance_of(market: &Market, user_id: i64) -> Decimal {
    market
        .credentials
        .find_user(user_id)
        .await
        .expect("user should exist")
        .balance
}
