//! Integration tests for account registration, verification and
//! administration.

mod common;

use assert_matches::assert_matches;
use bazaar_core::error::CoreError;
use bazaar_core::roles::UserRole;
use bazaar_market::error::MarketError;
use sqlx::PgPool;

use common::{grant, market, money, register, seed_item, PASSWORD};

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_stores_a_hash_and_defaults(pool: PgPool) {
    let market = market(pool);

    let user = market
        .credentials
        .register("  alice ", PASSWORD, None)
        .await
        .unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.display_name, "alice");
    assert_eq!(user.role(), UserRole::Basic);
    assert_eq!(user.balance, money("200.00"));
    assert_ne!(user.password_hash, PASSWORD);
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_keeps_explicit_display_name(pool: PgPool) {
    let market = market(pool);
    let user = market
        .credentials
        .register("bob", PASSWORD, Some("Bob the Trader"))
        .await
        .unwrap();
    assert_eq!(user.display_name, "Bob the Trader");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_is_rejected(pool: PgPool) {
    let market = market(pool);
    register(&market, "alice").await;

    let err = market
        .credentials
        .register("alice", "another-password", None)
        .await
        .unwrap_err();
    assert_matches!(err, MarketError::Core(CoreError::DuplicateUsername(name)) if name == "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_input_never_reaches_the_store(pool: PgPool) {
    let market = market(pool);

    for (username, password) in [("", PASSWORD), ("carol", ""), ("carol", "short")] {
        let err = market
            .credentials
            .register(username, password, None)
            .await
            .unwrap_err();
        assert_matches!(err, MarketError::Core(CoreError::Validation(_)));
    }
    assert!(market.credentials.list_users().await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_accepts_the_right_password(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;

    let user = market.credentials.verify("alice", PASSWORD).await.unwrap();
    assert_eq!(user.id, alice.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bad_logins_are_indistinguishable(pool: PgPool) {
    let market = market(pool);
    register(&market, "alice").await;

    let wrong_once = market.credentials.verify("alice", "wrong-password").await.unwrap_err();
    let wrong_twice = market.credentials.verify("alice", "wrong-password").await.unwrap_err();
    let unknown = market.credentials.verify("mallory", "wrong-password").await.unwrap_err();

    assert_matches!(wrong_once, MarketError::Core(CoreError::AuthFailure));
    assert_matches!(unknown, MarketError::Core(CoreError::AuthFailure));
    assert_eq!(wrong_once.to_string(), wrong_twice.to_string());
    assert_eq!(wrong_once.to_string(), unknown.to_string());
    assert_eq!(wrong_once.code(), unknown.code());
}

// ---------------------------------------------------------------------------
// Profile and administration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_renames_and_defaults_display_name(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    register(&market, "bob").await;

    let renamed = market
        .credentials
        .update_profile(alice.id, "alicia", Some(""))
        .await
        .unwrap();
    assert_eq!(renamed.username, "alicia");
    assert_eq!(renamed.display_name, "alicia");

    let err = market
        .credentials
        .update_profile(alice.id, "bob", None)
        .await
        .unwrap_err();
    assert_matches!(err, MarketError::Core(CoreError::DuplicateUsername(_)));

    let err = market
        .credentials
        .update_profile(alice.id, "   ", None)
        .await
        .unwrap_err();
    assert_matches!(err, MarketError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password_replaces_the_credential(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;

    market
        .credentials
        .change_password(alice.id, "a-brand-new-secret")
        .await
        .unwrap();

    assert!(market.credentials.verify("alice", PASSWORD).await.is_err());
    assert!(market
        .credentials
        .verify("alice", "a-brand-new-secret")
        .await
        .is_ok());

    let err = market
        .credentials
        .change_password(9_999, "a-brand-new-secret")
        .await
        .unwrap_err();
    assert_matches!(err, MarketError::Core(CoreError::NotFound { entity: "user", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_role_promotes_to_admin(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;

    let admin = market
        .credentials
        .set_role(alice.id, UserRole::Admin)
        .await
        .unwrap();
    assert_eq!(admin.role(), UserRole::Admin);
}

// ---------------------------------------------------------------------------
// Account deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_account_removes_sessions_listings_and_inventory(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let item = seed_item(&market, "Chess", "Knight").await;
    let kept = grant(&market, &alice, &item).await;
    let listed = grant(&market, &alice, &item).await;
    let listing = market
        .listings
        .create_listing_from_inventory(listed.id, money("10.00"))
        .await
        .unwrap();
    let session = market
        .sessions
        .create_session(alice.id, "")
        .await
        .unwrap();

    market.credentials.delete_account(alice.id).await.unwrap();

    assert_matches!(
        market.credentials.find_user(alice.id).await,
        Err(MarketError::Core(CoreError::NotFound { .. }))
    );
    assert!(market.sessions.validate(&session.token).await.unwrap().is_none());
    assert_matches!(
        market.inventory.find_entry(kept.id).await,
        Err(MarketError::Core(CoreError::EntryNotFound(_)))
    );
    assert_matches!(
        market.listings.get_listing(listing.id).await,
        Err(MarketError::Core(CoreError::ListingNotFound(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_account_with_trade_history_is_rejected(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let bob = register(&market, "bob").await;
    let item = seed_item(&market, "Chess", "Rook").await;
    let entry = grant(&market, &alice, &item).await;
    let listing = market
        .listings
        .create_listing_from_inventory(entry.id, money("25.00"))
        .await
        .unwrap();
    market.listings.buy(listing.id, bob.id).await.unwrap();

    for user_id in [alice.id, bob.id] {
        let err = market.credentials.delete_account(user_id).await.unwrap_err();
        assert_matches!(err, MarketError::Core(CoreError::ReferentialConflict(_)));
        assert!(market.credentials.find_user(user_id).await.is_ok());
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_unknown_account_is_not_found(pool: PgPool) {
    let market = market(pool);
    let err = market.credentials.delete_account(42).await.unwrap_err();
    assert_matches!(err, MarketError::Core(CoreError::NotFound { entity: "user", id: 42 }));
}
