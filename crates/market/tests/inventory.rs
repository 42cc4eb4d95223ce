//! Integration tests for the inventory ledger.

mod common;

use assert_matches::assert_matches;
use bazaar_core::error::CoreError;
use bazaar_core::filters::InventoryCriterion;
use bazaar_market::error::MarketError;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use common::{grant, market, register, seed_item};

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grant_then_list_owned(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let bob = register(&market, "bob").await;
    let item = seed_item(&market, "Chess", "Bishop").await;

    let first = grant(&market, &alice, &item).await;
    let second = grant(&market, &alice, &item).await;
    grant(&market, &bob, &item).await;

    let owned = market.inventory.list_owned(alice.id).await.unwrap();
    assert_eq!(
        owned.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    assert!(owned.iter().all(|e| e.user_id == alice.id && e.item_id == item.id));
    assert_eq!(market.inventory.list_all().await.unwrap().len(), 3);
    assert_eq!(market.inventory.find_entry(first.id).await.unwrap().id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grant_requires_user_and_item(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let item = seed_item(&market, "Chess", "Bishop").await;

    assert_matches!(
        market.inventory.grant(alice.id, 777).await,
        Err(MarketError::Core(CoreError::NotFound { entity: "item", id: 777 }))
    );
    assert_matches!(
        market.inventory.grant(888, item.id).await,
        Err(MarketError::Core(CoreError::NotFound { entity: "user", id: 888 }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retire_moves_entry_into_lost_history(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let item = seed_item(&market, "Chess", "Bishop").await;
    let entry = grant(&market, &alice, &item).await;

    let lost = market.inventory.retire(entry.id).await.unwrap();
    assert_eq!(lost.entry_id, entry.id);
    assert_eq!(lost.user_id, alice.id);
    assert_eq!(lost.item_id, item.id);
    assert_eq!(lost.obtained_on, entry.obtained_on);
    assert!(lost.lost_on >= entry.obtained_on);

    assert!(market.inventory.list_owned(alice.id).await.unwrap().is_empty());
    assert_eq!(market.inventory.list_lost(alice.id).await.unwrap().len(), 1);
    assert_eq!(
        market.inventory.lost_record(entry.id).await.unwrap().map(|l| l.id),
        Some(lost.id)
    );

    assert_matches!(
        market.inventory.retire(entry.id).await,
        Err(MarketError::Core(CoreError::EntryNotFound(id))) if id == entry.id
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filtered_queries(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let bob = register(&market, "bob").await;
    let knight = seed_item(&market, "Chess", "Knight").await;
    let stone = seed_item(&market, "Go", "Stone").await;

    grant(&market, &alice, &knight).await;
    grant(&market, &alice, &stone).await;
    grant(&market, &bob, &knight).await;

    let by_user_item = market
        .inventory
        .list_filtered(&InventoryCriterion::UserAndItem {
            user_id: alice.id,
            item_id: knight.id,
        })
        .await
        .unwrap();
    assert_eq!(by_user_item.len(), 1);

    let by_item = market
        .inventory
        .list_filtered(&InventoryCriterion::Item(knight.id))
        .await
        .unwrap();
    assert_eq!(by_item.len(), 2);

    let now = Utc::now();
    let in_range = market
        .inventory
        .list_filtered(&InventoryCriterion::ObtainedRange {
            from: now - Duration::hours(1),
            to: now + Duration::hours(1),
        })
        .await
        .unwrap();
    assert_eq!(in_range.len(), 3);

    let inverted = market
        .inventory
        .list_filtered(&InventoryCriterion::ObtainedRange {
            from: now,
            to: now - Duration::hours(1),
        })
        .await;
    assert_matches!(inverted, Err(MarketError::Core(CoreError::Validation(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owned_view_joins_catalog_names(pool: PgPool) {
    let market = market(pool);
    let alice = register(&market, "alice").await;
    let item = seed_item(&market, "Chess", "Knight").await;
    let entry = grant(&market, &alice, &item).await;

    let view = market.inventory.owned_view(alice.id).await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, entry.id);
    assert_eq!(view[0].game_name, "Chess");
    assert_eq!(view[0].item_name, "Knight");
    assert_eq!(view[0].item_description, "test item");
    assert_eq!(view[0].username, "alice");
}
