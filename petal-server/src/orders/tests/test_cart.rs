//! 购物车服务测试

use rust_decimal::Decimal;

use super::{create_flower, create_user, test_db};
use crate::cart::CartService;
use crate::db::models::FlowerUpdate;
use crate::db::repository::FlowerRepository;
use crate::orders::OrderError;

#[tokio::test]
async fn duplicate_adds_merge_into_one_line() {
    let db = test_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    cart.add_item(&user, &rose, 2).await.unwrap();
    let summary = cart.add_item(&user, &rose, 3).await.unwrap();

    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].quantity, 5);
    assert_eq!(summary.total_price, "24.95".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn quantity_below_one_is_rejected_on_add() {
    let db = test_db().await;
    let user = create_user(&db, "bob@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    let err = cart
        .add_item(&user, &rose, 0)
        .await
        .expect_err("Zero quantity must fail");
    assert!(matches!(err, OrderError::InvalidQuantity(_)));

    let err = cart
        .add_item(&user, &rose, -3)
        .await
        .expect_err("Negative quantity must fail");
    assert!(matches!(err, OrderError::InvalidQuantity(_)));
}

#[tokio::test]
async fn adding_beyond_stock_is_rejected() {
    let db = test_db().await;
    let user = create_user(&db, "carol@example.com").await;
    let tulip = create_flower(&db, "Tulip", "2.50", 4).await;
    let cart = CartService::new(db.clone());

    let err = cart
        .add_item(&user, &tulip, 5)
        .await
        .expect_err("Requesting more than stock must fail");
    assert!(matches!(err, OrderError::OutOfStock { .. }));

    // The merged quantity counts against stock too
    cart.add_item(&user, &tulip, 3).await.unwrap();
    let err = cart
        .add_item(&user, &tulip, 2)
        .await
        .expect_err("Merged quantity above stock must fail");
    match err {
        OrderError::OutOfStock {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, 5);
            assert_eq!(available, 4);
        }
        other => panic!("Expected OutOfStock, got {:?}", other),
    }
}

#[tokio::test]
async fn updating_to_zero_removes_the_line() {
    let db = test_db().await;
    let user = create_user(&db, "dave@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    let summary = cart.add_item(&user, &rose, 2).await.unwrap();
    let line_id = summary.items[0].id.clone();

    let summary = cart.update_quantity(&user, &line_id, 0).await.unwrap();
    assert!(summary.items.is_empty());

    let err = cart
        .update_quantity(&user, &line_id, -1)
        .await
        .expect_err("Negative quantity must fail");
    // The line no longer exists, so lookup fails before quantity checks
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn negative_quantity_update_is_rejected() {
    let db = test_db().await;
    let user = create_user(&db, "erin@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    let summary = cart.add_item(&user, &rose, 2).await.unwrap();
    let line_id = summary.items[0].id.clone();

    let err = cart
        .update_quantity(&user, &line_id, -1)
        .await
        .expect_err("Negative quantity must fail");
    assert!(matches!(err, OrderError::InvalidQuantity(_)));

    // Line untouched
    let summary = cart.get_summary(&user).await.unwrap();
    assert_eq!(summary.items[0].quantity, 2);
}

#[tokio::test]
async fn cannot_touch_another_users_cart_line() {
    let db = test_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let mallory = create_user(&db, "mallory@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    let summary = cart.add_item(&alice, &rose, 2).await.unwrap();
    let line_id = summary.items[0].id.clone();

    let err = cart
        .update_quantity(&mallory, &line_id, 1)
        .await
        .expect_err("Cross-user update must fail");
    assert!(matches!(err, OrderError::Forbidden(_)));

    let err = cart
        .remove_item(&mallory, &line_id)
        .await
        .expect_err("Cross-user removal must fail");
    assert!(matches!(err, OrderError::Forbidden(_)));

    // Alice's cart is untouched
    let summary = cart.get_summary(&alice).await.unwrap();
    assert_eq!(summary.items[0].quantity, 2);
}

#[tokio::test]
async fn clear_empties_the_cart() {
    let db = test_db().await;
    let user = create_user(&db, "frank@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let tulip = create_flower(&db, "Tulip", "2.50", 10).await;
    let cart = CartService::new(db.clone());

    cart.add_item(&user, &rose, 1).await.unwrap();
    cart.add_item(&user, &tulip, 2).await.unwrap();

    let summary = cart.clear(&user).await.unwrap();
    assert!(summary.items.is_empty());
    assert_eq!(summary.total_price, Decimal::ZERO);
    assert_eq!(summary.item_count, 0);
}

#[tokio::test]
async fn summary_uses_live_catalogue_prices() {
    let db = test_db().await;
    let user = create_user(&db, "grace@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    let cart = CartService::new(db.clone());

    cart.add_item(&user, &rose, 2).await.unwrap();

    FlowerRepository::new(db.clone())
        .update(
            &rose,
            FlowerUpdate {
                price: Some("6.00".parse().unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Unlike order lines, cart lines are priced at read time
    let summary = cart.get_summary(&user).await.unwrap();
    assert_eq!(summary.items[0].unit_price, "6.00".parse::<Decimal>().unwrap());
    assert_eq!(summary.total_price, "12.00".parse::<Decimal>().unwrap());
}
