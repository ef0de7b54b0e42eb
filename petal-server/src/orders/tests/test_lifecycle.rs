//! 订单状态机测试

use super::{add_to_cart, create_flower, create_user, stock_of, test_db};
use crate::db::models::{FlowerId, Order, OrderItem, OrderStatus, UserId};
use crate::db::repository::OrderRepository;
use crate::orders::{CheckoutEngine, OrderError, OrderLifecycle};
use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn place_test_order(db: &Surreal<Db>, user: &UserId) -> Order {
    CheckoutEngine::new(db.clone())
        .place_order(user, None)
        .await
        .expect("Checkout failed")
}

#[tokio::test]
async fn customer_cancel_restores_stock() {
    let db = test_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 4).await;

    let order = place_test_order(&db, &user).await;
    assert_eq!(stock_of(&db, &rose).await, 6);

    let cancelled = OrderLifecycle::new(db.clone())
        .cancel_own_order(&user, order.id.as_ref().unwrap())
        .await
        .expect("Cancel failed");

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&db, &rose).await, 10);
}

#[tokio::test]
async fn cancel_twice_fails() {
    let db = test_db().await;
    let user = create_user(&db, "bob@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 1).await;

    let order = place_test_order(&db, &user).await;
    let lifecycle = OrderLifecycle::new(db.clone());
    let order_id = order.id.as_ref().unwrap();

    lifecycle.cancel_own_order(&user, order_id).await.unwrap();

    let err = lifecycle
        .cancel_own_order(&user, order_id)
        .await
        .expect_err("Second cancel must fail");
    assert!(matches!(err, OrderError::InvalidTransition(_)));

    // Stock restored exactly once
    assert_eq!(stock_of(&db, &rose).await, 10);
}

#[tokio::test]
async fn cannot_cancel_someone_elses_order() {
    let db = test_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let mallory = create_user(&db, "mallory@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &alice, &rose, 1).await;

    let order = place_test_order(&db, &alice).await;

    let err = OrderLifecycle::new(db.clone())
        .cancel_own_order(&mallory, order.id.as_ref().unwrap())
        .await
        .expect_err("Cross-user cancel must fail");
    assert!(matches!(err, OrderError::Forbidden(_)));
    assert_eq!(stock_of(&db, &rose).await, 9);
}

#[tokio::test]
async fn confirmed_orders_cannot_be_cancelled_by_customer() {
    let db = test_db().await;
    let user = create_user(&db, "carol@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 1).await;

    let order = place_test_order(&db, &user).await;
    let lifecycle = OrderLifecycle::new(db.clone());
    let order_id = order.id.as_ref().unwrap();

    lifecycle.set_status(order_id, "CONFIRMED").await.unwrap();

    let err = lifecycle
        .cancel_own_order(&user, order_id)
        .await
        .expect_err("Cancel of confirmed order must fail");
    assert!(matches!(err, OrderError::InvalidTransition(_)));
}

#[tokio::test]
async fn admin_cancel_of_confirmed_order_restores_stock() {
    let db = test_db().await;
    let user = create_user(&db, "dave@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 3).await;

    let order = place_test_order(&db, &user).await;
    let lifecycle = OrderLifecycle::new(db.clone());
    let order_id = order.id.as_ref().unwrap();

    let confirmed = lifecycle.set_status(order_id, "CONFIRMED").await.unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert_eq!(stock_of(&db, &rose).await, 7);

    let cancelled = lifecycle.set_status(order_id, "CANCELLED").await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&db, &rose).await, 10);
}

#[tokio::test]
async fn admin_cancel_of_pending_order_does_not_restore_stock() {
    let db = test_db().await;
    let user = create_user(&db, "erin@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 2).await;

    let order = place_test_order(&db, &user).await;

    let cancelled = OrderLifecycle::new(db.clone())
        .set_status(order.id.as_ref().unwrap(), "CANCELLED")
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    // Only CONFIRMED -> CANCELLED restores through this path
    assert_eq!(stock_of(&db, &rose).await, 8);
}

#[tokio::test]
async fn delivery_does_not_change_stock_and_is_terminal() {
    let db = test_db().await;
    let user = create_user(&db, "frank@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 2).await;

    let order = place_test_order(&db, &user).await;
    let lifecycle = OrderLifecycle::new(db.clone());
    let order_id = order.id.as_ref().unwrap();

    lifecycle.set_status(order_id, "CONFIRMED").await.unwrap();
    let delivered = lifecycle.set_status(order_id, "DELIVERED").await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(stock_of(&db, &rose).await, 8);

    let err = lifecycle
        .set_status(order_id, "PENDING")
        .await
        .expect_err("Terminal order must reject status changes");
    assert!(matches!(err, OrderError::InvalidTransition(_)));
}

#[tokio::test]
async fn unknown_status_literal_is_rejected() {
    let db = test_db().await;
    let user = create_user(&db, "grace@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 1).await;

    let order = place_test_order(&db, &user).await;
    let lifecycle = OrderLifecycle::new(db.clone());

    let err = lifecycle
        .set_status(order.id.as_ref().unwrap(), "SHIPPED")
        .await
        .expect_err("Unknown literal must fail");
    assert!(matches!(err, OrderError::InvalidStatus(_)));

    let err = lifecycle
        .list_orders(Some("SHIPPED"))
        .await
        .expect_err("Unknown filter must fail");
    assert!(matches!(err, OrderError::InvalidStatus(_)));
}

#[tokio::test]
async fn status_literals_are_case_insensitive() {
    let db = test_db().await;
    let user = create_user(&db, "heidi@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 10).await;
    add_to_cart(&db, &user, &rose, 1).await;

    let order = place_test_order(&db, &user).await;

    let confirmed = OrderLifecycle::new(db.clone())
        .set_status(order.id.as_ref().unwrap(), "confirmed")
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
}

fn order_line(flower: &FlowerId, name: &str, quantity: i64, price: &str) -> OrderItem {
    let unit_price: Decimal = price.parse().expect("Bad price literal");
    OrderItem {
        flower: Some(flower.clone()),
        flower_name: name.to_string(),
        quantity,
        unit_price,
        subtotal: unit_price * Decimal::from(quantity),
    }
}

#[tokio::test]
async fn failed_restoration_is_rolled_back_and_cancel_can_be_retried() {
    let db = test_db().await;
    let user = create_user(&db, "ivan@example.com").await;
    // Stocks as they stand after the order consumed 2 of each
    let daisy = create_flower(&db, "Daisy", "4.99", 8).await;
    let sundew = create_flower(&db, "Sundew", "5.99", 48).await;

    let orders = OrderRepository::new(db.clone());
    let order = orders
        .create(Order {
            id: None,
            user: user.clone(),
            total_price: Decimal::new(2196, 2),
            status: OrderStatus::Pending,
            delivery_address: None,
            items: vec![
                order_line(&daisy, "Daisy", 2, "4.99"),
                order_line(&sundew, "Sundew", 2, "5.99"),
            ],
            ordered_at: Utc::now(),
        })
        .await
        .expect("Order create failed");
    let order_id = order.id.as_ref().unwrap();

    // Cap stock writes so restoring the second line fails after the
    // first line was already incremented
    db.query("DEFINE FIELD stock ON TABLE flower TYPE int ASSERT $value <= 49;")
        .await
        .unwrap()
        .check()
        .unwrap();

    let lifecycle = OrderLifecycle::new(db.clone());
    let err = lifecycle
        .cancel_own_order(&user, order_id)
        .await
        .expect_err("Restoration past the cap must fail");
    assert!(matches!(err, OrderError::Database(_)));

    // Nothing half-applied: both counters unchanged, order back to PENDING
    assert_eq!(stock_of(&db, &daisy).await, 8);
    assert_eq!(stock_of(&db, &sundew).await, 48);
    let reread = orders.find_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(reread.status, OrderStatus::Pending);

    // Lift the cap; the retried cancel restores each line exactly once
    db.query("REMOVE FIELD stock ON TABLE flower;")
        .await
        .unwrap()
        .check()
        .unwrap();

    let cancelled = lifecycle
        .cancel_own_order(&user, order_id)
        .await
        .expect("Retried cancel failed");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&db, &daisy).await, 10);
    assert_eq!(stock_of(&db, &sundew).await, 50);
}

#[tokio::test]
async fn listing_filters_by_status_and_owner() {
    let db = test_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let rose = create_flower(&db, "Red Rose", "4.99", 100).await;

    add_to_cart(&db, &alice, &rose, 1).await;
    let first = place_test_order(&db, &alice).await;
    add_to_cart(&db, &bob, &rose, 2).await;
    place_test_order(&db, &bob).await;

    let lifecycle = OrderLifecycle::new(db.clone());
    lifecycle
        .set_status(first.id.as_ref().unwrap(), "CONFIRMED")
        .await
        .unwrap();

    let all = lifecycle.list_orders(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let confirmed = lifecycle.list_orders(Some("CONFIRMED")).await.unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].user, alice);

    let own = lifecycle.list_own_orders(&bob).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user, bob);
}
