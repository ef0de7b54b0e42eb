//! 结账并发压力测试 - 同一商品上的抢购
//!
//! 多个用户同时结账同一种库存有限的花，验证条件递减的唯一不变量：
//! 永不超卖。成功的订单数乘以每单数量不得超过初始库存，
//! 最终库存等于初始库存减去实际售出数量。

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use rand::Rng;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use petal_server::cart::CartService;
use petal_server::db;
use petal_server::db::models::{FlowerCreate, OrderStatus, UserCreate};
use petal_server::db::repository::{FlowerRepository, OrderRepository, UserRepository};
use petal_server::orders::{CheckoutEngine, OrderError};

const INITIAL_STOCK: i64 = 25;
const BUYERS: usize = 60;
const MAX_QTY: i64 = 2;

async fn open_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("Failed to open in-memory database");
    db.use_ns("petal")
        .use_db("shop")
        .await
        .expect("Failed to select namespace");
    db::define_schema(&db).await.expect("Failed to apply schema");
    db
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_checkouts_never_oversell() {
    let db = open_db().await;

    let flower = FlowerRepository::new(db.clone())
        .create(FlowerCreate {
            name: "Limited Edition Rose".to_string(),
            price: "4.99".parse::<Decimal>().unwrap(),
            stock: INITIAL_STOCK,
            image_url: None,
        })
        .await
        .expect("Failed to create flower");
    let flower_id = flower.id.clone().expect("Flower has no id");

    // Every buyer gets an account and a filled cart before the race starts
    let mut rng = rand::thread_rng();
    let mut buyers = Vec::with_capacity(BUYERS);
    for i in 0..BUYERS {
        let user = UserRepository::new(db.clone())
            .create(UserCreate {
                name: format!("buyer-{}", i),
                email: format!("buyer{}@example.com", i),
                password: "hunter22".to_string(),
                role: None,
            })
            .await
            .expect("Failed to create buyer");
        let user_id = user.id.expect("Buyer has no id");
        let qty = rng.gen_range(1..=MAX_QTY);
        CartService::new(db.clone())
            .add_item(&user_id, &flower_id, qty)
            .await
            .expect("Failed to fill cart");
        buyers.push((user_id, qty));
    }

    let orders_placed = Arc::new(AtomicI64::new(0));
    let units_sold = Arc::new(AtomicI64::new(0));
    let out_of_stock = Arc::new(AtomicI64::new(0));

    let mut handles = Vec::with_capacity(BUYERS);
    for (user_id, qty) in buyers {
        let db = db.clone();
        let orders_placed = orders_placed.clone();
        let units_sold = units_sold.clone();
        let out_of_stock = out_of_stock.clone();
        handles.push(tokio::spawn(async move {
            let engine = CheckoutEngine::new(db);
            match engine.place_order(&user_id, None).await {
                Ok(order) => {
                    assert_eq!(order.status, OrderStatus::Pending);
                    assert_eq!(order.items[0].quantity, qty);
                    orders_placed.fetch_add(1, Ordering::SeqCst);
                    units_sold.fetch_add(qty, Ordering::SeqCst);
                }
                Err(OrderError::OutOfStock { .. }) => {
                    out_of_stock.fetch_add(1, Ordering::SeqCst);
                }
                Err(other) => panic!("Unexpected checkout failure: {:?}", other),
            }
        }));
    }

    for handle in handles {
        handle.await.expect("Checkout task panicked");
    }

    let placed = orders_placed.load(Ordering::SeqCst);
    let sold = units_sold.load(Ordering::SeqCst);
    let rejected = out_of_stock.load(Ordering::SeqCst);

    // Every buyer got a definitive answer
    assert_eq!(placed + rejected, BUYERS as i64);

    // The one invariant that matters: units sold never exceed the stock
    assert!(sold <= INITIAL_STOCK, "Oversold: {} > {}", sold, INITIAL_STOCK);

    // Conservation: final stock accounts exactly for what was sold
    let final_stock = FlowerRepository::new(db.clone())
        .find_by_id(&flower_id)
        .await
        .expect("Failed to read flower")
        .expect("Flower vanished")
        .stock;
    assert_eq!(final_stock, INITIAL_STOCK - sold);
    assert!(final_stock >= 0);

    // Exactly one persisted order per successful checkout, each priced
    // from its own snapshot
    let orders = OrderRepository::new(db.clone()).find_all().await.unwrap();
    assert_eq!(orders.len() as i64, placed);
    let unit_price = "4.99".parse::<Decimal>().unwrap();
    for order in &orders {
        assert_eq!(
            order.total_price,
            unit_price * Decimal::from(order.items[0].quantity)
        );
    }
}
