//! 订单与购物车业务逻辑测试
//!
//! 全部跑在内存引擎上，共享生产代码的索引定义，所以唯一索引
//! 行为与 RocksDB 后端一致。

mod test_cart;
mod test_lifecycle;

use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use crate::cart::CartService;
use crate::db;
use crate::db::models::{FlowerCreate, FlowerId, UserCreate, UserId};
use crate::db::repository::{FlowerRepository, UserRepository};

/// Fresh in-memory database with the production schema applied
pub async fn test_db() -> Surreal<Db> {
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

pub async fn create_user(db: &Surreal<Db>, email: &str) -> UserId {
    let user = UserRepository::new(db.clone())
        .create(UserCreate {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            role: None,
        })
        .await
        .expect("Failed to create test user");
    user.id.expect("Created user has no id")
}

pub async fn create_flower(db: &Surreal<Db>, name: &str, price: &str, stock: i64) -> FlowerId {
    let flower = FlowerRepository::new(db.clone())
        .create(FlowerCreate {
            name: name.to_string(),
            price: price.parse::<Decimal>().expect("Bad price literal"),
            stock,
            image_url: None,
        })
        .await
        .expect("Failed to create test flower");
    flower.id.expect("Created flower has no id")
}

pub async fn add_to_cart(db: &Surreal<Db>, user: &UserId, flower: &FlowerId, quantity: i64) {
    CartService::new(db.clone())
        .add_item(user, flower, quantity)
        .await
        .expect("Failed to add item to cart");
}

pub async fn stock_of(db: &Surreal<Db>, flower: &FlowerId) -> i64 {
    FlowerRepository::new(db.clone())
        .find_by_id(flower)
        .await
        .expect("Failed to read flower")
        .expect("Flower vanished")
        .stock
}
