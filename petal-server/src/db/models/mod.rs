//! Database Models
//!
//! Entity structs matching the SurrealDB tables, plus their create/update
//! payloads. IDs are `surrealdb::RecordId`, serialized as "table:id"
//! strings via [`serde_helpers`].

pub mod serde_helpers;

pub mod cart;
pub mod flower;
pub mod order;
pub mod user;

pub use cart::{Cart, CartId, CartItem, CartItemId, CartItemView, CartSummary};
pub use flower::{Flower, FlowerCreate, FlowerId, FlowerUpdate};
pub use order::{Order, OrderId, OrderItem, OrderStatus};
pub use user::{Role, User, UserCreate, UserId};
