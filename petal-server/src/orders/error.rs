//! Order domain errors
//!
//! Every core operation returns a tagged `OrderError` instead of routing
//! failures through transport concerns; the boundary mapping to HTTP
//! lives in the single `From<OrderError> for AppError` impl below.

use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Failure taxonomy of the ordering core (checkout, lifecycle, cart)
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cannot checkout an empty cart. Add flowers before placing an order.")]
    EmptyCart,

    #[error(
        "Insufficient stock for '{flower_name}': requested {requested}, available {available}"
    )]
    OutOfStock {
        flower_id: String,
        flower_name: String,
        requested: i64,
        available: i64,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid status: {0}. Valid values: PENDING, CONFIRMED, CANCELLED, DELIVERED")]
    InvalidStatus(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Validation(msg) | RepoError::Database(msg) => {
                OrderError::Database(msg)
            }
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::EmptyCart
            | OrderError::OutOfStock { .. }
            | OrderError::InvalidTransition(_) => AppError::BusinessRule(message),
            OrderError::InvalidQuantity(_) | OrderError::InvalidStatus(_) => {
                AppError::Validation(message)
            }
            OrderError::NotFound(resource) => AppError::NotFound(resource),
            OrderError::Forbidden(_) => AppError::Forbidden(message),
            OrderError::Database(_) => AppError::Database(message),
        }
    }
}
