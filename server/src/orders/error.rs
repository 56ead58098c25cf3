//! Order domain errors

use thiserror::Error;

use crate::db::models::OrderStatus;
use crate::db::repository::RepoError;
use crate::promotions::PromotionError;
use crate::stock::StockError;

/// Errors surfaced by order creation and lifecycle transitions
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Order {0} was modified concurrently, retries exhausted")]
    Contention(String),

    #[error("{0}")]
    Stock(#[from] StockError),

    #[error("{0}")]
    Promotion(#[from] PromotionError),

    #[error("{0}")]
    Repo(#[from] RepoError),
}
