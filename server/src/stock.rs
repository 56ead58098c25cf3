//! Stock Ledger
//!
//! The authoritative count of sellable units per product. A successful
//! reserve is an immediate durable deduction — there is no hold-with-expiry
//! and no separate confirm step.
//!
//! The decrement itself is a conditional update at the storage layer
//! ("subtract only where stock suffices"); this module diagnoses a
//! zero-effect update into the specific failure.

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::db::repository::{ProductRepository, RepoError};

/// Stock operation errors
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    OutOfStock {
        product: String,
        requested: i64,
        available: i64,
    },

    #[error("Product {0} is not available for sale")]
    Unavailable(String),

    #[error("Product {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// Stock ledger — atomic reserve/release over the product repository
#[derive(Clone)]
pub struct StockLedger {
    products: ProductRepository,
}

impl StockLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            products: ProductRepository::new(db),
        }
    }

    pub fn with_repository(products: ProductRepository) -> Self {
        Self { products }
    }

    /// Reserve `quantity` units of a product
    ///
    /// Returns the remaining stock after the deduction.
    pub async fn reserve(&self, product: &RecordId, quantity: i64) -> Result<i64, StockError> {
        if quantity < 1 {
            return Err(StockError::Repo(RepoError::Validation(
                "quantity must be at least 1".into(),
            )));
        }

        match self.products.reserve_stock(product, quantity).await? {
            Some(updated) => {
                tracing::debug!(
                    product = %product,
                    quantity,
                    remaining = updated.stock,
                    "stock reserved"
                );
                Ok(updated.stock)
            }
            // Zero rows updated — find out why
            None => match self.products.find_by_record_id(product).await? {
                None => Err(StockError::NotFound(product.to_string())),
                Some(p) if !p.is_available => Err(StockError::Unavailable(p.name)),
                Some(p) => Err(StockError::OutOfStock {
                    product: p.name,
                    requested: quantity,
                    available: p.stock,
                }),
            },
        }
    }

    /// Release `quantity` units back to a product (restock)
    ///
    /// Fails with `NotFound` when the product has been deleted; callers
    /// restocking a cancelled order log and skip rather than abort.
    pub async fn release(&self, product: &RecordId, quantity: i64) -> Result<i64, StockError> {
        if quantity < 1 {
            return Err(StockError::Repo(RepoError::Validation(
                "quantity must be at least 1".into(),
            )));
        }

        match self.products.release_stock(product, quantity).await? {
            Some(updated) => {
                tracing::debug!(
                    product = %product,
                    quantity,
                    stock = updated.stock,
                    "stock released"
                );
                Ok(updated.stock)
            }
            None => Err(StockError::NotFound(product.to_string())),
        }
    }
}
