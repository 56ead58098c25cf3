//! Product Repository
//!
//! Stock mutations are single conditional UPDATE statements so that two
//! concurrent checkouts can never both pass a read-then-write check.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all available products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_available = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by RecordId
    pub async fn find_by_record_id(&self, id: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(id.clone()).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0 {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        if data.stock.unwrap_or(0) < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            stock: data.stock.unwrap_or(0),
            is_available: data.is_available.unwrap_or(true),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Conditionally decrement stock: only applies where the product is
    /// available and holds at least `quantity` units.
    ///
    /// Returns `None` when the condition did not match (no row updated);
    /// the caller diagnoses why.
    pub async fn reserve_stock(
        &self,
        id: &RecordId,
        quantity: i64,
    ) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET stock -= $qty \
                 WHERE is_available = true AND stock >= $qty RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("qty", quantity))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Unconditionally increment stock (restock on cancellation)
    ///
    /// Returns `None` when the product no longer exists.
    pub async fn release_stock(
        &self,
        id: &RecordId,
        quantity: i64,
    ) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET stock += $qty RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("qty", quantity))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }
}
