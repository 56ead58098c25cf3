//! Promotion Repository
//!
//! Usage counting goes through conditional updates: the limit check and the
//! increment happen in one statement, closing the check-then-increment race.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Promotion, PromotionCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "promotion";

#[derive(Clone)]
pub struct PromotionRepository {
    base: BaseRepository,
}

impl PromotionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find promotion by code (caller normalizes to uppercase)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Promotion>> {
        let code_owned = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM promotion WHERE code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let promotions: Vec<Promotion> = result.take(0)?;
        Ok(promotions.into_iter().next())
    }

    /// Find promotion by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Promotion>> {
        let thing = parse_record_id(TABLE, id)?;
        let promotion: Option<Promotion> = self.base.db().select(thing).await?;
        Ok(promotion)
    }

    /// Create a new promotion
    pub async fn create(&self, data: PromotionCreate) -> RepoResult<Promotion> {
        let code = data.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(RepoError::Validation("code cannot be empty".into()));
        }
        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Promotion '{}' already exists",
                code
            )));
        }

        let applicable_products = data
            .applicable_products
            .unwrap_or_default()
            .iter()
            .map(|id| parse_record_id("product", id))
            .collect::<RepoResult<Vec<RecordId>>>()?;

        let promotion = Promotion {
            id: None,
            code,
            description: data.description,
            discount_type: data.discount_type,
            discount_value: data.discount_value,
            max_discount: data.max_discount,
            min_order_value: data.min_order_value.unwrap_or(0),
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            usage_limit: data.usage_limit,
            usage_count: 0,
            applicable_products,
            is_active: true,
        };

        let created: Option<Promotion> = self.base.db().create(TABLE).content(promotion).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create promotion".to_string()))
    }

    /// Conditionally increment usage: only applies while under the limit
    /// (or when no limit is set).
    ///
    /// Returns `None` when the condition did not match — the limit is hit.
    pub async fn increment_usage(&self, id: &RecordId) -> RepoResult<Option<Promotion>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET usage_count += 1 \
                 WHERE usage_count < (usage_limit ?? $unbounded) RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("unbounded", i64::MAX))
            .await?;
        let promotions: Vec<Promotion> = result.take(0)?;
        Ok(promotions.into_iter().next())
    }

    /// Compensating decrement, floored at zero
    ///
    /// Used when a later checkout step fails after usage was recorded.
    pub async fn decrement_usage(&self, id: &RecordId) -> RepoResult<Option<Promotion>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET usage_count -= 1 WHERE usage_count > 0 RETURN AFTER")
            .bind(("thing", id.clone()))
            .await?;
        let promotions: Vec<Promotion> = result.take(0)?;
        Ok(promotions.into_iter().next())
    }
}
