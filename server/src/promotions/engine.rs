//! Promotion Engine
//!
//! Validates promotion codes against their time window, usage cap, minimum
//! order value and product applicability, and computes the discount.
//!
//! `validate` never mutates anything — usage is committed separately via
//! [`PromotionEngine::record_usage`] once checkout decides to go through,
//! and rescinded with [`PromotionEngine::rescind_usage`] when a later
//! checkout step fails.

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use super::discount;
use crate::db::models::Promotion;
use crate::db::repository::{PromotionRepository, RepoError};

/// Promotion validation errors — each maps to a distinct reason for the caller
#[derive(Debug, Error)]
pub enum PromotionError {
    #[error("Promotion code {0} not found")]
    NotFound(String),

    #[error("Promotion code {0} is expired or not active")]
    Expired(String),

    #[error("Promotion code {0} has reached its usage limit")]
    UsageLimitReached(String),

    #[error("Order subtotal {subtotal} is below the minimum {minimum} required for {code}")]
    MinimumOrderNotMet {
        code: String,
        subtotal: i64,
        minimum: i64,
    },

    #[error("Promotion code {0} does not apply to any product in this order")]
    NotApplicable(String),

    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// A validated promotion together with its computed discount
#[derive(Debug, Clone)]
pub struct ValidatedPromotion {
    pub promotion: Promotion,
    pub discount: i64,
}

/// Promotion engine — validation and usage accounting
#[derive(Clone)]
pub struct PromotionEngine {
    promotions: PromotionRepository,
}

impl PromotionEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            promotions: PromotionRepository::new(db),
        }
    }

    pub fn with_repository(promotions: PromotionRepository) -> Self {
        Self { promotions }
    }

    /// Validate a code against an order and compute the discount
    ///
    /// An empty `product_ids` slice skips the applicability check — the code
    /// is treated as applying to everything.
    pub async fn validate(
        &self,
        code: &str,
        subtotal: i64,
        product_ids: &[RecordId],
        now_ms: i64,
    ) -> Result<ValidatedPromotion, PromotionError> {
        let normalized = code.trim().to_uppercase();

        let promotion = self
            .promotions
            .find_by_code(&normalized)
            .await?
            .ok_or_else(|| PromotionError::NotFound(normalized.clone()))?;

        if !promotion.is_active || now_ms < promotion.starts_at || now_ms > promotion.ends_at {
            return Err(PromotionError::Expired(normalized));
        }

        // Advisory pre-check; record_usage is the authoritative gate
        if let Some(limit) = promotion.usage_limit
            && promotion.usage_count >= limit
        {
            return Err(PromotionError::UsageLimitReached(normalized));
        }

        if subtotal < promotion.min_order_value {
            return Err(PromotionError::MinimumOrderNotMet {
                code: normalized,
                subtotal,
                minimum: promotion.min_order_value,
            });
        }

        if !promotion.applicable_products.is_empty()
            && !product_ids.is_empty()
            && !product_ids
                .iter()
                .any(|p| promotion.applicable_products.contains(p))
        {
            return Err(PromotionError::NotApplicable(normalized));
        }

        let discount = discount::compute_discount(&promotion, subtotal);

        Ok(ValidatedPromotion {
            promotion,
            discount,
        })
    }

    /// Commit one redemption
    ///
    /// The increment only applies while under the usage limit; a zero-effect
    /// update surfaces as `UsageLimitReached`.
    pub async fn record_usage(&self, promotion: &RecordId) -> Result<(), PromotionError> {
        match self.promotions.increment_usage(promotion).await? {
            Some(updated) => {
                tracing::debug!(
                    promotion = %promotion,
                    usage_count = updated.usage_count,
                    "promotion usage recorded"
                );
                Ok(())
            }
            None => match self.promotions.find_by_id(&promotion.to_string()).await? {
                Some(p) => Err(PromotionError::UsageLimitReached(p.code)),
                None => Err(PromotionError::NotFound(promotion.to_string())),
            },
        }
    }

    /// Undo a recorded redemption (compensation for a failed checkout)
    ///
    /// Note: order *cancellation* deliberately does not call this — a
    /// cancelled order keeps its redemption, matching the original
    /// product behavior.
    pub async fn rescind_usage(&self, promotion: &RecordId) -> Result<(), PromotionError> {
        if self.promotions.decrement_usage(promotion).await?.is_none() {
            tracing::warn!(
                promotion = %promotion,
                "rescind had no effect (usage already zero or promotion deleted)"
            );
        }
        Ok(())
    }
}
