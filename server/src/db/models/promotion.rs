//! Promotion Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Discount type enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// Promotion entity (优惠码)
///
/// `code` is stored uppercase and unique. `usage_count` only moves through
/// the promotion engine's conditional increment, so it never exceeds
/// `usage_limit` when a limit is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percent for PERCENTAGE (e.g. 20 = 20%), minor currency units for FIXED
    pub discount_value: f64,
    /// Cap applied to percentage discounts (minor units)
    pub max_discount: Option<i64>,
    /// Minimum order subtotal required to redeem (minor units)
    #[serde(default)]
    pub min_order_value: i64,
    /// Validity window, Unix millis
    pub starts_at: i64,
    pub ends_at: i64,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub usage_count: i64,
    /// Empty set means the code applies to every product
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub applicable_products: Vec<RecordId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create promotion payload (back office)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount: Option<i64>,
    pub min_order_value: Option<i64>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub usage_limit: Option<i64>,
    /// Target IDs as strings (e.g. "product:xxx")
    pub applicable_products: Option<Vec<String>>,
}
