//! Order Model
//!
//! 订单一旦创建，行项目与单价全部冻结（下单时点快照，而非目录实时价格）。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Order status enum
///
/// PENDING → CONFIRMED → PREPARING → READY → COMPLETED，
/// CANCELLED 可从任何非终态进入。COMPLETED / CANCELLED 为终态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// Order type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeaway,
    Delivery,
}

/// Order line item — price and name captured at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub quantity: i64,
    /// Unit price in minor currency units at order time
    pub unit_price: i64,
    pub line_total: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user id
    pub user: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: i64,
    #[serde(default)]
    pub discount_amount: i64,
    pub total_amount: i64,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub promotion: Option<RecordId>,
    pub promotion_code: Option<String>,
    /// Unix millis
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Order line item input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    /// Product ID as string (e.g. "product:xxx")
    pub product: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub order_type: OrderType,
    /// Table ID as string, for dine-in orders
    pub table: Option<String>,
    pub promotion_code: Option<String>,
}

/// Update order status payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
