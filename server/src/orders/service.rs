//! Order Service
//!
//! Checkout and order lifecycle. The store is atomic per document only, so
//! order creation runs as a compensated sequence: promotion redemption and
//! per-line stock reservations each have an idempotent undo that fires when
//! a later step fails in the same request.
//!
//! # Checkout Flow
//!
//! ```text
//! create_order(payload)
//!     ├─ 1. Validate payload, load products, snapshot unit prices
//!     ├─ 2. Validate promotion code and record usage (conditional increment)
//!     ├─ 3. Reserve stock per line item (conditional decrement, in item order)
//!     │      └─ on failure: release reserved lines, rescind usage, abort
//!     └─ 4. Persist the order (PENDING / payment PENDING)
//!            └─ on failure: same full rollback
//! ```

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use validator::Validate;

use super::OrderError;
use super::status::validate_transition;
use crate::auth::{CurrentUser, can_manage_resource};
use crate::db::models::{
    Order, OrderCreate, OrderItem, OrderStatus, PaymentStatus, Product,
};
use crate::db::repository::{
    OrderRepository, ProductRepository, RepoError, parse_record_id,
};
use crate::promotions::{PromotionEngine, ValidatedPromotion};
use crate::stock::{StockError, StockLedger};

/// Guarded-update retry budget for status transitions
const MAX_TRANSITION_RETRIES: usize = 3;

/// Order service — orchestrates the stock ledger and promotion engine
#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    products: ProductRepository,
    stock: StockLedger,
    promotions: PromotionEngine,
}

impl OrderService {
    /// Wire the service from its collaborators
    pub fn new(
        orders: OrderRepository,
        products: ProductRepository,
        stock: StockLedger,
        promotions: PromotionEngine,
    ) -> Self {
        Self {
            orders,
            products,
            stock,
            promotions,
        }
    }

    /// Convenience constructor over a shared database handle
    pub fn from_db(db: Surreal<Db>) -> Self {
        Self::new(
            OrderRepository::new(db.clone()),
            ProductRepository::new(db.clone()),
            StockLedger::new(db.clone()),
            PromotionEngine::new(db),
        )
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Create an order for `actor` (the checkout saga)
    pub async fn create_order(
        &self,
        actor: &CurrentUser,
        payload: OrderCreate,
        now_ms: i64,
    ) -> Result<Order, OrderError> {
        payload
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        // 1. Resolve products and snapshot prices
        let mut lines: Vec<(RecordId, Product, i64)> = Vec::with_capacity(payload.items.len());
        for item in &payload.items {
            let product_id = parse_record_id("product", &item.product)?;
            let product = self
                .products
                .find_by_record_id(&product_id)
                .await?
                .ok_or_else(|| StockError::NotFound(item.product.clone()))?;
            lines.push((product_id, product, item.quantity));
        }

        let subtotal: i64 = lines.iter().map(|(_, p, qty)| p.price * qty).sum();
        let product_ids: Vec<RecordId> = lines.iter().map(|(id, _, _)| id.clone()).collect();

        let table = match &payload.table {
            Some(id) => Some(parse_record_id("dining_table", id)?),
            None => None,
        };

        // 2. Redeem the promotion code, if any
        let mut redeemed: Option<ValidatedPromotion> = None;
        if let Some(code) = payload.promotion_code.as_deref()
            && !code.trim().is_empty()
        {
            let validated = self
                .promotions
                .validate(code, subtotal, &product_ids, now_ms)
                .await?;
            let promotion_id = validated
                .promotion
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("promotion has no id".into()))?;
            self.promotions.record_usage(&promotion_id).await?;
            redeemed = Some(validated);
        }

        // 3. Reserve stock per line, rolling back on the first failure
        let mut reserved: Vec<(RecordId, i64)> = Vec::with_capacity(lines.len());
        for (product_id, _, quantity) in &lines {
            if let Err(e) = self.stock.reserve(product_id, *quantity).await {
                self.rollback(&reserved, redeemed.as_ref()).await;
                return Err(e.into());
            }
            reserved.push((product_id.clone(), *quantity));
        }

        // 4. Persist with prices frozen at this moment
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|(product_id, product, quantity)| OrderItem {
                product: product_id.clone(),
                name: product.name.clone(),
                quantity: *quantity,
                unit_price: product.price,
                line_total: product.price * quantity,
            })
            .collect();

        let discount_amount = redeemed.as_ref().map(|v| v.discount).unwrap_or(0);
        let order = Order {
            id: None,
            user: actor.id.clone(),
            items,
            order_type: payload.order_type,
            table,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            subtotal,
            discount_amount,
            total_amount: subtotal - discount_amount,
            promotion: redeemed.as_ref().and_then(|v| v.promotion.id.clone()),
            promotion_code: redeemed.as_ref().map(|v| v.promotion.code.clone()),
            created_at: now_ms,
            updated_at: now_ms,
        };

        match self.orders.create(order).await {
            Ok(created) => {
                tracing::info!(
                    order = %created.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                    user = %actor.id,
                    subtotal,
                    discount = discount_amount,
                    "order created"
                );
                Ok(created)
            }
            Err(e) => {
                self.rollback(&reserved, redeemed.as_ref()).await;
                Err(e.into())
            }
        }
    }

    /// Undo already-applied checkout side effects, best effort
    async fn rollback(&self, reserved: &[(RecordId, i64)], redeemed: Option<&ValidatedPromotion>) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.stock.release(product_id, *quantity).await {
                tracing::error!(
                    product = %product_id,
                    quantity,
                    error = %e,
                    "failed to release stock during checkout rollback"
                );
            }
        }

        if let Some(validated) = redeemed
            && let Some(promotion_id) = &validated.promotion.id
            && let Err(e) = self.promotions.rescind_usage(promotion_id).await
        {
            tracing::error!(
                promotion = %promotion_id,
                error = %e,
                "failed to rescind promotion usage during checkout rollback"
            );
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Move an order to `new_status` on behalf of `actor`
    ///
    /// The write is guarded on the status observed when validating, so two
    /// racing transitions cannot both succeed from the same state — which is
    /// what makes the cancellation restock exactly-once.
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        order_id: &str,
        new_status: OrderStatus,
        now_ms: i64,
    ) -> Result<Order, OrderError> {
        for _ in 0..MAX_TRANSITION_RETRIES {
            let order = self
                .orders
                .find_by_id(order_id)
                .await?
                .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

            if !can_manage_resource(actor, Some(order.user.as_str()), None) {
                return Err(OrderError::Forbidden(
                    "Not the owner of this order".to_string(),
                ));
            }

            validate_transition(order.status, new_status, actor.is_staff())?;

            // Completion implies settlement
            let payment_status = if new_status == OrderStatus::Completed
                && order.payment_status == PaymentStatus::Pending
            {
                Some(PaymentStatus::Paid)
            } else {
                None
            };

            let record_id = order
                .id
                .clone()
                .ok_or_else(|| RepoError::Database("order has no id".into()))?;

            match self
                .orders
                .update_status(&record_id, order.status, new_status, payment_status, now_ms)
                .await?
            {
                Some(updated) => {
                    if new_status == OrderStatus::Cancelled {
                        self.restock(&updated).await?;
                    }
                    tracing::info!(
                        order = %record_id,
                        from = ?order.status,
                        to = ?new_status,
                        actor = %actor.id,
                        "order status updated"
                    );
                    return Ok(updated);
                }
                // The order moved between our read and our write — retry
                None => continue,
            }
        }

        Err(OrderError::Contention(order_id.to_string()))
    }

    /// Cancel an order (owner path; the role rules still apply)
    pub async fn cancel_order(
        &self,
        actor: &CurrentUser,
        order_id: &str,
        now_ms: i64,
    ) -> Result<Order, OrderError> {
        self.update_status(actor, order_id, OrderStatus::Cancelled, now_ms)
            .await
    }

    /// Return every line item to stock after cancellation
    ///
    /// Deleted products are skipped rather than failing the cancellation.
    async fn restock(&self, order: &Order) -> Result<(), OrderError> {
        for item in &order.items {
            match self.stock.release(&item.product, item.quantity).await {
                Ok(_) => {}
                Err(StockError::NotFound(product)) => {
                    tracing::warn!(
                        product = %product,
                        quantity = item.quantity,
                        "product gone, skipping restock"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// List orders: staff see everything, customers see their own
    pub async fn list_orders(
        &self,
        actor: &CurrentUser,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, OrderError> {
        let orders = if actor.is_staff() {
            self.orders.find_all(limit, offset).await?
        } else {
            self.orders.find_by_user(&actor.id, limit, offset).await?
        };
        Ok(orders)
    }

    /// Fetch one order, owner-or-staff
    pub async fn get_order(&self, actor: &CurrentUser, order_id: &str) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        if !can_manage_resource(actor, Some(order.user.as_str()), None) {
            return Err(OrderError::Forbidden(
                "Not the owner of this order".to_string(),
            ));
        }

        Ok(order)
    }
}
