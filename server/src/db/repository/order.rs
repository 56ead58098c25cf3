//! Order Repository
//!
//! Status writes are guarded on the previously observed status, so a
//! transition either wins the race or reports that the order moved on.
//! The cancellation restock relies on this to fire exactly once.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderStatus, PaymentStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find all orders, newest first (paginated)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find a user's orders, newest first (paginated)
    pub async fn find_by_user(
        &self,
        user: &str,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Order>> {
        let user_owned = user.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM `order` WHERE user = $user \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
            )
            .bind(("user", user_owned))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Conditionally move an order from `expected` to `status`
    ///
    /// Returns `None` when the order was not in `expected` anymore —
    /// the caller reloads and revalidates.
    pub async fn update_status(
        &self,
        id: &RecordId,
        expected: OrderStatus,
        status: OrderStatus,
        payment_status: Option<PaymentStatus>,
        now_ms: i64,
    ) -> RepoResult<Option<Order>> {
        let query = if payment_status.is_some() {
            "UPDATE $thing SET status = $status, payment_status = $payment_status, \
             updated_at = $now WHERE status = $expected RETURN AFTER"
        } else {
            "UPDATE $thing SET status = $status, updated_at = $now \
             WHERE status = $expected RETURN AFTER"
        };

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .bind(("expected", expected))
            .bind(("now", now_ms));
        if let Some(payment) = payment_status {
            request = request.bind(("payment_status", payment));
        }

        let mut result = request.await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
