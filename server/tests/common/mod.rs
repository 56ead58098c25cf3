//! Shared test fixtures
//!
//! Every suite runs the real services against the in-memory engine.

#![allow(dead_code)]

use surrealdb::engine::local::{Db, Mem};
use surrealdb::{RecordId, Surreal};

use saffron_server::auth::{CurrentUser, Role};
use saffron_server::db::models::{
    DiningTableCreate, DiscountType, OrderCreate, OrderItemInput, OrderType, Promotion,
    PromotionCreate, ReservationCreate,
};
use saffron_server::db::repository::{
    DiningTableRepository, ProductRepository, PromotionRepository,
};
use saffron_server::db::schema;

/// 2024-06-01T12:00:00Z
pub const NOW: i64 = 1_717_243_200_000;

pub async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("open in-memory db");
    db.use_ns("test").use_db("test").await.expect("select ns/db");
    schema::define(&db).await.expect("define schema");
    db
}

pub fn customer(id: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        name: format!("Customer {id}"),
        email: None,
        role: Role::Customer,
    }
}

pub fn customer_with_email(id: &str, email: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        name: format!("Customer {id}"),
        email: Some(email.to_string()),
        role: Role::Customer,
    }
}

pub fn staff() -> CurrentUser {
    CurrentUser {
        id: "staff-1".to_string(),
        name: "Staff".to_string(),
        email: None,
        role: Role::Staff,
    }
}

pub async fn seed_product(db: &Surreal<Db>, name: &str, price: i64, stock: i64) -> RecordId {
    let created = ProductRepository::new(db.clone())
        .create(saffron_server::db::models::ProductCreate {
            name: name.to_string(),
            price,
            stock: Some(stock),
            is_available: Some(true),
        })
        .await
        .expect("seed product");
    created.id.expect("product id")
}

pub async fn seed_unavailable_product(db: &Surreal<Db>, name: &str, price: i64) -> RecordId {
    let created = ProductRepository::new(db.clone())
        .create(saffron_server::db::models::ProductCreate {
            name: name.to_string(),
            price,
            stock: Some(100),
            is_available: Some(false),
        })
        .await
        .expect("seed product");
    created.id.expect("product id")
}

pub async fn stock_of(db: &Surreal<Db>, id: &RecordId) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_record_id(id)
        .await
        .expect("load product")
        .expect("product exists")
        .stock
}

pub fn fixed_promotion(code: &str, value: f64, min_order_value: i64) -> PromotionCreate {
    PromotionCreate {
        code: code.to_string(),
        description: None,
        discount_type: DiscountType::Fixed,
        discount_value: value,
        max_discount: None,
        min_order_value: Some(min_order_value),
        starts_at: 0,
        ends_at: i64::MAX,
        usage_limit: None,
        applicable_products: None,
    }
}

pub fn percent_promotion(code: &str, value: f64, max_discount: Option<i64>) -> PromotionCreate {
    PromotionCreate {
        code: code.to_string(),
        description: None,
        discount_type: DiscountType::Percentage,
        discount_value: value,
        max_discount,
        min_order_value: None,
        starts_at: 0,
        ends_at: i64::MAX,
        usage_limit: None,
        applicable_products: None,
    }
}

pub async fn seed_promotion(db: &Surreal<Db>, data: PromotionCreate) -> Promotion {
    PromotionRepository::new(db.clone())
        .create(data)
        .await
        .expect("seed promotion")
}

pub async fn usage_of(db: &Surreal<Db>, code: &str) -> i64 {
    PromotionRepository::new(db.clone())
        .find_by_code(&code.to_uppercase())
        .await
        .expect("load promotion")
        .expect("promotion exists")
        .usage_count
}

pub fn order_payload(items: &[(&RecordId, i64)], promotion_code: Option<&str>) -> OrderCreate {
    OrderCreate {
        items: items
            .iter()
            .map(|(product, quantity)| OrderItemInput {
                product: product.to_string(),
                quantity: *quantity,
            })
            .collect(),
        order_type: OrderType::Takeaway,
        table: None,
        promotion_code: promotion_code.map(|c| c.to_string()),
    }
}

pub async fn seed_table(db: &Surreal<Db>, number: i64, capacity: i64) -> String {
    let created = DiningTableRepository::new(db.clone())
        .create(DiningTableCreate {
            number,
            capacity: Some(capacity),
        })
        .await
        .expect("seed table");
    created.id.expect("table id").to_string()
}

pub fn reservation_payload(
    name: &str,
    email: Option<&str>,
    guests: i64,
    date: &str,
    time: &str,
    duration_minutes: Option<i64>,
) -> ReservationCreate {
    ReservationCreate {
        customer_name: name.to_string(),
        phone: "600123456".to_string(),
        email: email.map(|e| e.to_string()),
        guests,
        date: date.to_string(),
        time: time.to_string(),
        duration_minutes,
        notes: None,
    }
}
