//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity (catalog unit)
///
/// `stock` is the authoritative count of sellable units and is only mutated
/// through the stock ledger's conditional updates. Invariant: never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Unit price in minor currency units
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Create product payload
///
/// Catalog management lives in the back office; this is used by seeding and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: i64,
    pub stock: Option<i64>,
    pub is_available: Option<bool>,
}
