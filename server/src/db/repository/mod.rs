//! Repository Module
//!
//! Provides CRUD and conditional-update operations for SurrealDB tables.
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 格式：
//!   - 解析: let id: RecordId = "product:abc".parse()?;
//!   - 创建: let id = RecordId::from_table_key("product", "abc");
//!   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

pub mod dining_table;
pub mod order;
pub mod product;
pub mod promotion;

// Re-exports
pub use dining_table::DiningTableRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use promotion::PromotionRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an ID that may or may not carry its table prefix
///
/// Accepts both "product:abc" and "abc" (with `table` supplying the prefix).
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let parsed: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if parsed.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected a {} ID, got: {}",
                table, id
            )));
        }
        Ok(parsed)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
