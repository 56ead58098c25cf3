//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) storage. The store guarantees
//! atomicity per statement on a single document; everything that needs
//! more than that (checkout, reservation writes) layers conditional
//! updates and compensation on top — see the orders and reservations
//! modules.

pub mod models;
pub mod repository;
pub mod schema;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "saffron";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        schema::define(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database connection established ({})", db_path);

        Ok(Self { db })
    }
}
