//! Schema Definitions
//!
//! Idempotent DEFINE statements run at startup. The store is otherwise
//! schemaless; only the uniqueness constraints live here.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Define unique indexes for promotion codes and table numbers
pub async fn define(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS promotion_code_unique \
         ON TABLE promotion FIELDS code UNIQUE",
    )
    .await?
    .check()?;

    db.query(
        "DEFINE INDEX IF NOT EXISTS dining_table_number_unique \
         ON TABLE dining_table FIELDS number UNIQUE",
    )
    .await?
    .check()?;

    Ok(())
}
