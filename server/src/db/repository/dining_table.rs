//! Dining Table Repository
//!
//! Reservation writes replace the embedded array under the table's
//! `revision` guard. Two writers loading the same revision cannot both
//! commit; the loser reloads and retries.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{DiningTable, DiningTableCreate, Reservation, TableStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all dining tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = parse_record_id(TABLE, id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by number
    pub async fn find_by_number(&self, number: i64) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate number
        if self.find_by_number(data.number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                data.number
            )));
        }

        let table = DiningTable {
            id: None,
            number: data.number,
            capacity: data.capacity.unwrap_or(4),
            status: TableStatus::Available,
            reservations: Vec::new(),
            revision: 0,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Append a reservation under the revision guard
    ///
    /// Returns `None` when `expected_revision` no longer matches.
    pub async fn append_reservation(
        &self,
        id: &RecordId,
        reservation: &Reservation,
        expected_revision: i64,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET reservations += $reservation, revision += 1 \
                 WHERE revision = $revision RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("reservation", reservation.clone()))
            .bind(("revision", expected_revision))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Replace the reservation array and table status under the revision guard
    ///
    /// Returns `None` when `expected_revision` no longer matches.
    pub async fn store_reservations(
        &self,
        id: &RecordId,
        reservations: Vec<Reservation>,
        status: TableStatus,
        expected_revision: i64,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET reservations = $reservations, status = $status, \
                 revision += 1 WHERE revision = $revision RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("reservations", reservations))
            .bind(("status", status))
            .bind(("revision", expected_revision))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Set table status unconditionally (manual staff override)
    pub async fn set_status(&self, id: &str, status: TableStatus) -> RepoResult<DiningTable> {
        let thing = parse_record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        tables
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }
}
