//! Dining Table Model
//!
//! 预约 (Reservation) 内嵌在桌台文档里，保证对同一桌台的预约变更
//! 落在单文档原子更新上。`revision` 是乐观并发计数器，
//! 每次预约写入都会递增。

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Table status enum — a projection derived from reservation state,
/// except when staff override it manually.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// Reservation status enum
///
/// PENDING → CONFIRMED → COMPLETED (check-in)，CANCELLED 可从
/// PENDING / CONFIRMED 进入。COMPLETED / CANCELLED 为终态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled
        )
    }

    /// Only PENDING / CONFIRMED reservations claim the table window
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }
}

/// Reservation record, embedded in its dining table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// UUID, unique within the table
    pub id: String,
    /// Requesting user id; None for guest bookings made before login
    pub user: Option<String>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guests: i64,
    pub date: NaiveDate,
    /// Local time of day, HH:MM
    pub time: String,
    pub duration_minutes: i64,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    /// Unix millis
    pub created_at: i64,
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Table number, unique
    pub number: i64,
    #[serde(default = "default_capacity")]
    pub capacity: i64,
    pub status: TableStatus,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    /// Optimistic concurrency counter
    #[serde(default)]
    pub revision: i64,
}

fn default_capacity() -> i64 {
    4
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i64,
    pub capacity: Option<i64>,
}

/// Create reservation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationCreate {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 1))]
    pub guests: i64,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

/// Update reservation status payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}

/// Update table status payload (manual staff override)
#[derive(Debug, Clone, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}
