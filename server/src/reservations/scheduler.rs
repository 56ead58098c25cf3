//! Reservation Scheduler
//!
//! Conflict detection between reservation windows and server-side enforced
//! reservation creation. Only PENDING / CONFIRMED reservations claim a
//! window; terminal reservations never conflict.
//!
//! Two conflict policies exist. True interval overlap is the default;
//! the fixed proximity window reproduces the legacy rule where two bookings
//! collide whenever their start times are less than two hours apart,
//! regardless of actual durations.

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;
use validator::Validate;

use super::ReservationError;
use crate::auth::CurrentUser;
use crate::db::models::{
    DiningTable, Reservation, ReservationCreate, ReservationStatus, TableStatus,
};
use crate::db::repository::DiningTableRepository;
use crate::utils::time::{parse_date, parse_hhmm};

/// Guarded-write retry budget
const MAX_WRITE_RETRIES: usize = 3;

/// How two reservation windows are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Half-open `[start, start+duration)` interval overlap
    IntervalOverlap,
    /// Legacy rule: conflict iff start times are closer than the window
    FixedWindow,
}

impl ConflictPolicy {
    /// Parse a policy name from configuration
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "interval_overlap" | "overlap" => Some(Self::IntervalOverlap),
            "fixed_window" | "proximity" => Some(Self::FixedWindow),
            _ => None,
        }
    }
}

/// Do two same-day windows collide under `policy`?
///
/// Starts and durations are minutes; `window_minutes` only applies to
/// `FixedWindow`.
pub fn windows_collide(
    policy: ConflictPolicy,
    window_minutes: i64,
    a_start: i64,
    a_duration: i64,
    b_start: i64,
    b_duration: i64,
) -> bool {
    match policy {
        ConflictPolicy::IntervalOverlap => {
            a_start < b_start + b_duration && b_start < a_start + a_duration
        }
        ConflictPolicy::FixedWindow => (a_start - b_start).abs() < window_minutes,
    }
}

/// Reservation scheduler — conflict checking and creation
#[derive(Clone)]
pub struct ReservationScheduler {
    tables: DiningTableRepository,
    policy: ConflictPolicy,
    window_minutes: i64,
    default_duration_minutes: i64,
}

impl ReservationScheduler {
    pub fn new(
        tables: DiningTableRepository,
        policy: ConflictPolicy,
        window_minutes: i64,
        default_duration_minutes: i64,
    ) -> Self {
        Self {
            tables,
            policy,
            window_minutes,
            default_duration_minutes,
        }
    }

    /// Convenience constructor with the default policy settings
    pub fn from_db(db: Surreal<Db>) -> Self {
        Self::new(
            DiningTableRepository::new(db),
            ConflictPolicy::IntervalOverlap,
            120,
            120,
        )
    }

    /// Does a proposed window collide with any blocking reservation on `table`?
    pub fn conflicts(
        &self,
        table: &DiningTable,
        date: NaiveDate,
        start_min: i64,
        duration_minutes: i64,
        exclude_id: Option<&str>,
    ) -> bool {
        table.reservations.iter().any(|r| {
            if exclude_id.is_some_and(|id| id == r.id) {
                return false;
            }
            if !r.status.is_blocking() || r.date != date {
                return false;
            }
            match parse_hhmm(&r.time) {
                Some(existing_start) => windows_collide(
                    self.policy,
                    self.window_minutes,
                    start_min,
                    duration_minutes,
                    existing_start,
                    r.duration_minutes,
                ),
                None => {
                    tracing::warn!(
                        reservation = %r.id,
                        time = %r.time,
                        "stored reservation has unparseable time, skipping in conflict check"
                    );
                    false
                }
            }
        })
    }

    /// Read-only conflict probe against a stored table
    pub async fn has_conflict(
        &self,
        table_id: &str,
        date: &str,
        time: &str,
        duration_minutes: Option<i64>,
        exclude_id: Option<&str>,
    ) -> Result<bool, ReservationError> {
        let date = parse_date(date)
            .ok_or_else(|| ReservationError::Validation(format!("Invalid date: {}", date)))?;
        let start = parse_hhmm(time)
            .ok_or_else(|| ReservationError::Validation(format!("Invalid time: {}", time)))?;
        let duration = duration_minutes.unwrap_or(self.default_duration_minutes);

        let table = self
            .tables
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| ReservationError::TableNotFound(table_id.to_string()))?;

        Ok(self.conflicts(&table, date, start, duration, exclude_id))
    }

    /// Create a reservation, enforcing the conflict check server-side
    ///
    /// The check and the append run against the same observed `revision`;
    /// a concurrent writer bumps it and forces a reload, so two bookings
    /// can never both pass the check.
    pub async fn create_reservation(
        &self,
        table_id: &str,
        data: ReservationCreate,
        actor: Option<&CurrentUser>,
        now_ms: i64,
    ) -> Result<(DiningTable, Reservation), ReservationError> {
        data.validate()
            .map_err(|e| ReservationError::Validation(e.to_string()))?;

        let date = parse_date(&data.date)
            .ok_or_else(|| ReservationError::Validation(format!("Invalid date: {}", data.date)))?;
        let start = parse_hhmm(&data.time)
            .ok_or_else(|| ReservationError::Validation(format!("Invalid time: {}", data.time)))?;
        let duration = data
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        if duration < 1 {
            return Err(ReservationError::Validation(
                "duration must be at least one minute".to_string(),
            ));
        }

        for _ in 0..MAX_WRITE_RETRIES {
            let table = self
                .tables
                .find_by_id(table_id)
                .await?
                .ok_or_else(|| ReservationError::TableNotFound(table_id.to_string()))?;

            if table.status == TableStatus::Maintenance {
                return Err(ReservationError::UnderMaintenance(table.number.to_string()));
            }
            if data.guests > table.capacity {
                return Err(ReservationError::Validation(format!(
                    "Table {} seats {} guests",
                    table.number, table.capacity
                )));
            }
            if self.conflicts(&table, date, start, duration, None) {
                return Err(ReservationError::TimeConflict);
            }

            let reservation = Reservation {
                id: Uuid::new_v4().to_string(),
                user: actor.map(|u| u.id.clone()),
                customer_name: data.customer_name.clone(),
                phone: data.phone.clone(),
                email: data.email.clone(),
                guests: data.guests,
                date,
                time: data.time.clone(),
                duration_minutes: duration,
                status: ReservationStatus::Pending,
                notes: data.notes.clone(),
                created_at: now_ms,
            };

            let record_id = table
                .id
                .clone()
                .ok_or_else(|| ReservationError::TableNotFound(table_id.to_string()))?;

            match self
                .tables
                .append_reservation(&record_id, &reservation, table.revision)
                .await?
            {
                Some(updated) => {
                    tracing::info!(
                        table = %record_id,
                        reservation = %reservation.id,
                        date = %date,
                        time = %reservation.time,
                        "reservation created"
                    );
                    return Ok((updated, reservation));
                }
                // Revision moved under us — reload and re-check
                None => continue,
            }
        }

        Err(ReservationError::Contention(table_id.to_string()))
    }
}
