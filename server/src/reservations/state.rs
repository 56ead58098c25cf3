//! Table State Machine
//!
//! Reservation status transitions and the table status they project.
//! Table status is derived: confirming claims the table (RESERVED),
//! check-in occupies it (OCCUPIED), and cancelling frees it (AVAILABLE)
//! once no blocking reservation remains. Staff can still override the
//! projection manually.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::ReservationError;
use crate::auth::{CurrentUser, can_manage_resource};
use crate::db::models::{DiningTable, Reservation, ReservationStatus, TableStatus};
use crate::db::repository::DiningTableRepository;

/// Guarded-write retry budget
const MAX_WRITE_RETRIES: usize = 3;

/// Validate a reservation status transition
///
/// PENDING → CONFIRMED | COMPLETED | CANCELLED,
/// CONFIRMED → COMPLETED | CANCELLED. Terminal states admit nothing.
pub fn validate_transition(
    from: ReservationStatus,
    to: ReservationStatus,
) -> Result<(), ReservationError> {
    use ReservationStatus::*;

    let allowed = matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Completed)
            | (Pending, Cancelled)
            | (Confirmed, Completed)
            | (Confirmed, Cancelled)
    );

    if allowed {
        Ok(())
    } else {
        Err(ReservationError::InvalidTransition { from, to })
    }
}

/// Project the table status implied by a reservation entering `target`
///
/// `reservations` is the post-transition array.
pub fn derive_table_status(
    current: TableStatus,
    target: ReservationStatus,
    reservations: &[Reservation],
) -> TableStatus {
    match target {
        ReservationStatus::Confirmed => TableStatus::Reserved,
        ReservationStatus::Completed => TableStatus::Occupied,
        ReservationStatus::Cancelled => {
            if reservations.iter().any(|r| r.status.is_blocking()) {
                current
            } else {
                TableStatus::Available
            }
        }
        ReservationStatus::Pending => current,
    }
}

/// Table state machine — reservation transitions and table status
#[derive(Clone)]
pub struct TableStateMachine {
    tables: DiningTableRepository,
}

impl TableStateMachine {
    pub fn new(tables: DiningTableRepository) -> Self {
        Self { tables }
    }

    pub fn from_db(db: Surreal<Db>) -> Self {
        Self::new(DiningTableRepository::new(db))
    }

    /// Staff transition on a reservation (confirm, check-in, cancel)
    pub async fn update_reservation_status(
        &self,
        table_id: &str,
        reservation_id: &str,
        new_status: ReservationStatus,
    ) -> Result<DiningTable, ReservationError> {
        self.apply_transition(table_id, reservation_id, new_status, None)
            .await
    }

    /// Owner-or-staff cancellation
    ///
    /// Guest bookings carry no user id; ownership falls back to the contact
    /// email on the reservation.
    pub async fn cancel_reservation(
        &self,
        table_id: &str,
        reservation_id: &str,
        actor: &CurrentUser,
    ) -> Result<DiningTable, ReservationError> {
        self.apply_transition(
            table_id,
            reservation_id,
            ReservationStatus::Cancelled,
            Some(actor),
        )
        .await
    }

    /// Manual staff override of a table's status
    ///
    /// Bypasses the derivation rules on purpose.
    pub async fn set_table_status(
        &self,
        table_id: &str,
        status: TableStatus,
    ) -> Result<DiningTable, ReservationError> {
        let table = self.tables.set_status(table_id, status).await?;
        tracing::info!(table = %table_id, status = ?status, "table status overridden");
        Ok(table)
    }

    /// Apply a transition under the table's revision guard
    ///
    /// When `owner_check` is given, the actor must pass the owner-or-staff
    /// policy against the reservation before anything changes.
    async fn apply_transition(
        &self,
        table_id: &str,
        reservation_id: &str,
        new_status: ReservationStatus,
        owner_check: Option<&CurrentUser>,
    ) -> Result<DiningTable, ReservationError> {
        for _ in 0..MAX_WRITE_RETRIES {
            let table = self
                .tables
                .find_by_id(table_id)
                .await?
                .ok_or_else(|| ReservationError::TableNotFound(table_id.to_string()))?;

            let reservation = table
                .reservations
                .iter()
                .find(|r| r.id == reservation_id)
                .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;

            if let Some(actor) = owner_check
                && !can_manage_resource(actor, reservation.user.as_deref(), reservation.email.as_deref())
            {
                return Err(ReservationError::Forbidden(
                    "Not the owner of this reservation".to_string(),
                ));
            }

            validate_transition(reservation.status, new_status)?;

            let mut reservations = table.reservations.clone();
            for r in reservations.iter_mut() {
                if r.id == reservation_id {
                    r.status = new_status;
                }
            }

            let table_status = derive_table_status(table.status, new_status, &reservations);
            let record_id = table
                .id
                .clone()
                .ok_or_else(|| ReservationError::TableNotFound(table_id.to_string()))?;

            match self
                .tables
                .store_reservations(&record_id, reservations, table_status, table.revision)
                .await?
            {
                Some(updated) => {
                    tracing::info!(
                        table = %record_id,
                        reservation = %reservation_id,
                        status = ?new_status,
                        table_status = ?table_status,
                        "reservation status updated"
                    );
                    return Ok(updated);
                }
                // Revision moved under us — reload and revalidate
                None => continue,
            }
        }

        Err(ReservationError::Contention(table_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    fn make_reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            id: "r1".to_string(),
            user: None,
            customer_name: "Ana".to_string(),
            phone: "600000000".to_string(),
            email: None,
            guests: 2,
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: "18:00".to_string(),
            duration_minutes: 120,
            status,
            notes: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(validate_transition(Pending, Confirmed).is_ok());
        assert!(validate_transition(Confirmed, Completed).is_ok());
        // Walk-in check-in without prior confirmation
        assert!(validate_transition(Pending, Completed).is_ok());
        assert!(validate_transition(Pending, Cancelled).is_ok());
        assert!(validate_transition(Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(validate_transition(Completed, Cancelled).is_err());
        assert!(validate_transition(Cancelled, Confirmed).is_err());
        assert!(validate_transition(Cancelled, Cancelled).is_err());
    }

    #[test]
    fn test_backward_transition_rejected() {
        assert!(validate_transition(Confirmed, Pending).is_err());
    }

    #[test]
    fn test_confirm_reserves_table() {
        let reservations = vec![make_reservation(Confirmed)];
        assert_eq!(
            derive_table_status(TableStatus::Available, Confirmed, &reservations),
            TableStatus::Reserved
        );
    }

    #[test]
    fn test_checkin_occupies_table() {
        let reservations = vec![make_reservation(Completed)];
        assert_eq!(
            derive_table_status(TableStatus::Reserved, Completed, &reservations),
            TableStatus::Occupied
        );
    }

    #[test]
    fn test_cancel_frees_table_when_nothing_blocks() {
        let reservations = vec![make_reservation(Cancelled)];
        assert_eq!(
            derive_table_status(TableStatus::Reserved, Cancelled, &reservations),
            TableStatus::Available
        );
    }

    #[test]
    fn test_cancel_keeps_status_while_another_booking_blocks() {
        let mut other = make_reservation(Confirmed);
        other.id = "r2".to_string();
        let reservations = vec![make_reservation(Cancelled), other];
        assert_eq!(
            derive_table_status(TableStatus::Reserved, Cancelled, &reservations),
            TableStatus::Reserved
        );
    }
}
