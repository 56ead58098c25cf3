//! Reservation domain errors

use thiserror::Error;

use crate::db::models::ReservationStatus;
use crate::db::repository::RepoError;

/// Errors surfaced by reservation scheduling and transitions
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Reservation {0} not found")]
    NotFound(String),

    #[error("The requested time conflicts with an existing reservation on this table")]
    TimeConflict,

    #[error("Table {0} is under maintenance")]
    UnderMaintenance(String),

    #[error("Invalid reservation transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Table {0} was modified concurrently, retries exhausted")]
    Contention(String),

    #[error("{0}")]
    Repo(#[from] RepoError),
}
