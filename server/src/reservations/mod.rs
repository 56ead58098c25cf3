//! Reservations Module
//!
//! Table reservation scheduling (conflict detection) and the coupled
//! reservation/table status state machine.

pub mod error;
pub mod scheduler;
pub mod state;

pub use error::ReservationError;
pub use scheduler::{ConflictPolicy, ReservationScheduler, windows_collide};
pub use state::TableStateMachine;
