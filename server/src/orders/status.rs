//! Order status transitions
//!
//! PENDING → CONFIRMED → PREPARING → READY → COMPLETED, with CANCELLED
//! reachable from every non-terminal state. Staff may move an order to any
//! status from a non-terminal state; customers may only cancel, and only
//! from PENDING or CONFIRMED.

use super::OrderError;
use crate::db::models::OrderStatus;

/// Validate a requested transition for the acting role
pub fn validate_transition(
    from: OrderStatus,
    to: OrderStatus,
    is_staff: bool,
) -> Result<(), OrderError> {
    if from.is_terminal() {
        return Err(OrderError::InvalidTransition { from, to });
    }

    if is_staff {
        return Ok(());
    }

    if to != OrderStatus::Cancelled {
        return Err(OrderError::Forbidden(
            "Customers may only cancel their orders".to_string(),
        ));
    }

    match from {
        OrderStatus::Pending | OrderStatus::Confirmed => Ok(()),
        _ => Err(OrderError::InvalidTransition { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_staff_may_set_any_status_from_non_terminal() {
        assert!(validate_transition(Pending, Confirmed, true).is_ok());
        assert!(validate_transition(Pending, Completed, true).is_ok());
        assert!(validate_transition(Ready, Preparing, true).is_ok());
        assert!(validate_transition(Preparing, Cancelled, true).is_ok());
    }

    #[test]
    fn test_terminal_states_reject_everyone() {
        assert!(matches!(
            validate_transition(Completed, Cancelled, true),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(matches!(
            validate_transition(Cancelled, Pending, true),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(matches!(
            validate_transition(Cancelled, Cancelled, false),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_customer_may_cancel_early_states_only() {
        assert!(validate_transition(Pending, Cancelled, false).is_ok());
        assert!(validate_transition(Confirmed, Cancelled, false).is_ok());
        assert!(matches!(
            validate_transition(Preparing, Cancelled, false),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(matches!(
            validate_transition(Ready, Cancelled, false),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_customer_may_not_set_other_statuses() {
        assert!(matches!(
            validate_transition(Pending, Confirmed, false),
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            validate_transition(Confirmed, Preparing, false),
            Err(OrderError::Forbidden(_))
        ));
    }
}
