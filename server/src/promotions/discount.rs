//! Discount Calculator
//!
//! Pure discount math. Uses rust_decimal for the percentage step and rounds
//! half-up back to minor currency units.

use crate::db::models::{DiscountType, Promotion};
use rust_decimal::prelude::*;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round a Decimal amount half-up to whole minor units
#[inline]
fn to_minor_units(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Compute the discount a promotion grants on `subtotal`
///
/// - PERCENTAGE: `subtotal * value / 100`, capped at `max_discount` when set
/// - FIXED: the value verbatim
///
/// Either way the result is clamped to `[0, subtotal]` — a discount never
/// exceeds what is being discounted.
pub fn compute_discount(promotion: &Promotion, subtotal: i64) -> i64 {
    let amount = match promotion.discount_type {
        DiscountType::Percentage => {
            let raw =
                Decimal::from(subtotal) * to_decimal(promotion.discount_value) / Decimal::ONE_HUNDRED;
            let rounded = to_minor_units(raw);
            match promotion.max_discount {
                Some(cap) => rounded.min(cap),
                None => rounded,
            }
        }
        DiscountType::Fixed => to_minor_units(to_decimal(promotion.discount_value)),
    };

    amount.clamp(0, subtotal)
}
