//! Conversion between decimal currency amounts and integer cents.
//!
//! Balances are stored as `i64` cents to avoid floating-point precision
//! issues. The HTTP and CSV boundaries speak in decimal amounts
//! (`rust_decimal::Decimal`), so conversion must be exact in both directions:
//! an amount with more than two decimal places is rejected rather than
//! rounded.

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Convert a decimal currency amount into cents.
///
/// Returns `None` if the amount has more than two decimal places or does not
/// fit in an `i64`.
///
/// For example:
/// - 10.50 becomes 1050 cents
/// - 100 becomes 10000 cents
/// - 0.005 is rejected
pub fn to_cents(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::from(100))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_i64()
}

/// Convert integer cents back into a decimal amount with two decimal places.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
