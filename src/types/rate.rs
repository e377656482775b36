//! Exchange rate reporting.
//!
//! ## Overview
//!
//! Settlement itself runs on integers with explicit floor division. Rates are
//! only needed for humans (logs, CLI output) and are reported as
//! `rust_decimal::Decimal` so the figures are identical on every platform.
//!
//! An order's rate is `amount_s / amount_b`: how much it sells per unit bought.
//!
//! ## Examples
//!
//! ```
//! use ring_settlement::types::rate::{ratio, format_rate};
//!
//! let rate = ratio(100, 50).unwrap();
//! assert_eq!(format_rate(rate), "2");
//! ```

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Decimal places kept when reporting a rate
pub const RATE_DP: u32 = 8;

/// `numerator / denominator` as a Decimal.
///
/// # Returns
///
/// * `Some(Decimal)` - the ratio, rounded to [`RATE_DP`] places
/// * `None` - if the denominator is zero
///
/// # Example
///
/// ```
/// use ring_settlement::types::rate::ratio;
/// use rust_decimal::Decimal;
///
/// assert_eq!(ratio(1, 4), Some(Decimal::new(25, 2)));
/// assert_eq!(ratio(1, 0), None);
/// ```
pub fn ratio(numerator: u64, denominator: u64) -> Option<Decimal> {
    if denominator == 0 {
        return None;
    }
    let result = Decimal::from(numerator).checked_div(Decimal::from(denominator))?;
    Some(result.round_dp(RATE_DP))
}

/// Like [`ratio`], for operands wider than u64.
///
/// Returns `None` when either side does not fit in a u64; big cycle
/// products are then simply not reported.
pub fn big_ratio(numerator: &BigUint, denominator: &BigUint) -> Option<Decimal> {
    ratio(numerator.to_u64()?, denominator.to_u64()?)
}

/// Rate as a string with trailing zeros trimmed
///
/// # Example
///
/// ```
/// use ring_settlement::types::rate::{ratio, format_rate};
///
/// assert_eq!(format_rate(ratio(3, 2).unwrap()), "1.5");
/// assert_eq!(format_rate(ratio(1, 3).unwrap()), "0.33333333");
/// ```
pub fn format_rate(rate: Decimal) -> String {
    format!("{}", rate.normalize())
}

/// Format an optional rate, using "-" when absent
pub fn format_rate_opt(rate: Option<Decimal>) -> String {
    rate.map(format_rate).unwrap_or_else(|| "-".to_string())
}

// ============================================================================
// Unit Tests
// ============================================================================
