//! Per-order fill results.
//!
//! Fill state is kept apart from [`Order`] so that the same order can take
//! part in several candidate rings evaluated at once. One `FillResult` per
//! ring position, in ring order.

use crate::error::{Result, RingError};
use crate::types::Order;

/// Computed fill for one order of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillResult {
    /// Amount of `token_s` the order sells to its predecessor
    pub fill_amount_s: u64,

    /// Amount of `token_b` the order requires at its own rate
    pub fill_amount_b: u64,

    /// Excess `token_s` peeled off as fee instead of reaching the counterparty
    pub split_s: u64,

    /// Fee charged, proportional to `fill_amount_s + split_s`
    pub fill_amount_lrc_fee: u64,
}

impl FillResult {
    /// Tentative fill before matching: sell up to `fill_amount_s`, no split.
    pub fn tentative(fill_amount_s: u64) -> Self {
        Self {
            fill_amount_s,
            ..Self::default()
        }
    }

    /// Total `token_s` consumed: fill plus split.
    #[inline]
    pub fn consumed_s(&self) -> u128 {
        self.fill_amount_s as u128 + self.split_s as u128
    }

    /// Check the limits a settled fill must respect.
    ///
    /// - `fill_amount_s + split_s <= amount_s`
    /// - `fill_amount_s <= amount_s`
    /// - `fill_amount_lrc_fee <= lrc_fee`
    ///
    /// Non-negativity is carried by the unsigned types.
    pub fn check_against(&self, order: &Order, index: usize) -> Result<()> {
        if self.fill_amount_s > order.amount_s {
            return Err(RingError::Consistency {
                index,
                reason: format!(
                    "fill_amount_s {} exceeds amount_s {}",
                    self.fill_amount_s, order.amount_s
                ),
            });
        }
        if self.consumed_s() > order.amount_s as u128 {
            return Err(RingError::Consistency {
                index,
                reason: format!(
                    "fill_amount_s {} + split_s {} exceeds amount_s {}",
                    self.fill_amount_s, self.split_s, order.amount_s
                ),
            });
        }
        if self.fill_amount_lrc_fee > order.lrc_fee {
            return Err(RingError::Consistency {
                index,
                reason: format!(
                    "fill_amount_lrc_fee {} exceeds lrc_fee {}",
                    self.fill_amount_lrc_fee, order.lrc_fee
                ),
            });
        }
        Ok(())
    }
}

/// Compute an order's fee for the given consumption.
///
/// `floor(lrc_fee * consumed / amount_s)`. Never rounds up, so it never
/// exceeds `lrc_fee` while `consumed <= amount_s`.
pub fn proportional_fee(order: &Order, consumed_s: u128) -> Result<u64> {
    if order.amount_s == 0 {
        return Err(RingError::ZeroAmount { index: 0, field: "amount_s" });
    }
    let fee = (order.lrc_fee as u128)
        .checked_mul(consumed_s)
        .ok_or(RingError::ArithmeticOverflow("fill_amount_lrc_fee"))?
        / order.amount_s as u128;
    u64::try_from(fee).map_err(|_| RingError::ArithmeticOverflow("fill_amount_lrc_fee"))
}

// ============================================================================
// Unit Tests
// ============================================================================
