//! Fill calculation for a ring of orders.
//!
//! ## Algorithm
//!
//! 1. **Cycle rate**: `Π amount_s / Π amount_b` over the whole ring, kept as an
//!    exact big-integer ratio. A rate >= 1 means the loop can be closed
//!    without loss to anyone.
//! 2. **Pivot scan**: for each pair `(i, i+1 mod N)` order `i` asks its
//!    successor for at most `max(natural, scaled)` where
//!    `natural = floor(fill_s * amount_b / amount_s)` and `scaled` is the same
//!    requirement multiplied by the cycle rate. A successor offering more is
//!    clamped to `natural`, and `scaled - natural` becomes its split. The last
//!    successor that was NOT clamped is the pivot (bottleneck).
//! 3. **Propagation**: the pairs `0..pivot` are matched again so that values
//!    upstream of the pivot are derived from the clamped wrap-around.
//! 4. **Fees**: each step refreshes the source order's fee, and a final pass
//!    recomputes every fee from the settled `fill_amount_s + split_s`.
//!
//! All divisions floor. Work is O(N) with two passes over the ring.

use std::cmp::max;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use rust_decimal::Decimal;
use tracing::debug;

use crate::engine::normalize::{tentative_fills, SpendableSource};
use crate::error::{Result, RingError};
use crate::types::rate::{big_ratio, format_rate_opt};
use crate::types::{proportional_fee, FillResult, Order};

// ============================================================================
// Cycle rate
// ============================================================================

/// Exact product of every order's `amount_s / amount_b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRate {
    numerator: BigUint,
    denominator: BigUint,
}

impl CycleRate {
    /// Multiply out the rate of every order in the ring
    pub fn of(orders: &[Order]) -> Self {
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for order in orders {
            numerator *= order.amount_s;
            denominator *= order.amount_b;
        }
        Self { numerator, denominator }
    }

    /// Product of all `amount_s`
    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    /// Product of all `amount_b`
    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    /// Whether the ring can close without net loss (rate >= 1)
    pub fn is_at_least_one(&self) -> bool {
        self.numerator >= self.denominator
    }

    /// Rate as a Decimal, when both products fit in a u64
    pub fn as_decimal(&self) -> Option<Decimal> {
        big_ratio(&self.numerator, &self.denominator)
    }

    /// `floor(fill_s * amount_b * rate / amount_s)`
    fn scale(&self, fill_s: u64, amount_b: u64, amount_s: u64) -> BigUint {
        let top = BigUint::from(fill_s) * amount_b * &self.numerator;
        let bottom = BigUint::from(amount_s) * &self.denominator;
        top / bottom
    }
}

// ============================================================================
// Ring fills
// ============================================================================

/// Fill results for a whole ring, indexed like the ring's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingFills {
    /// One fill per order, in ring order
    pub fills: Vec<FillResult>,

    /// Index of the bottleneck order
    pub pivot: usize,

    /// Cycle rate the fills were derived with
    pub rate: CycleRate,
}

impl RingFills {
    /// Number of fill results
    #[inline]
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    /// Whether there are no fill results
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Fill for the order at `index`
    pub fn get(&self, index: usize) -> Option<&FillResult> {
        self.fills.get(index)
    }

    /// Iterate fills in ring order
    pub fn iter(&self) -> impl Iterator<Item = &FillResult> {
        self.fills.iter()
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute fills for `orders`, capping each order by what `source` says its
/// owner can spend.
///
/// # Errors
///
/// * `EmptyRing` - no orders
/// * `ZeroAmount` - an order with `amount_s == 0` or `amount_b == 0`
pub fn calculate_fills<S>(orders: &[Order], source: &S) -> Result<RingFills>
where
    S: SpendableSource + ?Sized,
{
    check_orders(orders)?;
    let tentative = tentative_fills(orders, source);
    calculate_from_tentative(orders, tentative)
}

/// Compute fills starting from caller-provided tentative sell amounts.
///
/// `tentative[i].fill_amount_s` must not exceed `orders[i].amount_s`; any
/// split or fee already present is discarded.
pub fn calculate_from_tentative(orders: &[Order], tentative: Vec<FillResult>) -> Result<RingFills> {
    check_orders(orders)?;
    if tentative.len() != orders.len() {
        return Err(RingError::FillCountMismatch {
            expected: orders.len(),
            actual: tentative.len(),
        });
    }

    let mut fills = Vec::with_capacity(tentative.len());
    for (index, (order, fill)) in orders.iter().zip(tentative).enumerate() {
        if fill.fill_amount_s > order.amount_s {
            return Err(RingError::Consistency {
                index,
                reason: format!(
                    "tentative fill {} exceeds amount_s {}",
                    fill.fill_amount_s, order.amount_s
                ),
            });
        }
        fills.push(FillResult::tentative(fill.fill_amount_s));
    }

    let rate = CycleRate::of(orders);
    let mut pass = MatchPass { orders, rate: &rate, fills };
    let ring_size = orders.len();

    let mut pivot = 0;
    for i in 0..ring_size {
        let next = (i + 1) % ring_size;
        if !pass.match_pair(i, next)? {
            pivot = next;
        }
    }

    for i in 0..pivot {
        pass.match_pair(i, i + 1)?;
    }

    pass.refresh_derived()?;

    debug!(
        ring_size,
        pivot,
        rate = %format_rate_opt(rate.as_decimal()),
        "calculated ring fills"
    );

    let fills = pass.fills;
    Ok(RingFills { fills, pivot, rate })
}

fn check_orders(orders: &[Order]) -> Result<()> {
    if orders.is_empty() {
        return Err(RingError::EmptyRing);
    }
    for (index, order) in orders.iter().enumerate() {
        order.check_amounts(index)?;
    }
    Ok(())
}

/// Working state for one evaluation. Owns its fills; orders are read-only.
struct MatchPass<'a> {
    orders: &'a [Order],
    rate: &'a CycleRate,
    fills: Vec<FillResult>,
}

impl MatchPass<'_> {
    /// Match order `current` against its successor `next`.
    ///
    /// Returns `true` when the successor's fill had to be reduced.
    fn match_pair(&mut self, current: usize, next: usize) -> Result<bool> {
        let orders = self.orders;
        let order = &orders[current];
        let fill_s = self.fills[current].fill_amount_s;

        let natural = natural_fill_b(fill_s, order)?;
        let scaled = self.rate.scale(fill_s, order.amount_b, order.amount_s);
        self.fills[current].fill_amount_b = natural;

        let natural_big = BigUint::from(natural);
        let requirement = max(&natural_big, &scaled);

        let clamped = BigUint::from(self.fills[next].fill_amount_s) > *requirement;
        if clamped {
            // scaled <= requirement < next fill, so the split fits in a u64
            let split = if scaled > natural_big {
                (&scaled - &natural_big)
                    .to_u64()
                    .ok_or(RingError::ArithmeticOverflow("split_s"))?
            } else {
                0
            };
            self.fills[next].fill_amount_s = natural;
            self.fills[next].split_s = split;
        }

        let consumed = self.fills[current].consumed_s();
        self.fills[current].fill_amount_lrc_fee = proportional_fee(order, consumed)?;

        Ok(clamped)
    }

    /// Recompute every buy amount and fee from the final fills.
    ///
    /// Orders clamped after their own step still carry values computed from
    /// the larger fill.
    fn refresh_derived(&mut self) -> Result<()> {
        for (order, fill) in self.orders.iter().zip(self.fills.iter_mut()) {
            fill.fill_amount_b = natural_fill_b(fill.fill_amount_s, order)?;
            fill.fill_amount_lrc_fee = proportional_fee(order, fill.consumed_s())?;
        }
        Ok(())
    }
}

/// `floor(fill_s * amount_b / amount_s)`
fn natural_fill_b(fill_s: u64, order: &Order) -> Result<u64> {
    let value = fill_s as u128 * order.amount_b as u128 / order.amount_s as u128;
    u64::try_from(value).map_err(|_| RingError::ArithmeticOverflow("fill_amount_b"))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::Unbounded;
    use crate::types::Address;

    const A: Address = [0xAA; 20];
    const B: Address = [0xBB; 20];
    const C: Address = [0xCC; 20];

    fn order(owner: u8, token_s: Address, token_b: Address, s: u64, b: u64, fee: u64) -> Order {
        Order::new([owner; 20], token_s, token_b, s, b, fee)
    }

    #[test]
    fn test_cycle_rate() {
        let orders = vec![order(1, A, B, 100, 50, 1), order(2, B, A, 50, 100, 1)];
        let rate = CycleRate::of(&orders);
        assert_eq!(rate.numerator(), &BigUint::from(5_000u64));
        assert_eq!(rate.denominator(), &BigUint::from(5_000u64));
        assert!(rate.is_at_least_one());
        assert_eq!(rate.as_decimal(), Some(Decimal::ONE));
    }

    #[test]
    fn test_cycle_rate_below_one() {
        let orders = vec![order(1, A, B, 100, 60, 1), order(2, B, A, 50, 100, 1)];
        assert!(!CycleRate::of(&orders).is_at_least_one());
    }

    #[test]
    fn test_exact_two_order_ring() {
        let orders = vec![order(1, A, B, 100, 50, 1), order(2, B, A, 50, 100, 1)];
        let result = calculate_fills(&orders, &Unbounded).unwrap();

        assert_eq!(result.fills[0].fill_amount_s, 100);
        assert_eq!(result.fills[0].fill_amount_b, 50);
        assert_eq!(result.fills[1].fill_amount_s, 50);
        assert_eq!(result.fills[1].fill_amount_b, 100);
        assert!(result.iter().all(|f| f.split_s == 0));
        assert!(result.iter().all(|f| f.fill_amount_lrc_fee == 1));
        assert_eq!(result.pivot, 0);
    }

    #[test]
    fn test_surplus_becomes_split() {
        // Order 1 would sell 300 B for 200 A; order 0 only brings 100 A.
        let orders = vec![order(1, A, B, 100, 50, 10), order(2, B, A, 300, 200, 10)];
        let result = calculate_fills(&orders, &Unbounded).unwrap();

        assert_eq!(result.fills[0].fill_amount_s, 100);
        assert_eq!(result.fills[0].split_s, 0);
        assert_eq!(result.fills[1].fill_amount_s, 50);
        assert_eq!(result.fills[1].split_s, 100);
        assert_eq!(result.fills[1].fill_amount_b, 33);
        assert_eq!(result.fills[0].fill_amount_lrc_fee, 10);
        assert_eq!(result.fills[1].fill_amount_lrc_fee, 5);
    }

    #[test]
    fn test_smaller_successor_is_pivot() {
        // Order 1 can only cover half of what order 0 offers.
        let orders = vec![order(1, A, B, 100, 100, 10), order(2, B, A, 50, 50, 10)];
        let result = calculate_fills(&orders, &Unbounded).unwrap();

        assert_eq!(result.pivot, 1);
        assert_eq!(result.fills[0].fill_amount_s, 50);
        assert_eq!(result.fills[1].fill_amount_s, 50);
        assert_eq!(result.fills[0].fill_amount_lrc_fee, 5);
        assert_eq!(result.fills[1].fill_amount_lrc_fee, 10);
    }

    #[test]
    fn test_three_order_ring_propagates_from_pivot() {
        // 0: sells 100 A for 100 B, 1: sells 30 B for 30 C, 2: sells 100 C for 100 A
        let orders = vec![
            order(1, A, B, 100, 100, 9),
            order(2, B, C, 30, 30, 9),
            order(3, C, A, 100, 100, 9),
        ];
        let result = calculate_fills(&orders, &Unbounded).unwrap();

        assert_eq!(result.pivot, 1);
        for fill in result.iter() {
            assert_eq!(fill.fill_amount_s, 30);
            assert_eq!(fill.fill_amount_b, 30);
            assert_eq!(fill.split_s, 0);
        }
        assert_eq!(result.fills[0].fill_amount_lrc_fee, 2);
        assert_eq!(result.fills[1].fill_amount_lrc_fee, 9);
        assert_eq!(result.fills[2].fill_amount_lrc_fee, 2);
    }

    #[test]
    fn test_pivot_clamped_after_own_step_gets_fresh_fill_b() {
        const D: Address = [0xDD; 20];
        let orders = vec![
            order(1, A, B, 616, 369, 5),
            order(2, B, C, 638, 667, 5),
            order(3, C, D, 306, 353, 5),
            order(4, D, A, 101, 71, 5),
        ];
        let result = calculate_fills(&orders, &Unbounded).unwrap();

        assert_eq!(result.pivot, 3);
        let fill_s: Vec<u64> = result.iter().map(|f| f.fill_amount_s).collect();
        let fill_b: Vec<u64> = result.iter().map(|f| f.fill_amount_b).collect();
        assert_eq!(fill_s, vec![71, 42, 43, 49]);
        assert_eq!(fill_b, vec![42, 43, 49, 34]);
    }

    #[test]
    fn test_spendable_cap_limits_ring() {
        let orders = vec![order(1, A, B, 100, 50, 1), order(2, B, A, 50, 100, 1)];
        let source = |owner: &Address, _token: &Address| -> u64 {
            if owner == &[2u8; 20] { 25 } else { u64::MAX }
        };
        let result = calculate_fills(&orders, &source).unwrap();

        assert_eq!(result.fills[1].fill_amount_s, 25);
        assert_eq!(result.fills[0].fill_amount_s, 50);
        assert_eq!(result.fills[0].fill_amount_lrc_fee, 0);
        assert_eq!(result.fills[1].fill_amount_lrc_fee, 0);
    }

    #[test]
    fn test_single_order_ring() {
        let orders = vec![order(1, A, A, 10, 10, 1)];
        let result = calculate_fills(&orders, &Unbounded).unwrap();
        assert_eq!(result.fills[0].fill_amount_s, 10);
        assert_eq!(result.pivot, 0);
    }

    #[test]
    fn test_empty_ring_rejected() {
        assert_eq!(calculate_fills(&[], &Unbounded), Err(RingError::EmptyRing));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let orders = vec![order(1, A, B, 100, 0, 1), order(2, B, A, 50, 100, 1)];
        assert_eq!(
            calculate_fills(&orders, &Unbounded),
            Err(RingError::ZeroAmount { index: 0, field: "amount_b" })
        );
    }

    #[test]
    fn test_tentative_above_amount_rejected() {
        let orders = vec![order(1, A, B, 100, 50, 1), order(2, B, A, 50, 100, 1)];
        let tentative = vec![FillResult::tentative(101), FillResult::tentative(50)];
        assert!(matches!(
            calculate_from_tentative(&orders, tentative),
            Err(RingError::Consistency { index: 0, .. })
        ));
    }

    #[test]
    fn test_tentative_count_mismatch() {
        let orders = vec![order(1, A, B, 100, 50, 1), order(2, B, A, 50, 100, 1)];
        assert_eq!(
            calculate_from_tentative(&orders, vec![FillResult::tentative(1)]),
            Err(RingError::FillCountMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        let orders = vec![
            order(1, A, B, u64::MAX, u64::MAX - 1, u64::MAX),
            order(2, B, C, u64::MAX - 1, u64::MAX - 2, u64::MAX),
            order(3, C, A, u64::MAX - 2, u64::MAX, u64::MAX),
        ];
        let result = calculate_fills(&orders, &Unbounded).unwrap();
        for (order, fill) in orders.iter().zip(result.iter()) {
            assert!(fill.check_against(order, 0).is_ok());
        }
        assert_eq!(result.rate.as_decimal(), None);
    }
}
