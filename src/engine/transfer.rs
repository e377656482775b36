//! Transfer planning: turns settled fills into an ordered list of transfers.
//!
//! ## Ordering
//!
//! Per order, in ring order:
//!
//! 1. primary: `fill_amount_s` of `token_s`, owner -> previous order's owner
//! 2. fee -> fee recipient
//! 3. fee -> wallet
//! 4. split -> fee recipient
//! 5. split -> wallet
//!
//! Zero-amount legs are skipped. Fee and split legs are paid in the order's
//! `token_s` by the order's owner.
//!
//! ## Wallet share
//!
//! With a positive wallet split percentage and a wallet on the order, the
//! split is divided with `floor(split * pct / 100)` to the wallet and the rest
//! to the fee recipient. The fee leg swaps those roles: the fee recipient's
//! share `fee - floor(fee * pct / 100)` is paid to the fee recipient and the
//! same amount again to the wallet. Without wallet participation the whole
//! fee and the whole split go to the fee recipient.

use tracing::{debug, warn};

use crate::engine::RingFills;
use crate::error::{Result, RingError};
use crate::ring::Ring;
use crate::types::rate::{format_rate_opt, ratio};
use crate::types::{Address, FillResult, Order, TransferItem};

/// Upper bound for the wallet split percentage
pub const MAX_WALLET_SPLIT_PERCENTAGE: u8 = 100;

/// Reject wallet split percentages above 100.
pub fn check_wallet_split(wallet_split_percentage: u8) -> Result<()> {
    if wallet_split_percentage > MAX_WALLET_SPLIT_PERCENTAGE {
        return Err(RingError::InvalidWalletSplit(wallet_split_percentage));
    }
    Ok(())
}

/// Split `amount` into `(to_fee_recipient, to_wallet)`.
///
/// The wallet share floors, so any remainder stays with the fee recipient.
pub fn split_with_wallet(amount: u64, wallet_split_percentage: u8) -> Result<(u64, u64)> {
    check_wallet_split(wallet_split_percentage)?;
    // pct <= 100, so the wallet share never exceeds `amount`
    let to_wallet = (amount as u128 * wallet_split_percentage as u128
        / MAX_WALLET_SPLIT_PERCENTAGE as u128) as u64;
    Ok((amount - to_wallet, to_wallet))
}

/// Build the transfer list for a ring.
///
/// # Errors
///
/// * `InvalidWalletSplit` - percentage above 100
/// * `FillCountMismatch` - `fills` does not belong to this ring
/// * `Consistency` - a fill breaks its order's limits; nothing is emitted
///
/// An invalid ring yields `Ok(vec![])`.
pub fn plan_transfers(
    ring: &Ring,
    fills: &RingFills,
    wallet_split_percentage: u8,
) -> Result<Vec<TransferItem>> {
    check_wallet_split(wallet_split_percentage)?;

    if !ring.is_valid() {
        warn!(ring_size = ring.len(), "ring cannot be settled, no transfers emitted");
        return Ok(Vec::new());
    }

    let orders = ring.orders();
    if fills.len() != orders.len() {
        return Err(RingError::FillCountMismatch {
            expected: orders.len(),
            actual: fills.len(),
        });
    }

    // Check everything before emitting anything
    for (index, (order, fill)) in orders.iter().zip(fills.iter()).enumerate() {
        fill.check_against(order, index)?;
    }

    let ring_size = orders.len();
    let mut items = Vec::with_capacity(ring_size * 3);
    for (index, (order, fill)) in orders.iter().zip(fills.iter()).enumerate() {
        let prev = (index + ring_size - 1) % ring_size;
        log_fill(index, order, fill);

        let mut leg = |to: Address, amount: u64| {
            if amount > 0 {
                items.push(TransferItem::new(order.token_s, order.owner, to, amount));
            }
        };

        leg(orders[prev].owner, fill.fill_amount_s);

        match order.wallet {
            Some(wallet) if wallet_split_percentage > 0 => {
                // Fee leg: both transfers carry the recipient's share
                let (fee_to_recipient, _) =
                    split_with_wallet(fill.fill_amount_lrc_fee, wallet_split_percentage)?;
                leg(ring.fee_recipient, fee_to_recipient);
                leg(wallet, fee_to_recipient);

                let (split_to_recipient, split_to_wallet) =
                    split_with_wallet(fill.split_s, wallet_split_percentage)?;
                leg(ring.fee_recipient, split_to_recipient);
                leg(wallet, split_to_wallet);
            }
            _ => {
                leg(ring.fee_recipient, fill.fill_amount_lrc_fee);
                leg(ring.fee_recipient, fill.split_s);
            }
        }
    }

    debug!(ring_size, transfers = items.len(), "planned ring transfers");
    Ok(items)
}

fn log_fill(index: usize, order: &Order, fill: &FillResult) {
    let actual_rate = u64::try_from(fill.consumed_s())
        .ok()
        .and_then(|consumed| ratio(consumed, fill.fill_amount_b));

    debug!(
        index,
        amount_s = order.amount_s,
        amount_b = order.amount_b,
        expected_rate = %format_rate_opt(ratio(order.amount_s, order.amount_b)),
        fill_amount_s = fill.fill_amount_s,
        fill_amount_b = fill.fill_amount_b,
        split_s = fill.split_s,
        actual_rate = %format_rate_opt(actual_rate),
        fill_amount_lrc_fee = fill.fill_amount_lrc_fee,
        "order fill"
    );
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate_fills, CycleRate, Unbounded};

    const RECIPIENT: Address = [8u8; 20];
    const WALLET: Address = [7u8; 20];

    fn ring(orders: Vec<Order>) -> Ring {
        Ring::new(orders, [9u8; 20], RECIPIENT).unwrap()
    }

    fn fills_for(ring: &Ring, fills: Vec<FillResult>) -> RingFills {
        RingFills {
            fills,
            pivot: 0,
            rate: CycleRate::of(ring.orders()),
        }
    }

    #[test]
    fn test_split_with_wallet() {
        assert_eq!(split_with_wallet(10, 0), Ok((10, 0)));
        assert_eq!(split_with_wallet(10, 100), Ok((0, 10)));
        assert_eq!(split_with_wallet(10, 25), Ok((8, 2)));
        assert_eq!(split_with_wallet(3, 50), Ok((2, 1)));
        assert_eq!(split_with_wallet(u64::MAX, 100), Ok((0, u64::MAX)));
    }

    #[test]
    fn test_split_with_wallet_rejects_large_percentage() {
        assert_eq!(split_with_wallet(10, 101), Err(RingError::InvalidWalletSplit(101)));
        assert_eq!(split_with_wallet(u64::MAX, 255), Err(RingError::InvalidWalletSplit(255)));
    }

    #[test]
    fn test_check_wallet_split() {
        assert!(check_wallet_split(0).is_ok());
        assert!(check_wallet_split(100).is_ok());
        assert_eq!(check_wallet_split(101), Err(RingError::InvalidWalletSplit(101)));
    }

    #[test]
    fn test_two_order_ring_without_wallet() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
        ]);
        let fills = calculate_fills(ring.orders(), &Unbounded).unwrap();
        let items = plan_transfers(&ring, &fills, 0).unwrap();

        assert_eq!(
            items,
            vec![
                TransferItem::new([0xAA; 20], [1u8; 20], [2u8; 20], 100),
                TransferItem::new([0xAA; 20], [1u8; 20], RECIPIENT, 1),
                TransferItem::new([0xBB; 20], [2u8; 20], [1u8; 20], 50),
                TransferItem::new([0xBB; 20], [2u8; 20], RECIPIENT, 1),
            ]
        );
    }

    #[test]
    fn test_wallet_share_order_and_amounts() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 10).with_wallet(WALLET),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 100, 100, 10),
        ]);
        let fills = fills_for(
            &ring,
            vec![
                FillResult { fill_amount_s: 80, fill_amount_b: 40, split_s: 20, fill_amount_lrc_fee: 10 },
                FillResult { fill_amount_s: 40, fill_amount_b: 40, split_s: 0, fill_amount_lrc_fee: 4 },
            ],
        );
        let items = plan_transfers(&ring, &fills, 30).unwrap();

        assert_eq!(
            items,
            vec![
                TransferItem::new([0xAA; 20], [1u8; 20], [2u8; 20], 80),
                TransferItem::new([0xAA; 20], [1u8; 20], RECIPIENT, 7),
                TransferItem::new([0xAA; 20], [1u8; 20], WALLET, 7),
                TransferItem::new([0xAA; 20], [1u8; 20], RECIPIENT, 14),
                TransferItem::new([0xAA; 20], [1u8; 20], WALLET, 6),
                TransferItem::new([0xBB; 20], [2u8; 20], [1u8; 20], 40),
                TransferItem::new([0xBB; 20], [2u8; 20], RECIPIENT, 4),
            ]
        );
    }

    #[test]
    fn test_zero_percentage_ignores_wallet() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 10).with_wallet(WALLET),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 100, 100, 10),
        ]);
        let fills = fills_for(
            &ring,
            vec![
                FillResult { fill_amount_s: 80, fill_amount_b: 40, split_s: 20, fill_amount_lrc_fee: 10 },
                FillResult { fill_amount_s: 40, fill_amount_b: 40, split_s: 0, fill_amount_lrc_fee: 4 },
            ],
        );
        let items = plan_transfers(&ring, &fills, 0).unwrap();

        assert!(items.iter().all(|item| item.to != WALLET));
        assert_eq!(items[1], TransferItem::new([0xAA; 20], [1u8; 20], RECIPIENT, 10));
        assert_eq!(items[2], TransferItem::new([0xAA; 20], [1u8; 20], RECIPIENT, 20));
    }

    #[test]
    fn test_zero_legs_skipped() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 0).with_wallet(WALLET),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 0),
        ]);
        let fills = calculate_fills(ring.orders(), &Unbounded).unwrap();
        let items = plan_transfers(&ring, &fills, 50).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_invalid_ring_yields_nothing() {
        let mut ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
        ]);
        let fills = calculate_fills(ring.orders(), &Unbounded).unwrap();
        ring.invalidate();
        assert_eq!(plan_transfers(&ring, &fills, 0).unwrap(), vec![]);
    }

    #[test]
    fn test_invalid_percentage_rejected_before_validity() {
        let mut ring = ring(vec![Order::new([1u8; 20], [0xAA; 20], [0xAA; 20], 1, 1, 0)]);
        let fills = calculate_fills(ring.orders(), &Unbounded).unwrap();
        ring.invalidate();
        assert_eq!(
            plan_transfers(&ring, &fills, 101),
            Err(RingError::InvalidWalletSplit(101))
        );
    }

    #[test]
    fn test_consistency_violation_aborts() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
        ]);
        let fills = fills_for(
            &ring,
            vec![
                FillResult { fill_amount_s: 100, fill_amount_b: 50, split_s: 0, fill_amount_lrc_fee: 1 },
                FillResult { fill_amount_s: 50, fill_amount_b: 100, split_s: 1, fill_amount_lrc_fee: 1 },
            ],
        );
        assert!(matches!(
            plan_transfers(&ring, &fills, 0),
            Err(RingError::Consistency { index: 1, .. })
        ));
    }

    #[test]
    fn test_fill_count_mismatch() {
        let ring = ring(vec![
            Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
            Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
        ]);
        let fills = fills_for(&ring, vec![FillResult::tentative(1)]);
        assert_eq!(
            plan_transfers(&ring, &fills, 0),
            Err(RingError::FillCountMismatch { expected: 2, actual: 1 })
        );
    }
}
