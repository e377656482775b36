//! Settlement engine for rings of orders.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same ring, same fills, same transfers
//! 2. **Integer Math**: exact ratios, every division floors
//! 3. **No Shared State**: fills are returned, never written onto orders
//! 4. **Synchronous Execution**: no I/O, O(N) per ring
//!
//! ## Pipeline
//!
//! - [`tentative_fills`]: cap each order by its owner's spendable balance
//! - [`calculate_fills`]: cycle rate, pivot scan, split and fee computation
//! - [`plan_transfers`]: primary, fee and split transfers in ring order
//!
//! ## Example
//!
//! ```
//! use ring_settlement::engine::{calculate_fills, Unbounded};
//! use ring_settlement::types::Order;
//!
//! let orders = vec![
//!     Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
//!     Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
//! ];
//! let fills = calculate_fills(&orders, &Unbounded).unwrap();
//!
//! assert_eq!(fills.fills[0].fill_amount_s, 100);
//! assert_eq!(fills.fills[1].fill_amount_s, 50);
//! ```

pub mod fill;
pub mod normalize;
pub mod transfer;

pub use fill::{calculate_fills, calculate_from_tentative, CycleRate, RingFills};
pub use normalize::{tentative_fills, SpendableSource, Unbounded};
pub use transfer::{check_wallet_split, plan_transfers, split_with_wallet, MAX_WALLET_SPLIT_PERCENTAGE};
