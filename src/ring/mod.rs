//! Ring: a cyclic sequence of orders settled together.
//!
//! ## Topology
//!
//! Order `i` sells its `token_s` to order `i - 1` and buys its `token_b` from
//! order `i + 1` (indices mod N). So `orders[i].token_b` is normally
//! `orders[i + 1].token_s`.
//!
//! ## Lifecycle
//!
//! A ring is built once per matching attempt, validated, evaluated into
//! [`RingFills`], converted into transfers, then dropped. Evaluation never
//! mutates the orders, so one order can sit in several candidate rings that
//! are evaluated concurrently.
//!
//! ## Example
//!
//! ```
//! use ring_settlement::ring::Ring;
//! use ring_settlement::engine::Unbounded;
//! use ring_settlement::types::Order;
//!
//! let orders = vec![
//!     Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
//!     Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
//! ];
//! let mut ring = Ring::new(orders, [9u8; 20], [8u8; 20]).unwrap();
//! ring.check_orders_valid();
//! ring.update_hash();
//!
//! let fills = ring.calculate_fill_amount_and_fee(&Unbounded).unwrap();
//! let transfers = ring.transfer_items(&fills, 0).unwrap();
//!
//! // Two primary transfers, two fee transfers
//! assert_eq!(transfers.len(), 4);
//! ```

mod identity;
mod validation;

pub use identity::{compute_hash, RingHash};
pub use validation::TokenRegistry;

use crate::engine::{calculate_fills, plan_transfers, RingFills, SpendableSource};
use crate::error::{Result, RingError};
use crate::types::{Address, Order, OrderHash, TransferItem};

/// An ordered, cyclic set of orders plus the parties settling it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Member orders in ring order
    orders: Vec<Order>,

    /// Account submitting the ring
    pub owner: Address,

    /// Account receiving matching fees
    pub fee_recipient: Address,

    /// Cached ring hash; `None` until computed, cleared on membership change
    hash: Option<RingHash>,

    /// AND of member validity and token registration
    valid: bool,
}

impl Ring {
    /// Create a ring from its orders.
    ///
    /// # Errors
    ///
    /// * `EmptyRing` - `orders` is empty
    /// * `ZeroAmount` - an order has `amount_s == 0` or `amount_b == 0`
    pub fn new(orders: Vec<Order>, owner: Address, fee_recipient: Address) -> Result<Self> {
        if orders.is_empty() {
            return Err(RingError::EmptyRing);
        }
        for (index, order) in orders.iter().enumerate() {
            order.check_amounts(index)?;
        }

        Ok(Self {
            orders,
            owner,
            fee_recipient,
            hash: None,
            valid: true,
        })
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Member orders in ring order
    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of orders in the ring
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Always `false` for a constructed ring
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Append an order at the end of the cycle. Clears the cached hash.
    pub fn push_order(&mut self, order: Order) -> Result<()> {
        order.check_amounts(self.orders.len())?;
        self.orders.push(order);
        self.hash = None;
        Ok(())
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Cached ring hash, if computed since the last membership change
    pub fn hash(&self) -> Option<&RingHash> {
        self.hash.as_ref()
    }

    /// Cached ring hash as hex
    pub fn hash_hex(&self) -> Option<String> {
        self.hash.map(hex::encode)
    }

    /// Compute and cache the ring hash from the member order hashes.
    pub fn update_hash(&mut self) -> RingHash {
        let order_hashes: Vec<OrderHash> = self.orders.iter().map(|o| o.hash).collect();
        let hash = compute_hash(&order_hashes);
        self.hash = Some(hash);
        hash
    }

    // ========================================================================
    // Validity
    // ========================================================================

    /// Whether the ring may be settled
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the ring as not settleable
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Fold member order validity into the ring flag.
    pub fn check_orders_valid(&mut self) {
        self.valid = self.valid && self.orders.iter().all(Order::is_valid);
    }

    /// Fold token registration of every sold token into the ring flag.
    pub fn check_tokens_registered<R>(&mut self, registry: &R)
    where
        R: TokenRegistry + ?Sized,
    {
        let tokens: Vec<Address> = self.orders.iter().map(|o| o.token_s).collect();
        self.valid = self.valid && registry.are_all_tokens_registered(&tokens);
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Compute fills and fees, capping orders by `source`.
    pub fn calculate_fill_amount_and_fee<S>(&self, source: &S) -> Result<RingFills>
    where
        S: SpendableSource + ?Sized,
    {
        calculate_fills(&self.orders, source)
    }

    /// Build the transfer list for `fills`. Empty if the ring is invalid.
    pub fn transfer_items(
        &self,
        fills: &RingFills,
        wallet_split_percentage: u8,
    ) -> Result<Vec<TransferItem>> {
        plan_transfers(self, fills, wallet_split_percentage)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
