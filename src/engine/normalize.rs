//! Spendable-amount normalization.
//!
//! An order may promise more `token_s` than its owner can actually move.
//! Before matching, each order's tentative fill is capped at
//! `min(amount_s, spendable(owner, token_s))`. Balance and allowance lookups
//! are not performed here; they come from a [`SpendableSource`].

use crate::types::{Address, FillResult, Order};

/// Source of spendable balances (balance and allowance already combined).
pub trait SpendableSource {
    /// Amount of `token` that `owner` can currently spend
    fn spendable(&self, owner: &Address, token: &Address) -> u64;
}

/// Treats every order as fully funded.
///
/// Use when the caller has already normalized `amount_s`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl SpendableSource for Unbounded {
    fn spendable(&self, _owner: &Address, _token: &Address) -> u64 {
        u64::MAX
    }
}

impl<F> SpendableSource for F
where
    F: Fn(&Address, &Address) -> u64,
{
    fn spendable(&self, owner: &Address, token: &Address) -> u64 {
        self(owner, token)
    }
}

/// Tentative fills for each order, capped by what its owner can spend.
pub fn tentative_fills<S: SpendableSource + ?Sized>(orders: &[Order], source: &S) -> Vec<FillResult> {
    orders
        .iter()
        .map(|order| {
            let spendable = source.spendable(&order.owner, &order.token_s);
            FillResult::tentative(order.amount_s.min(spendable))
        })
        .collect()
}
