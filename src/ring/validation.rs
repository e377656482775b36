//! Token registration lookups used to gate settlement.

use std::collections::{BTreeSet, HashSet};

use crate::types::Address;

/// Answers whether tokens are registered for trading.
pub trait TokenRegistry {
    /// `true` only if every token in `tokens` is registered
    fn are_all_tokens_registered(&self, tokens: &[Address]) -> bool;
}

impl TokenRegistry for HashSet<Address> {
    fn are_all_tokens_registered(&self, tokens: &[Address]) -> bool {
        tokens.iter().all(|token| self.contains(token))
    }
}

impl TokenRegistry for BTreeSet<Address> {
    fn are_all_tokens_registered(&self, tokens: &[Address]) -> bool {
        tokens.iter().all(|token| self.contains(token))
    }
}
