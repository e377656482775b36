//! Error types for ring evaluation and transfer planning.
//!
//! ## Categories
//!
//! - **Caller errors**: the ring or its parameters were malformed on entry
//!   (`EmptyRing`, `InvalidWalletSplit`, `ZeroAmount`).
//! - **Consistency violations**: a computed fill breaks an order's limits.
//!   This is an upstream bug; no transfer list is produced.
//! - **Arithmetic / encoding**: values that do not fit the wire types.
//!
//! An invalid ring is NOT an error. Transfer planning returns an empty list.

use thiserror::Error;

/// Errors produced while evaluating a ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// A ring must contain at least one order
    #[error("ring contains no orders")]
    EmptyRing,

    /// Wallet split percentage must lie in [0, 100]
    #[error("invalid wallet split percentage: {0}")]
    InvalidWalletSplit(u8),

    /// Order amount that must be positive was zero
    #[error("order {index}: {field} must be greater than zero")]
    ZeroAmount { index: usize, field: &'static str },

    /// Fill results do not line up with the ring's orders
    #[error("expected {expected} fill results, got {actual}")]
    FillCountMismatch { expected: usize, actual: usize },

    /// A computed fill breaks one of the order's limits
    #[error("order {index}: consistency violation: {reason}")]
    Consistency { index: usize, reason: String },

    /// An intermediate value did not fit its target type
    #[error("arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    /// SSZ encoding failed
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RingError>;
