//! # Ring Settlement
//!
//! Fill, fee and transfer computation for cyclic rings of orders.
//!
//! ## Architecture
//!
//! - **Types**: Order, FillResult, TransferItem, rate reporting
//! - **Ring**: membership, identity hash, validity gating
//! - **Engine**: spendable capping, fill calculation, transfer planning
//! - **Config**: settlement parameters and TOML ring files
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical rings produce identical transfer lists
//! 2. **No Floating Point**: exact big-integer ratios, floor division everywhere
//! 3. **Pure Evaluation**: fills are returned as values, orders are never mutated
//! 4. **Synchronous Execution**: no I/O or async in the settlement path
//!
//! ## Example
//!
//! ```
//! use ring_settlement::{Order, Ring, Unbounded};
//!
//! let orders = vec![
//!     Order::new([1u8; 20], [0xAA; 20], [0xBB; 20], 100, 50, 1),
//!     Order::new([2u8; 20], [0xBB; 20], [0xAA; 20], 50, 100, 1),
//! ];
//! let ring = Ring::new(orders, [9u8; 20], [8u8; 20]).unwrap();
//! let fills = ring.calculate_fill_amount_and_fee(&Unbounded).unwrap();
//! let transfers = ring.transfer_items(&fills, 0).unwrap();
//!
//! assert_eq!(transfers[0].amount, 100);
//! assert_eq!(transfers[2].amount, 50);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, FillResult, TransferItem
pub mod types;

/// Ring membership, identity and validity
pub mod ring;

/// Fill calculation and transfer planning
pub mod engine;

/// Settlement parameters and ring files
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{Address, FillResult, Order, OrderHash, TransferItem};
pub use ring::{Ring, RingHash, TokenRegistry};
pub use engine::{RingFills, SpendableSource, Unbounded};
pub use config::{ConfigError, RingFile, SettlementConfig};
pub use error::{Result, RingError};
