//! Core data types for ring settlement
//!
//! ## Types
//!
//! - [`Order`]: an order taking part in a ring (immutable inputs)
//! - [`FillResult`]: computed fill, split and fee for one order
//! - [`TransferItem`]: one value movement, SSZ-encodable
//!
//! ## Integer Arithmetic
//!
//! All amounts are `u64` token base units. Every division floors.
//! Rates are reported through [`rate`] using `rust_decimal`.

mod order;
mod fill;
mod transfer;
pub mod rate;

pub use order::{Address, Order, OrderHash};
pub use fill::{proportional_fee, FillResult};
pub use transfer::{decode_transfers, encode_transfers, TransferItem, TRANSFER_ITEM_SIZE};
