//! Transfer item: one unit of value movement produced by settlement.
//!
//! ## SSZ Serialization
//!
//! Transfer items are fixed-size SSZ containers so a transfer list can be
//! handed to an external settlement executor as a flat byte string:
//! - `token`, `from`, `to`: 20 bytes each
//! - `amount`: u64 little-endian
//!
//! Total: 68 bytes per item.

use ssz_rs::prelude::*;

use crate::error::RingError;
use crate::types::Address;

/// Encoded size of a single transfer item in bytes
pub const TRANSFER_ITEM_SIZE: usize = 20 + 20 + 20 + 8;

/// Move `amount` of `token` from `from` to `to`.
///
/// ## Example
///
/// ```
/// use ring_settlement::types::TransferItem;
///
/// let item = TransferItem::new([0xAA; 20], [1u8; 20], [2u8; 20], 100);
/// assert_eq!(item.amount, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct TransferItem {
    /// Token being moved
    pub token: Address,

    /// Sending account
    pub from: Address,

    /// Receiving account
    pub to: Address,

    /// Amount in the token's base units
    pub amount: u64,
}

impl TransferItem {
    /// Create a new transfer item
    pub fn new(token: Address, from: Address, to: Address, amount: u64) -> Self {
        Self { token, from, to, amount }
    }

    /// SSZ-encode this item
    pub fn encode(&self) -> crate::error::Result<Vec<u8>> {
        ssz_rs::serialize(self).map_err(|e| RingError::Encoding(format!("{:?}", e)))
    }

    /// Decode an item produced by [`TransferItem::encode`]
    pub fn decode(bytes: &[u8]) -> crate::error::Result<Self> {
        ssz_rs::deserialize(bytes).map_err(|e| RingError::Encoding(format!("{:?}", e)))
    }
}

/// Encode a transfer list as the concatenation of its fixed-size items.
pub fn encode_transfers(items: &[TransferItem]) -> crate::error::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(items.len() * TRANSFER_ITEM_SIZE);
    for item in items {
        out.extend_from_slice(&item.encode()?);
    }
    Ok(out)
}

/// Decode a byte string produced by [`encode_transfers`].
pub fn decode_transfers(bytes: &[u8]) -> crate::error::Result<Vec<TransferItem>> {
    if bytes.len() % TRANSFER_ITEM_SIZE != 0 {
        return Err(RingError::Encoding(format!(
            "length {} is not a multiple of {}",
            bytes.len(),
            TRANSFER_ITEM_SIZE
        )));
    }
    bytes
        .chunks(TRANSFER_ITEM_SIZE)
        .map(TransferItem::decode)
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
