//! Order type for ring settlement.
//!
//! An order offers to sell up to `amount_s` of `token_s` in exchange for at
//! least `amount_b` of `token_b`, paying at most `lrc_fee` in fees. The
//! order itself is immutable during evaluation: computed fills live in
//! [`FillResult`](crate::types::FillResult) records, never on the order.
//!
//! ## Identity
//!
//! Each order carries a 32-byte hash used to derive the ring hash. `Order::new`
//! fills it with a SHA-256 content hash; callers holding an externally computed
//! hash replace it with [`Order::with_hash`].

use sha2::{Digest, Sha256};

use crate::error::{Result, RingError};

/// 20-byte account or token address
pub type Address = [u8; 20];

/// 32-byte order hash
pub type OrderHash = [u8; 32];

/// A single order participating in a ring.
///
/// ## Example
///
/// ```
/// use ring_settlement::types::Order;
///
/// let order = Order::new(
///     [1u8; 20],  // owner
///     [0xAA; 20], // token_s
///     [0xBB; 20], // token_b
///     100,        // amount_s
///     50,         // amount_b
///     1,          // lrc_fee
/// );
/// assert!(order.is_valid());
/// assert_eq!(order.wallet, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Account that sends `token_s` and receives `token_b`
    pub owner: Address,

    /// Token being sold
    pub token_s: Address,

    /// Token being bought
    pub token_b: Address,

    /// Maximum amount of `token_s` to sell
    pub amount_s: u64,

    /// Amount of `token_b` wanted for the full `amount_s`
    pub amount_b: u64,

    /// Maximum fee payable when fully filled
    pub lrc_fee: u64,

    /// Optional referring wallet, entitled to a share of fees
    pub wallet: Option<Address>,

    /// Order hash (content hash unless overridden)
    pub hash: OrderHash,

    /// Result of external validation. One-way: see [`Order::invalidate`].
    valid: bool,
}

impl Order {
    /// Create a new valid order with no wallet.
    pub fn new(
        owner: Address,
        token_s: Address,
        token_b: Address,
        amount_s: u64,
        amount_b: u64,
        lrc_fee: u64,
    ) -> Self {
        let mut order = Self {
            owner,
            token_s,
            token_b,
            amount_s,
            amount_b,
            lrc_fee,
            wallet: None,
            hash: [0u8; 32],
            valid: true,
        };
        order.hash = order.content_hash();
        order
    }

    /// Attach a referring wallet. Recomputes the content hash.
    pub fn with_wallet(mut self, wallet: Address) -> Self {
        self.wallet = Some(wallet);
        self.hash = self.content_hash();
        self
    }

    /// Replace the content hash with an externally computed one
    pub fn with_hash(mut self, hash: OrderHash) -> Self {
        self.hash = hash;
        self
    }

    /// SHA-256 over the order's fields in declaration order.
    ///
    /// Amounts are encoded big-endian; an absent wallet encodes as 20 zero bytes.
    pub fn content_hash(&self) -> OrderHash {
        let mut hasher = Sha256::new();
        hasher.update(self.owner);
        hasher.update(self.token_s);
        hasher.update(self.token_b);
        hasher.update(self.amount_s.to_be_bytes());
        hasher.update(self.amount_b.to_be_bytes());
        hasher.update(self.lrc_fee.to_be_bytes());
        hasher.update(self.wallet.unwrap_or_default());

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hasher.finalize());
        hash
    }

    /// Whether external validation still considers this order settleable
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the order invalid. There is no way back within an evaluation.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Reject orders whose amounts would divide by zero.
    ///
    /// `index` is the order's position in its ring, used for error reporting.
    pub fn check_amounts(&self, index: usize) -> Result<()> {
        if self.amount_s == 0 {
            return Err(RingError::ZeroAmount { index, field: "amount_s" });
        }
        if self.amount_b == 0 {
            return Err(RingError::ZeroAmount { index, field: "amount_b" });
        }
        Ok(())
    }

    /// Order hash as a hex string
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
