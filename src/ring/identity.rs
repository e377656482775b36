//! Ring identity hash.
//!
//! The ring hash commits to the ordered sequence of member order hashes:
//! SHA-256 over their concatenation. Rotating or reordering the ring yields a
//! different hash.

use sha2::{Digest, Sha256};

use crate::types::OrderHash;

/// 32-byte ring hash
pub type RingHash = [u8; 32];

/// SHA-256 over the concatenation of `order_hashes`, in order.
///
/// # Example
///
/// ```
/// use ring_settlement::ring::compute_hash;
///
/// let a = compute_hash(&[[1u8; 32], [2u8; 32]]);
/// let b = compute_hash(&[[2u8; 32], [1u8; 32]]);
/// assert_ne!(a, b);
/// ```
pub fn compute_hash(order_hashes: &[OrderHash]) -> RingHash {
    let mut hasher = Sha256::new();
    for hash in order_hashes {
        hasher.update(hash);
    }

    let mut ring_hash = [0u8; 32];
    ring_hash.copy_from_slice(&hasher.finalize());
    ring_hash
}
