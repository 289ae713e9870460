//! Transaction lifetime anchor
//!
//! A transaction is only eligible for inclusion while its recent blockhash
//! is still within the cluster's validity window. The anchor pairs the
//! blockhash with the last block height at which it remains valid, so the
//! confirm loop can distinguish "not yet confirmed" from "expired".

use solana_sdk::hash::Hash;

/// A recent blockhash plus the last block height at which it is valid.
///
/// Fetched fresh from the cluster for every transaction attempt. An anchor
/// must never be reused across unrelated transactions: once it expires, every
/// signature computed over a message carrying it is useless and the message
/// has to be rebuilt and re-signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeAnchor {
    /// The recent blockhash embedded in the message
    pub blockhash: Hash,

    /// Last block height at which this blockhash is accepted
    pub last_valid_block_height: u64,
}

impl LifetimeAnchor {
    pub fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }

    /// Whether the anchor has expired at the given cluster block height.
    ///
    /// The anchor is still valid AT `last_valid_block_height` itself;
    /// expiry is strictly greater.
    pub fn is_expired(&self, current_block_height: u64) -> bool {
        current_block_height > self.last_valid_block_height
    }
}
