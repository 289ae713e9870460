//! Pipeline output
//!
//! A receipt is the terminal value of one submission cycle: the
//! transaction signature plus the commitment level the cluster actually
//! reported. Nothing mutates it afterwards.

use std::fmt;

use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::signature::Signature;

/// Proof that a submitted transaction reached a commitment level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationReceipt {
    /// Signature identifying the transaction on-chain
    pub signature: Signature,

    /// Commitment level the cluster reported when the wait ended
    pub commitment: CommitmentLevel,

    /// Slot the transaction was processed in
    pub slot: u64,
}

impl ConfirmationReceipt {
    pub fn new(signature: Signature, commitment: CommitmentLevel, slot: u64) -> Self {
        Self {
            signature,
            commitment,
            slot,
        }
    }
}

impl fmt::Display for ConfirmationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?} at slot {})",
            self.signature, self.commitment, self.slot
        )
    }
}
