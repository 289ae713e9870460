//! Pre-submission size validation
//!
//! The cluster drops any transaction whose full encoding (message plus all
//! signatures) exceeds one packet. Checking locally turns a wasted network
//! round trip into an immediate error.

use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::transaction::VersionedTransaction;

use crate::tx_builder::errors::ProvisionError;

/// Maximum total encoded transaction size accepted by the protocol.
pub const MAX_TRANSACTION_SIZE: usize = PACKET_DATA_SIZE;

/// Check the signed transaction against the protocol size limit.
///
/// Pure and side-effect free. Returns the serialized size on success;
/// a transaction exactly at the limit passes, one byte over fails.
pub fn validate_size(tx: &VersionedTransaction) -> Result<usize, ProvisionError> {
    let bytes = bincode::serialize(tx)
        .map_err(|e| ProvisionError::Configuration(format!("serialization failed: {e}")))?;

    if bytes.len() > MAX_TRANSACTION_SIZE {
        return Err(ProvisionError::TransactionTooLarge {
            size: bytes.len(),
            limit: MAX_TRANSACTION_SIZE,
        });
    }
    Ok(bytes.len())
}
