//! Compatibility layer for versioned message access
//!
//! Legacy and V0 messages expose the header and account keys through
//! different fields. The signer derives its required-signer set from here
//! rather than hard-coding "fee payer plus mint", so an instruction set
//! that brings its own signers (say a mint authority distinct from the fee
//! payer) needs no signer changes.

use solana_sdk::{
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
};

/// Message header, uniform across Legacy and V0.
#[inline]
#[must_use]
pub fn message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(msg) => &msg.header,
        VersionedMessage::V0(msg) => &msg.header,
    }
}

/// Static account keys, uniform across Legacy and V0.
///
/// For V0 messages this excludes addresses loaded from lookup tables,
/// which is exactly the set signature slots are laid out over.
#[inline]
#[must_use]
pub fn static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(msg) => &msg.account_keys,
        VersionedMessage::V0(msg) => &msg.account_keys,
    }
}

/// The accounts that must sign this message: the first
/// `num_required_signatures` static account keys, in slot order.
#[inline]
#[must_use]
pub fn required_signers(message: &VersionedMessage) -> &[Pubkey] {
    let n = message_header(message).num_required_signatures as usize;
    let keys = static_account_keys(message);
    &keys[..n.min(keys.len())]
}
