//! Minter - Solana token-infrastructure provisioner
//!
//! Builds, signs, size-validates, and submits the transactions that create
//! a mint and its token accounts, waiting for a configurable commitment
//! level. The pipeline lives in [`tx_builder`]; [`provision`] wires it to
//! concrete flows (mint, token account, airdrop, funding).

pub mod cluster;
pub mod compat;
pub mod config;
pub mod provision;
pub mod tx_builder;
pub mod wallet;

// Re-export commonly used types
pub use cluster::ClusterContext;
pub use config::Config;
pub use tx_builder::{ConfirmationReceipt, LifetimeAnchor, MessageBuilder, ProvisionError};
pub use wallet::WalletManager;

pub use solana_sdk::{message::VersionedMessage, pubkey::Pubkey, signature::Signature};
