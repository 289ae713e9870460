//! Cluster RPC context
//!
//! One explicit client context per process, passed into each pipeline
//! invocation — no module-level RPC handles. Wraps the nonblocking
//! `RpcClient`, which is safe to share across concurrent pipeline runs.
//! Methods map client errors onto the pipeline taxonomy and never retry;
//! that policy lives with the caller.

use std::time::Duration;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::TransactionStatus;
use tracing::debug;

use crate::tx_builder::context::LifetimeAnchor;
use crate::tx_builder::errors::ProvisionError;

/// Handle to one cluster RPC endpoint at a fixed default commitment.
pub struct ClusterContext {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl ClusterContext {
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig, timeout: Duration) -> Self {
        let url = url.into();
        debug!(%url, ?commitment, "creating cluster context");
        Self {
            client: RpcClient::new_with_timeout_and_commitment(url, timeout, commitment),
            commitment,
        }
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Minimum balance exempting an account of `size` bytes from rent.
    pub async fn minimum_balance_for_rent_exemption(
        &self,
        size: usize,
    ) -> Result<u64, ProvisionError> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(size)
            .await?)
    }

    /// Fetch a fresh lifetime anchor (recent blockhash and the last block
    /// height it is valid at). One anchor per transaction attempt.
    pub async fn latest_anchor(&self) -> Result<LifetimeAnchor, ProvisionError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        Ok(LifetimeAnchor::new(blockhash, last_valid_block_height))
    }

    /// Send a signed transaction. Preflight runs at the context commitment;
    /// the RPC node is told not to rebroadcast on its own (resubmission
    /// policy belongs to the caller).
    pub async fn send_transaction(
        &self,
        tx: &VersionedTransaction,
    ) -> Result<Signature, ProvisionError> {
        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(self.commitment.commitment),
            max_retries: Some(0),
            ..RpcSendTransactionConfig::default()
        };
        Ok(self.client.send_transaction_with_config(tx, config).await?)
    }

    /// Current status of a signature, if the cluster still tracks it.
    pub async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionStatus>, ProvisionError> {
        let response = self.client.get_signature_statuses(&[*signature]).await?;
        Ok(response.value.into_iter().next().flatten())
    }

    /// Current block height at the context commitment.
    pub async fn block_height(&self) -> Result<u64, ProvisionError> {
        Ok(self
            .client
            .get_block_height_with_commitment(self.commitment)
            .await?)
    }

    /// Lamport balance of an account.
    pub async fn balance(&self, address: &Pubkey) -> Result<u64, ProvisionError> {
        Ok(self.client.get_balance(address).await?)
    }

    /// Request lamports from the faucet (dev/test clusters only).
    ///
    /// Returns the airdrop transaction's signature; confirmation is a
    /// separate wait, see [`crate::tx_builder::submit::await_commitment`].
    pub async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, ProvisionError> {
        Ok(self.client.request_airdrop(address, lamports).await?)
    }
}

impl std::fmt::Debug for ClusterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterContext")
            .field("url", &self.client.url())
            .field("commitment", &self.commitment)
            .finish()
    }
}
