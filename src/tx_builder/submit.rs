//! Transaction submission and confirmation
//!
//! Sends a signed transaction once and then polls signature status until
//! the requested commitment level is reached, the lifetime anchor expires,
//! or the caller's deadline elapses. There is no internal retry: resending
//! the same signed bytes is safe and is the caller's decision, rebuilding
//! on a fresh anchor even more so.
//!
//! A deadline hit is reported as `ConfirmationTimeout`, which means
//! "unknown outcome", not "failed" — the transaction may still land, and
//! callers must poll the signature before resubmitting.

use std::time::Duration;

use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::TransactionConfirmationStatus;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::cluster::ClusterContext;
use crate::tx_builder::context::LifetimeAnchor;
use crate::tx_builder::errors::ProvisionError;
use crate::tx_builder::output::ConfirmationReceipt;

/// How often the confirm loop polls signature status.
const POLL_INTERVAL: Duration = Duration::from_millis(400);

/// How many status polls pass between block-height expiry checks.
const EXPIRY_CHECK_EVERY: u32 = 4;

/// Send a signed transaction and wait for the requested commitment level.
///
/// The anchor is checked against the current block height before sending,
/// so a transaction built on an already-expired anchor fails with
/// [`ProvisionError::StaleLifetimeAnchor`] instead of hanging, and again
/// periodically during the wait in case the anchor expires unconfirmed.
pub async fn submit_and_confirm(
    ctx: &ClusterContext,
    tx: &VersionedTransaction,
    anchor: &LifetimeAnchor,
    commitment: CommitmentLevel,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let height = ctx.block_height().await?;
    if anchor.is_expired(height) {
        return Err(ProvisionError::StaleLifetimeAnchor);
    }

    let signature = ctx.send_transaction(tx).await?;
    debug!(%signature, "transaction sent, awaiting confirmation");

    await_commitment(ctx, &signature, Some(anchor), commitment, deadline).await
}

/// Poll a signature until it satisfies `commitment`.
///
/// With an anchor, an unconfirmed signature whose anchor has expired is
/// reported as stale (the signed bytes can never land anymore). Without
/// one (airdrops), only the deadline bounds the wait.
pub async fn await_commitment(
    ctx: &ClusterContext,
    signature: &Signature,
    anchor: Option<&LifetimeAnchor>,
    commitment: CommitmentLevel,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let started = Instant::now();
    let target = CommitmentConfig { commitment };
    let mut polls: u32 = 0;

    loop {
        if let Some(status) = ctx.signature_status(signature).await? {
            if let Some(err) = status.err.clone() {
                return Err(ProvisionError::SubmissionRejected(err.to_string()));
            }
            if status.satisfies_commitment(target) {
                let achieved = achieved_level(status.confirmation_status.as_ref(), commitment);
                return Ok(ConfirmationReceipt::new(*signature, achieved, status.slot));
            }
        }

        polls += 1;
        if let Some(anchor) = anchor {
            if polls % EXPIRY_CHECK_EVERY == 0 {
                let height = ctx.block_height().await?;
                if anchor.is_expired(height) {
                    warn!(%signature, height, "lifetime anchor expired before confirmation");
                    return Err(ProvisionError::StaleLifetimeAnchor);
                }
            }
        }

        if started.elapsed() >= deadline {
            return Err(ProvisionError::ConfirmationTimeout {
                signature: *signature,
                waited_ms: started.elapsed().as_millis() as u64,
            });
        }

        sleep(POLL_INTERVAL).await;
    }
}

/// The level the cluster actually reported, falling back to the requested
/// one when the status payload omits it.
fn achieved_level(
    status: Option<&TransactionConfirmationStatus>,
    requested: CommitmentLevel,
) -> CommitmentLevel {
    match status {
        Some(TransactionConfirmationStatus::Processed) => CommitmentLevel::Processed,
        Some(TransactionConfirmationStatus::Confirmed) => CommitmentLevel::Confirmed,
        Some(TransactionConfirmationStatus::Finalized) => CommitmentLevel::Finalized,
        None => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achieved_level_mapping() {
        assert_eq!(
            achieved_level(
                Some(&TransactionConfirmationStatus::Finalized),
                CommitmentLevel::Confirmed
            ),
            CommitmentLevel::Finalized
        );
        assert_eq!(
            achieved_level(None, CommitmentLevel::Confirmed),
            CommitmentLevel::Confirmed
        );
    }
}
