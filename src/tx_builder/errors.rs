//! Error taxonomy for the transaction pipeline
//!
//! Every stage of the pipeline surfaces one of these kinds. Local stages
//! (sequencing, assembly, signing, size validation) fail fast and
//! synchronously; network-touching stages map RPC failures onto the same
//! taxonomy without retrying internally. Retry and backoff policy belongs
//! to the caller.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Error type covering the whole build / sign / validate / submit / confirm
/// lifecycle.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Transport-level failure reaching the cluster.
    ///
    /// Transient: the caller may rerun the whole pipeline from a fresh
    /// lifetime anchor.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Fee payer or new account is underfunded.
    ///
    /// Fatal until remedied externally (e.g. an airdrop on dev clusters).
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// An account flagged signer-required in the message has no
    /// corresponding signing capability supplied.
    ///
    /// Programming error; never retried.
    #[error("Missing signer for required account {account}")]
    MissingSigner {
        /// The required signer with no keypair supplied
        account: Pubkey,
    },

    /// The encoded transaction exceeds the protocol's packet limit.
    ///
    /// Fatal for this instruction set; the caller must split the work
    /// across multiple transactions.
    #[error("Transaction too large: {size} bytes (limit {limit})")]
    TransactionTooLarge {
        /// Full serialized size, message plus signatures
        size: usize,
        /// Protocol maximum encoded transaction size
        limit: usize,
    },

    /// The lifetime anchor expired before submission or confirmation.
    ///
    /// Recoverable by rebuilding the transaction with a fresh anchor and
    /// re-signing.
    #[error("Lifetime anchor expired before the transaction was confirmed")]
    StaleLifetimeAnchor,

    /// The cluster rejected the transaction outright.
    ///
    /// Fatal for this exact transaction.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The confirmation wait hit the caller's deadline.
    ///
    /// Ambiguous outcome: the transaction may still land. The caller must
    /// query the signature's status before deciding to resubmit.
    #[error("Confirmation timed out after {waited_ms}ms (signature: {signature})")]
    ConfirmationTimeout {
        /// Signature of the submitted transaction
        signature: Signature,
        /// How long the confirm loop waited before giving up
        waited_ms: u64,
    },

    /// An initialize-type instruction for an account appeared before the
    /// create-account instruction for that same account.
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Failed to encode an instruction for a specific program.
    #[error("Instruction build error (program={program}): {reason}")]
    InstructionBuild {
        /// The program the instruction targets
        program: String,
        /// Detailed reason for the failure
        reason: String,
    },

    /// Invalid configuration or pipeline input (empty instruction list,
    /// missing builder fields, unreadable keypair file, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Wrapped error from external crates.
    #[error("External error: {0}")]
    External(anyhow::Error),
}

impl From<anyhow::Error> for ProvisionError {
    fn from(err: anyhow::Error) -> Self {
        Self::External(err)
    }
}

impl ProvisionError {
    /// Check if this error is potentially retryable.
    ///
    /// `StaleLifetimeAnchor` counts as retryable because the caller can
    /// rebuild with a fresh anchor and re-sign. `ConfirmationTimeout` does
    /// NOT: its outcome is unknown, see [`ProvisionError::outcome_unknown`].
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkUnavailable(_) => true,
            Self::StaleLifetimeAnchor => true,

            Self::InsufficientFunds(_) => false,
            Self::MissingSigner { .. } => false,
            Self::TransactionTooLarge { .. } => false,
            Self::SubmissionRejected(_) => false,
            Self::ConfirmationTimeout { .. } => false,
            Self::InvalidInstructionOrder(_) => false,
            Self::InstructionBuild { .. } => false,
            Self::Configuration(_) => false,
            Self::External(_) => false,
        }
    }

    /// True when the transaction may have landed despite the error.
    ///
    /// Resubmitting blindly after such an error risks a double submission;
    /// the caller must poll the signature's status first.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::ConfirmationTimeout { .. })
    }

    /// Get the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NetworkUnavailable(_) => "network",
            Self::InsufficientFunds(_) => "funds",
            Self::MissingSigner { .. } => "signing",
            Self::TransactionTooLarge { .. } => "size",
            Self::StaleLifetimeAnchor => "anchor",
            Self::SubmissionRejected(_) => "submission",
            Self::ConfirmationTimeout { .. } => "confirmation",
            Self::InvalidInstructionOrder(_) => "ordering",
            Self::InstructionBuild { .. } => "instruction",
            Self::Configuration(_) => "config",
            Self::External(_) => "external",
        }
    }

    /// Create an instruction build error for a specific program.
    pub fn instruction_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InstructionBuild {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid instruction order error.
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }
}

/// Map a Solana RPC client error onto the pipeline taxonomy.
///
/// Transaction-level errors reported by preflight or status polling are
/// inspected first: a stale blockhash and underfunding have dedicated kinds,
/// everything else is a flat rejection of this exact transaction. Transport
/// failures become `NetworkUnavailable`.
impl From<solana_client::client_error::ClientError> for ProvisionError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        use solana_client::client_error::ClientErrorKind;

        if let Some(tx_err) = err.get_transaction_error() {
            return match tx_err {
                TransactionError::BlockhashNotFound => Self::StaleLifetimeAnchor,
                TransactionError::InsufficientFundsForFee => {
                    Self::InsufficientFunds("fee payer cannot cover the transaction fee".into())
                }
                other => {
                    let msg = other.to_string();
                    if msg.to_lowercase().contains("insufficient") {
                        Self::InsufficientFunds(msg)
                    } else {
                        Self::SubmissionRejected(msg)
                    }
                }
            };
        }

        match &err.kind {
            ClientErrorKind::SigningError(e) => Self::Configuration(e.to_string()),
            _ => Self::NetworkUnavailable(err.to_string()),
        }
    }
}
