//! Transaction construction and submission pipeline
//!
//! The pipeline runs in fixed stages:
//!
//! 1. **rent** — byte sizes for the target account layouts and the
//!    rent-exempt minimum balance from the cluster
//! 2. **instructions** — (create-account, initialize) pairs and the
//!    create-before-initialize ordering precondition
//! 3. **builder** — fee payer + lifetime anchor + ordered instructions
//!    compiled into one versioned (V0) message
//! 4. **signer** — one signature per required signer, slot-ordered,
//!    bound to the exact message bytes
//! 5. **validate** — encoded size against the protocol packet limit,
//!    checked locally before any network call
//! 6. **submit** — send once, poll until the commitment level, anchor
//!    expiry, or the caller's deadline
//!
//! Stages 1 and 6 suspend on the network; everything in between is
//! synchronous and pure. Assembly, signing, and validation are
//! all-or-nothing before any network call, so no partial transaction is
//! ever submitted. Each build is an independent unit of work: nothing is
//! shared between pipeline runs except the cluster context.

pub mod builder;
pub mod context;
pub mod errors;
pub mod instructions;
pub mod output;
pub mod rent;
pub mod signer;
pub mod submit;
pub mod validate;

pub use builder::MessageBuilder;
pub use context::LifetimeAnchor;
pub use errors::ProvisionError;
pub use output::ConfirmationReceipt;
pub use submit::{await_commitment, submit_and_confirm};
pub use validate::{validate_size, MAX_TRANSACTION_SIZE};
