//! Transaction message assembly
//!
//! The builder accumulates a fee payer, a lifetime anchor, and an ordered
//! instruction list, and compiles them into a single versioned (V0) message.
//! Every step consumes and returns the builder, so a built message can only
//! reflect exactly what was supplied; there is no hidden mutation. Changing
//! any input afterwards means building a new message.

use solana_sdk::{
    message::{v0::Message as MessageV0, VersionedMessage},
    instruction::Instruction,
    pubkey::Pubkey,
};

use crate::tx_builder::context::LifetimeAnchor;
use crate::tx_builder::errors::ProvisionError;
use crate::tx_builder::instructions::sequence;

/// Assembles an unsigned versioned transaction message.
///
/// Deterministic: identical inputs compile to byte-identical messages.
/// Instruction order is preserved exactly as given, since on-chain
/// execution is strictly sequential and reordering changes semantics.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    fee_payer: Option<Pubkey>,
    anchor: Option<LifetimeAnchor>,
    instructions: Vec<Instruction>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account paying the transaction fee (always a signer).
    pub fn fee_payer(mut self, payer: Pubkey) -> Self {
        self.fee_payer = Some(payer);
        self
    }

    /// Set the lifetime anchor bounding how long the transaction stays
    /// eligible for inclusion.
    pub fn lifetime_anchor(mut self, anchor: LifetimeAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Replace the instruction list.
    pub fn instructions(mut self, instructions: Vec<Instruction>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Append a single instruction.
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Compile the accumulated fields into a `VersionedMessage::V0`.
    ///
    /// Fails fast on a missing fee payer or anchor, on an empty instruction
    /// list, and on a create/initialize ordering violation. The versioned
    /// format is always used so larger instruction sets stay addressable.
    pub fn build(self) -> Result<VersionedMessage, ProvisionError> {
        let payer = self
            .fee_payer
            .ok_or_else(|| ProvisionError::Configuration("fee payer not set".to_string()))?;
        let anchor = self
            .anchor
            .ok_or_else(|| ProvisionError::Configuration("lifetime anchor not set".to_string()))?;

        if self.instructions.is_empty() {
            return Err(ProvisionError::Configuration(
                "instruction list is empty, nothing to do".to_string(),
            ));
        }

        let instructions = sequence(self.instructions)?;

        let message = MessageV0::try_compile(&payer, &instructions, &[], anchor.blockhash)
            .map_err(|e| ProvisionError::Configuration(format!("message compile failed: {e}")))?;

        Ok(VersionedMessage::V0(message))
    }
}
