//! Instruction planning and ordering validation
//!
//! On-chain execution inside one transaction is strictly sequential, so a
//! new account must be created (owner assigned, space allocated, rent-exempt
//! balance funded) before any instruction initializes its program state.
//! The recurring shape is the (create-account, initialize) pair, planned
//! here for mints and token accounts.
//!
//! The sequencer never reorders anything. It returns the list exactly as
//! given and rejects lists that violate the create-before-initialize rule.

use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, system_instruction, system_program,
};

use crate::tx_builder::errors::ProvisionError;

// SystemInstruction::CreateAccount, bincode u32 little-endian discriminator.
const SYSTEM_CREATE_ACCOUNT: [u8; 4] = [0, 0, 0, 0];

// TokenInstruction discriminators that initialize program state on an
// already-created account. First account of each is the target.
const TOKEN_INITIALIZE_TAGS: [u8; 5] = [
    0,  // InitializeMint
    1,  // InitializeAccount
    16, // InitializeAccount2
    18, // InitializeAccount3
    20, // InitializeMint2
];

/// Plan the instruction pair that creates and initializes a mint.
///
/// `lamports` must be the rent-exempt minimum for [`mint_account_size`]
/// bytes, and `mint` co-signs its own creation.
///
/// [`mint_account_size`]: crate::tx_builder::rent::mint_account_size
pub fn create_mint_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    lamports: u64,
    decimals: u8,
    mint_authority: &Pubkey,
) -> Result<Vec<Instruction>, ProvisionError> {
    let create = system_instruction::create_account(
        payer,
        mint,
        lamports,
        crate::tx_builder::rent::mint_account_size() as u64,
        &spl_token::id(),
    );

    let initialize = spl_token::instruction::initialize_mint2(
        &spl_token::id(),
        mint,
        mint_authority,
        None,
        decimals,
    )
    .map_err(|e| ProvisionError::instruction_failed("spl-token", e.to_string()))?;

    Ok(vec![create, initialize])
}

/// Plan the instruction pair that creates and initializes a token account.
///
/// The mint must already exist on-chain; only the new account co-signs.
pub fn create_token_account_instructions(
    payer: &Pubkey,
    account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    lamports: u64,
) -> Result<Vec<Instruction>, ProvisionError> {
    let create = system_instruction::create_account(
        payer,
        account,
        lamports,
        crate::tx_builder::rent::token_account_size() as u64,
        &spl_token::id(),
    );

    let initialize =
        spl_token::instruction::initialize_account3(&spl_token::id(), account, mint, owner)
            .map_err(|e| ProvisionError::instruction_failed("spl-token", e.to_string()))?;

    Ok(vec![create, initialize])
}

/// Order an instruction list for atomic execution.
///
/// Returns the list unchanged; this is the contract, not an algorithm. The
/// dependency rule is enforced as a precondition: an initialize-type
/// instruction for account X must not precede the create-account
/// instruction for X in the same list. Accounts with no create instruction
/// in the list are assumed to pre-exist and pass.
pub fn sequence(instructions: Vec<Instruction>) -> Result<Vec<Instruction>, ProvisionError> {
    check_create_before_initialize(&instructions)?;
    Ok(instructions)
}

/// The sequencer's precondition check, usable on a borrowed list.
pub fn check_create_before_initialize(
    instructions: &[Instruction],
) -> Result<(), ProvisionError> {
    for (init_idx, init_ix) in instructions.iter().enumerate() {
        let Some(target) = initialize_target(init_ix) else {
            continue;
        };

        let created_at = instructions
            .iter()
            .position(|ix| created_account(ix) == Some(target));

        if let Some(create_idx) = created_at {
            if create_idx > init_idx {
                return Err(ProvisionError::invalid_order(format!(
                    "account {} is initialized at position {} but created at position {}",
                    target, init_idx, create_idx
                )));
            }
        }
    }
    Ok(())
}

/// The account a system-program CreateAccount instruction brings to life,
/// if this is one.
fn created_account(ix: &Instruction) -> Option<Pubkey> {
    if ix.program_id != system_program::id() {
        return None;
    }
    if ix.data.len() < 4 || ix.data[0..4] != SYSTEM_CREATE_ACCOUNT {
        return None;
    }
    // Accounts: [payer, new_account], both signers.
    ix.accounts.get(1).map(|meta| meta.pubkey)
}

/// The account a token-program initialize instruction targets, if this is one.
fn initialize_target(ix: &Instruction) -> Option<Pubkey> {
    if ix.program_id != spl_token::id() {
        return None;
    }
    let tag = *ix.data.first()?;
    if !TOKEN_INITIALIZE_TAGS.contains(&tag) {
        return None;
    }
    ix.accounts.first().map(|meta| meta.pubkey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_pair() -> (Pubkey, Pubkey, Vec<Instruction>) {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ixs = create_mint_instructions(&payer, &mint, 1_461_600, 9, &payer)
            .expect("plan mint instructions");
        (payer, mint, ixs)
    }

    #[test]
    fn test_create_mint_plan_shape() {
        let (payer, mint, ixs) = mint_pair();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, system_program::id());
        assert_eq!(ixs[1].program_id, spl_token::id());

        // New account co-signs its own creation.
        assert_eq!(ixs[0].accounts[0].pubkey, payer);
        assert!(ixs[0].accounts[0].is_signer);
        assert_eq!(ixs[0].accounts[1].pubkey, mint);
        assert!(ixs[0].accounts[1].is_signer);
    }

    #[test]
    fn test_create_token_account_plan_shape() {
        let payer = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ixs = create_token_account_instructions(&payer, &account, &mint, &owner, 2_039_280)
            .expect("plan token account instructions");

        assert_eq!(ixs.len(), 2);
        assert_eq!(created_account(&ixs[0]), Some(account));
        assert_eq!(initialize_target(&ixs[1]), Some(account));
    }

    #[test]
    fn test_sequence_accepts_create_before_initialize() {
        let (_, _, ixs) = mint_pair();
        let out = sequence(ixs.clone()).expect("valid order");
        // Identity: order and content preserved exactly.
        assert_eq!(out, ixs);
    }

    #[test]
    fn test_sequence_rejects_initialize_before_create() {
        let (_, _, mut ixs) = mint_pair();
        ixs.reverse();

        let err = sequence(ixs).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidInstructionOrder(_)));
    }

    #[test]
    fn test_sequence_allows_preexisting_accounts() {
        let payer = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        // Initialize without a create in the same list: the account is
        // assumed to pre-exist.
        let initialize =
            spl_token::instruction::initialize_account3(&spl_token::id(), &account, &mint, &payer)
                .unwrap();

        assert!(sequence(vec![initialize]).is_ok());
    }

    #[test]
    fn test_sequence_ignores_unrelated_instructions() {
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let transfer = system_instruction::transfer(&payer, &recipient, 1_000);
        assert_eq!(created_account(&transfer), None);
        assert_eq!(initialize_target(&transfer), None);
        assert!(sequence(vec![transfer]).is_ok());
    }

    #[test]
    fn test_two_phase_pair_detection() {
        let (_, mint, ixs) = mint_pair();
        assert_eq!(created_account(&ixs[0]), Some(mint));
        assert_eq!(initialize_target(&ixs[1]), Some(mint));
        assert_eq!(created_account(&ixs[1]), None);
        assert_eq!(initialize_target(&ixs[0]), None);
    }
}
