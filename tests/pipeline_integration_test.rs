//! Offline integration tests for the full build-sign-validate pipeline.
//!
//! Everything up to submission is deterministic and network-free, so the
//! whole local half of the pipeline is exercised end to end here with a
//! fixed anchor and rent values. Submission itself needs a live validator.

use solana_sdk::hash::Hash;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::VersionedTransaction;

use minter::compat;
use minter::tx_builder::instructions::{
    create_mint_instructions, create_token_account_instructions,
};
use minter::tx_builder::rent::{mint_account_size, token_account_size};
use minter::tx_builder::signer::{sign, verify};
use minter::tx_builder::validate::{validate_size, MAX_TRANSACTION_SIZE};
use minter::tx_builder::{LifetimeAnchor, MessageBuilder, ProvisionError};

// Rent-exempt minimums on a default-genesis cluster for the two layouts.
const MINT_RENT: u64 = 1_461_600;
const TOKEN_ACCOUNT_RENT: u64 = 2_039_280;

fn build_mint_tx(
    payer: &Keypair,
    mint: &Keypair,
    anchor: LifetimeAnchor,
) -> Result<VersionedTransaction, ProvisionError> {
    let ixs = create_mint_instructions(
        &payer.pubkey(),
        &mint.pubkey(),
        MINT_RENT,
        9,
        &payer.pubkey(),
    )?;

    let message = MessageBuilder::new()
        .fee_payer(payer.pubkey())
        .lifetime_anchor(anchor)
        .instructions(ixs)
        .build()?;

    sign(message, &[payer, mint])
}

#[test]
fn full_mint_pipeline_produces_valid_transaction() {
    let payer = Keypair::new();
    let mint = Keypair::new();
    let anchor = LifetimeAnchor::new(Hash::new_unique(), 5_000);

    let tx = build_mint_tx(&payer, &mint, anchor).expect("pipeline");

    // Two required signers, two signatures, within the packet limit.
    assert_eq!(tx.signatures.len(), 2);
    assert!(verify(&tx));
    let size = validate_size(&tx).expect("size");
    assert!(size <= MAX_TRANSACTION_SIZE);

    // The anchor is embedded verbatim.
    match &tx.message {
        minter::VersionedMessage::V0(m) => assert_eq!(m.recent_blockhash, anchor.blockhash),
        minter::VersionedMessage::Legacy(_) => panic!("expected V0"),
    }
}

#[test]
fn pipeline_is_deterministic_end_to_end() {
    let payer = Keypair::new();
    let mint = Keypair::new();
    let anchor = LifetimeAnchor::new(Hash::new_unique(), 5_000);

    let a = build_mint_tx(&payer, &mint, anchor).unwrap();
    let b = build_mint_tx(&payer, &mint, anchor).unwrap();

    assert_eq!(
        bincode::serialize(&a).unwrap(),
        bincode::serialize(&b).unwrap()
    );
}

#[test]
fn round_trip_recovers_signer_set() {
    let payer = Keypair::new();
    let mint = Keypair::new();
    let anchor = LifetimeAnchor::new(Hash::new_unique(), 5_000);

    let tx = build_mint_tx(&payer, &mint, anchor).unwrap();
    let bytes = bincode::serialize(&tx).unwrap();
    let decoded: VersionedTransaction = bincode::deserialize(&bytes).unwrap();

    // Re-derive the signer set from the decoded message and verify each
    // signature against its slot's public key.
    let signers = compat::required_signers(&decoded.message);
    assert_eq!(signers, &[payer.pubkey(), mint.pubkey()]);
    let message_bytes = decoded.message.serialize();
    for (sig, account) in decoded.signatures.iter().zip(signers) {
        assert!(sig.verify(account.as_ref(), &message_bytes));
    }
}

#[test]
fn two_sequential_transactions_use_independent_anchors() {
    let payer = Keypair::new();
    let mint = Keypair::new();
    let token_account = Keypair::new();

    // First transaction: create + init mint.
    let anchor_one = LifetimeAnchor::new(Hash::new_unique(), 1_000);
    let mint_tx = build_mint_tx(&payer, &mint, anchor_one).unwrap();
    assert!(verify(&mint_tx));

    // Second transaction referencing the mint must fetch its own anchor;
    // by the time it is built, the first one has expired.
    let current_height = 1_200;
    assert!(anchor_one.is_expired(current_height));

    let anchor_two = LifetimeAnchor::new(Hash::new_unique(), 1_500);
    assert!(!anchor_two.is_expired(current_height));

    let ixs = create_token_account_instructions(
        &payer.pubkey(),
        &token_account.pubkey(),
        &mint.pubkey(),
        &payer.pubkey(),
        TOKEN_ACCOUNT_RENT,
    )
    .unwrap();

    let message = MessageBuilder::new()
        .fee_payer(payer.pubkey())
        .lifetime_anchor(anchor_two)
        .instructions(ixs)
        .build()
        .unwrap();
    let tx = sign(message, &[&payer, &token_account]).unwrap();

    assert!(verify(&tx));
    assert!(validate_size(&tx).is_ok());
}

#[test]
fn missing_mint_signer_fails_before_any_submission() {
    let payer = Keypair::new();
    let mint = Keypair::new();

    let ixs = create_mint_instructions(
        &payer.pubkey(),
        &mint.pubkey(),
        MINT_RENT,
        9,
        &payer.pubkey(),
    )
    .unwrap();

    let message = MessageBuilder::new()
        .fee_payer(payer.pubkey())
        .lifetime_anchor(LifetimeAnchor::new(Hash::new_unique(), 5_000))
        .instructions(ixs)
        .build()
        .unwrap();

    let err = sign(message, &[&payer]).unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::MissingSigner { account } if account == mint.pubkey()
    ));
}

#[test]
fn account_sizes_match_program_layouts() {
    assert_eq!(mint_account_size(), 82);
    assert_eq!(token_account_size(), 165);
}
