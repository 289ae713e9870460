//! Token infrastructure provisioning flows
//!
//! Each flow is one full pipeline run: fetch a fresh lifetime anchor, plan
//! instructions, assemble, sign, validate the size, submit, and wait for
//! the configured commitment level. Flows never share anchors — two
//! sequential transactions each fetch their own, because reusing the first
//! one risks expiry mid-flight and invalidates nothing gracefully.

use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use tracing::info;

use crate::cluster::ClusterContext;
use crate::tx_builder::errors::ProvisionError;
use crate::tx_builder::instructions::{
    create_mint_instructions, create_token_account_instructions,
};
use crate::tx_builder::output::ConfirmationReceipt;
use crate::tx_builder::rent;
use crate::tx_builder::signer::sign;
use crate::tx_builder::submit::{await_commitment, submit_and_confirm};
use crate::tx_builder::validate::validate_size;
use crate::tx_builder::MessageBuilder;

/// Margin on top of rent when pre-checking the payer balance, covering the
/// transaction fee.
const FEE_MARGIN_LAMPORTS: u64 = 10_000;

/// Create and initialize a new mint in one atomic transaction.
///
/// The mint keypair co-signs its own creation. Fails with
/// `InsufficientFunds` before building anything if the payer cannot cover
/// rent plus a fee margin.
pub async fn create_mint(
    ctx: &ClusterContext,
    payer: &Keypair,
    mint: &Keypair,
    decimals: u8,
    mint_authority: &Pubkey,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let space = rent::mint_account_size();
    let lamports = rent::minimum_balance(ctx, space).await?;

    ensure_payer_covers(ctx, &payer.pubkey(), lamports).await?;

    let ixs = create_mint_instructions(
        &payer.pubkey(),
        &mint.pubkey(),
        lamports,
        decimals,
        mint_authority,
    )?;

    let receipt = run_pipeline(ctx, payer, &[payer, mint], ixs, deadline).await?;
    info!(mint = %mint.pubkey(), signature = %receipt.signature, "mint created");
    Ok(receipt)
}

/// Create and initialize a token account for an existing mint.
///
/// The mint must already be initialized on-chain; only the new account
/// co-signs.
pub async fn create_token_account(
    ctx: &ClusterContext,
    payer: &Keypair,
    account: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let space = rent::token_account_size();
    let lamports = rent::minimum_balance(ctx, space).await?;

    ensure_payer_covers(ctx, &payer.pubkey(), lamports).await?;

    let ixs =
        create_token_account_instructions(&payer.pubkey(), &account.pubkey(), mint, owner, lamports)?;

    let receipt = run_pipeline(ctx, payer, &[payer, account], ixs, deadline).await?;
    info!(account = %account.pubkey(), %mint, signature = %receipt.signature, "token account created");
    Ok(receipt)
}

/// Create the associated token account for `owner` and `mint`.
///
/// The ATA address is program-derived, so only the payer signs.
pub async fn create_associated_token_account(
    ctx: &ClusterContext,
    payer: &Keypair,
    owner: &Pubkey,
    mint: &Pubkey,
    deadline: Duration,
) -> Result<(Pubkey, ConfirmationReceipt), ProvisionError> {
    let address = spl_associated_token_account::get_associated_token_address(owner, mint);
    let ix = spl_associated_token_account::instruction::create_associated_token_account(
        &payer.pubkey(),
        owner,
        mint,
        &spl_token::id(),
    );

    let receipt = run_pipeline(ctx, payer, &[payer], vec![ix], deadline).await?;
    info!(%address, %mint, signature = %receipt.signature, "associated token account created");
    Ok((address, receipt))
}

/// Mint `amount` base units into a token account.
pub async fn mint_to(
    ctx: &ClusterContext,
    payer: &Keypair,
    mint: &Pubkey,
    destination: &Pubkey,
    mint_authority: &Keypair,
    amount: u64,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let ix = spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )
    .map_err(|e| ProvisionError::instruction_failed("spl-token", e.to_string()))?;

    let receipt = run_pipeline(ctx, payer, &[payer, mint_authority], vec![ix], deadline).await?;
    info!(%destination, amount, signature = %receipt.signature, "tokens minted");
    Ok(receipt)
}

/// Transfer lamports from the payer to a recipient.
pub async fn fund(
    ctx: &ClusterContext,
    payer: &Keypair,
    recipient: &Pubkey,
    lamports: u64,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let ix = system_instruction::transfer(&payer.pubkey(), recipient, lamports);

    let receipt = run_pipeline(ctx, payer, &[payer], vec![ix], deadline).await?;
    info!(%recipient, lamports, signature = %receipt.signature, "account funded");
    Ok(receipt)
}

/// Request lamports from the dev/test faucet and wait for confirmation.
pub async fn airdrop(
    ctx: &ClusterContext,
    recipient: &Pubkey,
    lamports: u64,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    info!(%recipient, lamports, "requesting airdrop");
    let signature = ctx.request_airdrop(recipient, lamports).await?;

    let receipt =
        await_commitment(ctx, &signature, None, ctx.commitment().commitment, deadline).await?;
    info!(%recipient, signature = %receipt.signature, "airdrop confirmed");
    Ok(receipt)
}

/// One complete build-sign-validate-submit cycle on a fresh anchor.
async fn run_pipeline(
    ctx: &ClusterContext,
    payer: &Keypair,
    signers: &[&Keypair],
    instructions: Vec<solana_sdk::instruction::Instruction>,
    deadline: Duration,
) -> Result<ConfirmationReceipt, ProvisionError> {
    let anchor = ctx.latest_anchor().await?;

    let message = MessageBuilder::new()
        .fee_payer(payer.pubkey())
        .lifetime_anchor(anchor)
        .instructions(instructions)
        .build()?;

    let tx = sign(message, signers)?;
    let size = validate_size(&tx)?;
    tracing::debug!(size, "transaction validated, submitting");

    submit_and_confirm(ctx, &tx, &anchor, ctx.commitment().commitment, deadline).await
}

/// Fail early with `InsufficientFunds` when the payer cannot fund the
/// rent-exempt balance plus the fee margin.
async fn ensure_payer_covers(
    ctx: &ClusterContext,
    payer: &Pubkey,
    lamports: u64,
) -> Result<(), ProvisionError> {
    let balance = ctx.balance(payer).await?;
    let needed = lamports + FEE_MARGIN_LAMPORTS;
    if balance < needed {
        return Err(ProvisionError::InsufficientFunds(format!(
            "payer {payer} holds {balance} lamports, needs {needed}"
        )));
    }
    Ok(())
}
