//! Minter - Solana token-infrastructure provisioner
//!
//! Provisions on-chain token infrastructure against a configured cluster:
//! funds a fee payer (dev/test airdrop), creates and initializes a mint,
//! optionally creates a token account for it, and optionally mints an
//! initial supply. Each step is one atomic transaction built, signed,
//! size-validated, submitted, and confirmed by the pipeline.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minter::cluster::ClusterContext;
use minter::config::Config;
use minter::provision;
use minter::wallet::WalletManager;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "minter.toml")]
    config: String,

    /// Override the configured mint decimals
    #[arg(short, long)]
    decimals: Option<u8>,

    /// Skip token account creation regardless of configuration
    #[arg(long)]
    no_token_account: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    info!("🚀 Starting minter");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    info!("📋 Loading configuration from: {}", args.config);
    let mut config = load_config(&args.config)?;
    if let Some(decimals) = args.decimals {
        config.mint.decimals = decimals;
    }
    if args.no_token_account {
        config.mint.token_account = false;
    }

    let ctx = ClusterContext::new(
        config.rpc.url.clone(),
        config.commitment(),
        Duration::from_secs(config.rpc.timeout_secs),
    );
    info!("🌐 Cluster endpoint: {}", config.rpc.url);

    let wallet = if config.wallet.ephemeral {
        info!("🔑 Generating ephemeral fee payer");
        WalletManager::generate()
    } else {
        let path = config
            .wallet
            .keypair_path
            .as_deref()
            .context("wallet.keypair_path required when wallet.ephemeral = false")?;
        info!("🔑 Loading fee payer from: {}", path);
        WalletManager::from_file(path).context("Failed to load wallet")?
    };
    info!("💼 Fee payer address: {}", wallet.pubkey());

    let deadline = Duration::from_secs(config.rpc.confirm_timeout_secs);

    if config.airdrop.enabled {
        let balance = ctx.balance(&wallet.pubkey()).await?;
        if balance < config.airdrop.lamports {
            info!(
                "💧 Balance {} below target, requesting {} lamports from faucet",
                balance, config.airdrop.lamports
            );
            provision::airdrop(&ctx, &wallet.pubkey(), config.airdrop.lamports, deadline).await?;
        }
    }

    // Each transaction below fetches its own fresh lifetime anchor.
    let mint = Keypair::new();
    let receipt = provision::create_mint(
        &ctx,
        wallet.keypair(),
        &mint,
        config.mint.decimals,
        &wallet.pubkey(),
        deadline,
    )
    .await?;
    info!("🪙 Mint address: {}", mint.pubkey());
    info!("   Signature: {}", receipt.signature);

    let token_account = if config.mint.token_account {
        if config.mint.associated {
            let (address, receipt) = provision::create_associated_token_account(
                &ctx,
                wallet.keypair(),
                &wallet.pubkey(),
                &mint.pubkey(),
                deadline,
            )
            .await?;
            info!("💳 Associated token account: {}", address);
            info!("   Signature: {}", receipt.signature);
            Some(address)
        } else {
            let account = Keypair::new();
            let receipt = provision::create_token_account(
                &ctx,
                wallet.keypair(),
                &account,
                &mint.pubkey(),
                &wallet.pubkey(),
                deadline,
            )
            .await?;
            info!("💳 Token account: {}", account.pubkey());
            info!("   Signature: {}", receipt.signature);
            Some(account.pubkey())
        }
    } else {
        None
    };

    if config.mint.initial_supply > 0 {
        match token_account {
            Some(destination) => {
                let receipt = provision::mint_to(
                    &ctx,
                    wallet.keypair(),
                    &mint.pubkey(),
                    &destination,
                    wallet.keypair(),
                    config.mint.initial_supply,
                    deadline,
                )
                .await?;
                info!(
                    "💰 Minted {} base units, signature: {}",
                    config.mint.initial_supply, receipt.signature
                );
            }
            None => warn!("initial_supply set but token account creation is disabled, skipping"),
        }
    }

    info!("✅ Provisioning complete");
    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "minter=debug,info"
    } else {
        "minter=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}
