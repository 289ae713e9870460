//! Configuration module for the minter
//!
//! This module handles all configuration loading from TOML files,
//! environment variables, and provides structured configuration types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Dev/test faucet configuration
    #[serde(default)]
    pub airdrop: AirdropConfig,

    /// Mint provisioning configuration
    #[serde(default)]
    pub mint: MintConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Confirmation deadline per transaction, in seconds
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,

    /// Commitment level to submit and confirm at
    /// (processed | confirmed | finalized)
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file; ignored when `ephemeral` is set
    #[serde(default)]
    pub keypair_path: Option<String>,

    /// Generate a throwaway fee payer instead of loading one
    #[serde(default = "default_true")]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropConfig {
    /// Request an airdrop when the payer balance is below `lamports`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Airdrop amount in lamports
    #[serde(default = "default_airdrop_lamports")]
    pub lamports: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintConfig {
    /// Decimal places of the new mint
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Create a token account for the new mint
    #[serde(default = "default_true")]
    pub token_account: bool,

    /// Use an associated token account instead of a fresh keypair account
    #[serde(default)]
    pub associated: bool,

    /// Base units to mint into the token account after creation (0 = skip)
    #[serde(default)]
    pub initial_supply: u64,
}

// Default value functions
fn default_rpc_timeout() -> u64 {
    30
}
fn default_confirm_timeout() -> u64 {
    60
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_airdrop_lamports() -> u64 {
    1_000_000_000
}
fn default_decimals() -> u8 {
    9
}
fn default_true() -> bool {
    true
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: None,
            ephemeral: true,
        }
    }
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lamports: default_airdrop_lamports(),
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            token_account: true,
            associated: false,
            initial_supply: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                url: "http://localhost:8899".to_string(),
                timeout_secs: default_rpc_timeout(),
                confirm_timeout_secs: default_confirm_timeout(),
                commitment: default_commitment(),
            },
            wallet: WalletConfig::default(),
            airdrop: AirdropConfig::default(),
            mint: MintConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    /// Parsed commitment level, falling back to `confirmed` on junk input
    pub fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig::from_str(&self.rpc.commitment)
            .unwrap_or_else(|_| CommitmentConfig::confirmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::commitment_config::CommitmentLevel;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mint.decimals, 9);
        assert!(config.airdrop.enabled);
        assert!(config.wallet.ephemeral);
        assert_eq!(config.commitment().commitment, CommitmentLevel::Confirmed);
    }

    #[test]
    fn test_from_file_with_partial_sections() {
        let toml = r#"
            [rpc]
            url = "http://localhost:8899"

            [mint]
            decimals = 2
            initial_supply = 1000
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.mint.decimals, 2);
        assert_eq!(config.mint.initial_supply, 1000);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.rpc.timeout_secs, 30);
        assert!(config.airdrop.enabled);
    }

    #[test]
    fn test_commitment_parsing() {
        let mut config = Config::default();
        config.rpc.commitment = "finalized".to_string();
        assert_eq!(config.commitment().commitment, CommitmentLevel::Finalized);

        config.rpc.commitment = "not-a-level".to_string();
        assert_eq!(config.commitment().commitment, CommitmentLevel::Confirmed);
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let rendered = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.rpc.url, config.rpc.url);
        assert_eq!(parsed.mint.decimals, config.mint.decimals);
    }
}
