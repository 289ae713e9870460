//! Rent calculation for newly created accounts
//!
//! Account sizes here must match the byte layout the token program expects
//! exactly. A wrong size does not fail locally: the create-account
//! instruction succeeds and the following initialize instruction fails
//! on-chain.

use solana_sdk::program_pack::Pack;
use spl_token::state::{Account, Mint};

use crate::cluster::ClusterContext;
use crate::tx_builder::errors::ProvisionError;

/// Byte size of an SPL mint account.
pub fn mint_account_size() -> usize {
    Mint::LEN
}

/// Byte size of an SPL token account.
pub fn token_account_size() -> usize {
    Account::LEN
}

/// Minimum balance that exempts an account of `size` bytes from rent.
///
/// Queries the cluster; no retries here, a network failure propagates
/// unchanged in meaning.
pub async fn minimum_balance(
    ctx: &ClusterContext,
    size: usize,
) -> Result<u64, ProvisionError> {
    ctx.minimum_balance_for_rent_exemption(size).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes_match_spl_token() {
        // Fixed by the token program's state layout.
        assert_eq!(mint_account_size(), 82);
        assert_eq!(token_account_size(), 165);
    }
}
