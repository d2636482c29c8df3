use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use rust_decimal::Decimal;

use super::address::WalletAddress;
use super::ledger_model::{to_display_units, DiscoveredBalances, TokenAccountBalance};
use super::ledger_traits::LedgerClient;
use crate::constants::{NATIVE_DECIMALS, NATIVE_MINT, SPL_TOKEN_PROGRAM_ID};
use crate::errors::Result;
use crate::holdings::RawHolding;

/// Discovery options.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Prepend native SOL as a pseudo-holding keyed by the wrapped SOL mint.
    /// Off by default: the native balance is reported on its own.
    pub include_native_holding: bool,
}

/// Reads the fungible balances owned by a wallet.
pub struct BalanceDiscovery {
    client: Arc<dyn LedgerClient>,
    config: DiscoveryConfig,
}

impl BalanceDiscovery {
    pub fn new(client: Arc<dyn LedgerClient>, config: DiscoveryConfig) -> Self {
        Self { client, config }
    }

    /// Validate `address` and return its non-zero balances.
    ///
    /// Token accounts sharing a mint are summed into one holding. Zero
    /// balances are dropped. A ledger failure fails the whole discovery.
    pub async fn discover(&self, address: &str) -> Result<DiscoveredBalances> {
        let owner = WalletAddress::parse(address)?;
        self.discover_owner(&owner).await
    }

    pub async fn discover_owner(&self, owner: &WalletAddress) -> Result<DiscoveredBalances> {
        let (lamports, accounts) = futures::try_join!(
            self.client.get_native_balance(owner),
            self.client
                .get_token_accounts_by_owner(owner, SPL_TOKEN_PROGRAM_ID),
        )?;

        let native_balance = to_display_units(lamports, NATIVE_DECIMALS);
        debug!(
            "Ledger returned {} SOL and {} token accounts for {}",
            native_balance,
            accounts.len(),
            owner
        );

        let native = (self.config.include_native_holding && !native_balance.is_zero())
            .then(|| RawHolding::new(NATIVE_MINT, native_balance, NATIVE_DECIMALS));
        let holdings = merge_accounts(native, &accounts);

        info!("Discovered {} holdings for {}", holdings.len(), owner);
        Ok(DiscoveredBalances {
            native_balance,
            holdings,
        })
    }
}

/// Collapse accounts into one holding per mint, in first-seen order.
///
/// The native pseudo-holding, when present, comes first and absorbs any
/// wrapped SOL token account.
fn merge_accounts(native: Option<RawHolding>, accounts: &[TokenAccountBalance]) -> Vec<RawHolding> {
    let mut holdings: Vec<RawHolding> = Vec::with_capacity(accounts.len() + 1);
    let mut index: HashMap<String, usize> = HashMap::new();

    if let Some(native) = native {
        index.insert(native.asset_id.clone(), 0);
        holdings.push(native);
    }

    for account in accounts {
        let quantity = account.quantity();
        if quantity.is_zero() {
            continue;
        }
        match index.get(&account.mint) {
            Some(&slot) => {
                let merged = &mut holdings[slot].quantity;
                *merged = merged.saturating_add(quantity);
            }
            None => {
                index.insert(account.mint.clone(), holdings.len());
                holdings.push(RawHolding::new(
                    account.mint.clone(),
                    quantity,
                    account.decimals,
                ));
            }
        }
    }

    holdings.retain(|holding| holding.quantity > Decimal::ZERO);
    holdings
}
