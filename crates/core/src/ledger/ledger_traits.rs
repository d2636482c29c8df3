use async_trait::async_trait;

use super::address::WalletAddress;
use super::ledger_model::TokenAccountBalance;
use crate::errors::LedgerError;

/// Read-only access to wallet balances on the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Native balance in base units (lamports).
    async fn get_native_balance(&self, owner: &WalletAddress) -> Result<u64, LedgerError>;

    /// Every token account of `program_id` owned by `owner`, zero balances included.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &WalletAddress,
        program_id: &str,
    ) -> Result<Vec<TokenAccountBalance>, LedgerError>;
}
