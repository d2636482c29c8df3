//! Ledger access and balance discovery.
//!
//! [`BalanceDiscovery`] turns a wallet address into the list of non-zero
//! fungible balances it owns. The ledger itself is reached through the
//! [`LedgerClient`] trait; [`SolanaRpcClient`] is the JSON-RPC implementation.

mod address;
mod discovery_service;
mod ledger_model;
mod ledger_traits;
mod rpc_client;

#[cfg(test)]
mod discovery_service_tests;

pub use address::WalletAddress;
pub use discovery_service::{BalanceDiscovery, DiscoveryConfig};
pub use ledger_model::{to_display_units, DiscoveredBalances, TokenAccountBalance};
pub use ledger_traits::LedgerClient;
pub use rpc_client::{SolanaRpcClient, DEFAULT_RPC_URL};
