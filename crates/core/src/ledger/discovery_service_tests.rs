use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::*;
use crate::constants::{NATIVE_MINT, SPL_TOKEN_PROGRAM_ID, USDC_MINT};
use crate::errors::{Error, LedgerError};
use crate::holdings::RawHolding;

const OWNER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

#[derive(Default)]
struct MockLedgerClient {
    lamports: u64,
    accounts: Vec<TokenAccountBalance>,
    fail: bool,
    calls: Mutex<usize>,
}

impl MockLedgerClient {
    fn with_account(mut self, mint: &str, raw_amount: u64, decimals: u8) -> Self {
        self.accounts.push(TokenAccountBalance {
            mint: mint.to_string(),
            raw_amount,
            decimals,
        });
        self
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn get_native_balance(&self, _owner: &WalletAddress) -> Result<u64, LedgerError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(LedgerError::HttpStatus {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.lamports)
    }

    async fn get_token_accounts_by_owner(
        &self,
        _owner: &WalletAddress,
        program_id: &str,
    ) -> Result<Vec<TokenAccountBalance>, LedgerError> {
        *self.calls.lock().unwrap() += 1;
        assert_eq!(program_id, SPL_TOKEN_PROGRAM_ID);
        if self.fail {
            return Err(LedgerError::Rpc {
                code: -32000,
                message: "node is behind".to_string(),
            });
        }
        Ok(self.accounts.clone())
    }
}

fn discovery(client: MockLedgerClient, include_native_holding: bool) -> (BalanceDiscovery, Arc<MockLedgerClient>) {
    let client = Arc::new(client);
    let discovery = BalanceDiscovery::new(
        Arc::clone(&client) as Arc<dyn LedgerClient>,
        DiscoveryConfig {
            include_native_holding,
        },
    );
    (discovery, client)
}

#[tokio::test]
async fn test_discover_converts_and_drops_zero_balances() {
    let (discovery, _) = discovery(
        MockLedgerClient::default()
            .with_account(USDC_MINT, 2_500_000, 6)
            .with_account(BONK, 0, 5)
            .with_account("83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri", 7, 0),
        false,
    );

    let balances = discovery.discover(OWNER).await.unwrap();
    assert_eq!(balances.native_balance, dec!(0));
    assert_eq!(
        balances.holdings,
        vec![
            RawHolding::new(USDC_MINT, dec!(2.5), 6),
            RawHolding::new("83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri", dec!(7), 0),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_mints_are_summed() {
    let (discovery, _) = discovery(
        MockLedgerClient::default()
            .with_account(BONK, 100_000, 5)
            .with_account(USDC_MINT, 1_000_000, 6)
            .with_account(BONK, 50_000, 5),
        false,
    );

    let balances = discovery.discover(OWNER).await.unwrap();
    assert_eq!(
        balances.holdings,
        vec![
            RawHolding::new(BONK, dec!(1.5), 5),
            RawHolding::new(USDC_MINT, dec!(1), 6),
        ]
    );
}

#[tokio::test]
async fn test_native_holding_goes_first_and_absorbs_wrapped_sol() {
    let client = MockLedgerClient {
        lamports: 1_500_000_000,
        ..Default::default()
    }
    .with_account(USDC_MINT, 1_000_000, 6)
    .with_account(NATIVE_MINT, 500_000_000, 9);
    let (discovery, _) = discovery(client, true);

    let balances = discovery.discover(OWNER).await.unwrap();
    assert_eq!(balances.native_balance, dec!(1.5));
    assert_eq!(
        balances.holdings,
        vec![
            RawHolding::new(NATIVE_MINT, dec!(2), 9),
            RawHolding::new(USDC_MINT, dec!(1), 6),
        ]
    );
}

#[tokio::test]
async fn test_zero_native_balance_is_not_a_holding() {
    let (discovery, _) = discovery(MockLedgerClient::default().with_account(USDC_MINT, 1, 0), true);
    let balances = discovery.discover(OWNER).await.unwrap();
    assert_eq!(balances.holdings, vec![RawHolding::new(USDC_MINT, dec!(1), 0)]);
}

#[tokio::test]
async fn test_native_holding_can_be_disabled() {
    let client = MockLedgerClient {
        lamports: 1_000_000_000,
        ..Default::default()
    };
    let (discovery, _) = discovery(client, false);

    let balances = discovery.discover(OWNER).await.unwrap();
    assert_eq!(balances.native_balance, dec!(1));
    assert!(balances.holdings.is_empty());
}

#[tokio::test]
async fn test_invalid_address_never_reaches_the_ledger() {
    let (discovery, client) = discovery(MockLedgerClient::default(), true);

    let err = discovery.discover("not-a-wallet").await.unwrap_err();
    assert!(matches!(err, Error::InvalidAddress { .. }));
    assert_eq!(*client.calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_ledger_failure_is_discovery_failure() {
    let client = MockLedgerClient {
        fail: true,
        ..Default::default()
    };
    let (discovery, _) = discovery(client, true);

    let err = discovery.discover(OWNER).await.unwrap_err();
    assert!(matches!(err, Error::DiscoveryFailed(_)));
}
