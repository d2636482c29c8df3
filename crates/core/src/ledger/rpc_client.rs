//! JSON-RPC ledger client.
//!
//! Speaks the standard Solana JSON-RPC over HTTP: `getBalance` for the native
//! balance and `getTokenAccountsByOwner` (jsonParsed) for SPL token accounts.
//! Providers such as Helius take their key as an `api-key` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::address::WalletAddress;
use super::ledger_model::TokenAccountBalance;
use super::ledger_traits::LedgerClient;
use crate::errors::LedgerError;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.helius-rpc.com/";

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ "context": ..., "value": T }` wrapper used by most ledger methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct KeyedAccount {
    account: AccountEnvelope,
}

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedTokenInfo {
    mint: String,
    token_amount: TokenAmount,
}

#[derive(Debug, Deserialize)]
struct TokenAmount {
    amount: String,
    decimals: u8,
}

/// Ledger client over HTTP JSON-RPC.
pub struct SolanaRpcClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl SolanaRpcClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        debug!("RPC {} -> {}", method, self.url);

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api-key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LedgerError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_rpc_response(&text)
    }
}

/// Unwrap a JSON-RPC envelope into its result.
fn parse_rpc_response<T: DeserializeOwned>(body: &str) -> Result<T, LedgerError> {
    let response: RpcResponse<T> = serde_json::from_str(body)
        .map_err(|e| LedgerError::InvalidResponse(format!("Malformed JSON-RPC body: {}", e)))?;

    if let Some(error) = response.error {
        return Err(LedgerError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    response
        .result
        .ok_or_else(|| LedgerError::InvalidResponse("Response has neither result nor error".to_string()))
}

/// Decode the jsonParsed token accounts of a `getTokenAccountsByOwner` result.
///
/// Accounts that are not parsed SPL token accounts are skipped.
fn parse_token_accounts(accounts: Vec<KeyedAccount>) -> Result<Vec<TokenAccountBalance>, LedgerError> {
    let mut balances = Vec::with_capacity(accounts.len());

    for keyed in accounts {
        let Some(info) = keyed.account.data.pointer("/parsed/info") else {
            debug!("Skipping token account without parsed data");
            continue;
        };

        let info: ParsedTokenInfo = serde_json::from_value(info.clone())
            .map_err(|e| LedgerError::InvalidResponse(format!("Bad token account: {}", e)))?;
        let raw_amount = info.token_amount.amount.parse::<u64>().map_err(|e| {
            LedgerError::InvalidResponse(format!(
                "Bad token amount '{}' for {}: {}",
                info.token_amount.amount, info.mint, e
            ))
        })?;

        balances.push(TokenAccountBalance {
            mint: info.mint,
            raw_amount,
            decimals: info.token_amount.decimals,
        });
    }

    Ok(balances)
}

#[async_trait]
impl LedgerClient for SolanaRpcClient {
    async fn get_native_balance(&self, owner: &WalletAddress) -> Result<u64, LedgerError> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([owner.to_string(), { "commitment": "confirmed" }]),
            )
            .await?;
        Ok(balance.value)
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &WalletAddress,
        program_id: &str,
    ) -> Result<Vec<TokenAccountBalance>, LedgerError> {
        let accounts: WithContext<Vec<KeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "programId": program_id },
                    { "encoding": "jsonParsed", "commitment": "confirmed" }
                ]),
            )
            .await?;
        parse_token_accounts(accounts.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN_ACCOUNTS: &str = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "context": { "slot": 250000000 },
            "value": [
                {
                    "pubkey": "4Qkev8aNZcqFNSRhQzwyLMFSsi94jHqE8WNVTJzTP99F",
                    "account": {
                        "lamports": 2039280,
                        "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                        "data": {
                            "program": "spl-token",
                            "parsed": {
                                "type": "account",
                                "info": {
                                    "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                                    "owner": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
                                    "tokenAmount": {
                                        "amount": "2500000",
                                        "decimals": 6,
                                        "uiAmount": 2.5,
                                        "uiAmountString": "2.5"
                                    }
                                }
                            },
                            "space": 165
                        }
                    }
                },
                {
                    "pubkey": "83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri",
                    "account": {
                        "data": ["AAAA", "base64"]
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_balance() {
        let body = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":1500000000}}"#;
        let balance: WithContext<u64> = parse_rpc_response(body).unwrap();
        assert_eq!(balance.value, 1_500_000_000);
    }

    #[test]
    fn test_parse_token_accounts_skips_unparsed() {
        let accounts: WithContext<Vec<KeyedAccount>> = parse_rpc_response(TOKEN_ACCOUNTS).unwrap();
        let balances = parse_token_accounts(accounts.value).unwrap();
        assert_eq!(
            balances,
            vec![TokenAccountBalance {
                mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
                raw_amount: 2_500_000,
                decimals: 6,
            }]
        );
    }

    #[test]
    fn test_parse_rpc_error() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"Invalid param: WrongSize"}}"#;
        let err = parse_rpc_response::<WithContext<u64>>(body).unwrap_err();
        assert!(matches!(err, LedgerError::Rpc { code: -32602, .. }));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_rpc_response::<WithContext<u64>>("<html>502</html>").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidResponse(_)));

        let err = parse_rpc_response::<WithContext<u64>>(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidResponse(_)));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let client = SolanaRpcClient::new(DEFAULT_RPC_URL, Some("  ".to_string()));
        assert!(client.api_key.is_none());
    }
}
