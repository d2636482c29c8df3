//! DexScreener API response structures.

use serde::Deserialize;

/// Response from `/latest/dex/tokens/{address}`.
#[derive(Debug, Deserialize)]
pub(super) struct TokensResponse {
    /// Trading pairs for the token, `null` when the token is unknown.
    #[serde(default)]
    pub pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Pair {
    pub base_token: BaseToken,
    #[serde(default)]
    pub info: Option<PairInfo>,
    /// USD price as a decimal string.
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    // Note: chainId, dexId, pairAddress, liquidity, volume, fdv exist but are not used
}

#[derive(Debug, Deserialize)]
pub(super) struct BaseToken {
    pub symbol: String,
    pub name: String,
    // Note: address is the queried mint and is not needed
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
}
