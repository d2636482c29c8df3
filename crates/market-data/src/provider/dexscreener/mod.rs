//! DexScreener market data provider implementation.
//!
//! Looks up DEX trading pairs for a token mint via
//! `GET /latest/dex/tokens/{address}`. The endpoint needs no API key but is
//! rate limited per IP, which is why every call goes through the request queue.
//! API documentation: https://docs.dexscreener.com/api/reference

mod models;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::MarketData;
use crate::provider::TokenInfoProvider;

use models::{Pair, TokensResponse};

/// Default DexScreener token endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com/latest/dex/tokens";
const PROVIDER_ID: &str = "DEXSCREENER";

/// DexScreener market data provider.
pub struct DexScreenerProvider {
    client: Client,
    base_url: String,
}

impl DexScreenerProvider {
    /// Create a provider pointed at the public DexScreener API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider pointed at a custom token endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request for one token and return the raw body.
    async fn fetch(&self, asset_id: &str) -> Result<String, MarketDataError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(asset_id));
        debug!("DexScreener request: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }
}

impl Default for DexScreenerProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a token response body, keeping only the first pair.
pub(crate) fn parse_tokens_response(body: &str) -> Result<Option<MarketData>, MarketDataError> {
    let response: TokensResponse =
        serde_json::from_str(body).map_err(|e| invalid_response(format!("Malformed JSON: {}", e)))?;

    match response.pairs.and_then(|pairs| pairs.into_iter().next()) {
        Some(pair) => pair_to_market_data(pair).map(Some),
        None => Ok(None),
    }
}

fn pair_to_market_data(pair: Pair) -> Result<MarketData, MarketDataError> {
    let raw_price = pair
        .price_usd
        .ok_or_else(|| invalid_response("Pair has no priceUsd".to_string()))?;
    let price_usd = parse_price(&raw_price)
        .ok_or_else(|| invalid_response(format!("Unparsable priceUsd '{}'", raw_price)))?;

    Ok(MarketData {
        symbol: pair.base_token.symbol,
        name: pair.base_token.name,
        logo_url: pair.info.and_then(|info| info.image_url),
        price_usd,
        market_cap_usd: pair.market_cap.and_then(Decimal::from_f64_retain),
        url: pair.url,
    })
}

/// Parse a USD price string. Accepts plain and scientific notation.
fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    (!price.is_sign_negative()).then_some(price)
}

fn invalid_response(message: String) -> MarketDataError {
    MarketDataError::InvalidResponse {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

#[async_trait]
impl TokenInfoProvider for DexScreenerProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_token_info(
        &self,
        asset_id: &str,
    ) -> Result<Option<MarketData>, MarketDataError> {
        let body = self.fetch(asset_id).await?;
        parse_tokens_response(&body)
    }
}
