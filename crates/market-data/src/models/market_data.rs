use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market metadata for a single fungible asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub symbol: String,
    pub name: String,
    pub logo_url: Option<String>,
    /// USD price of one display unit.
    pub price_usd: Decimal,
    pub market_cap_usd: Option<Decimal>,
    /// Link to the asset's market page.
    pub url: Option<String>,
}

/// Outcome of resolving one asset's market data.
///
/// `NotFound` and `NoLiquidity` are both treated as a miss by the portfolio
/// aggregator today, but they describe different situations and are kept apart.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketLookup {
    /// The provider returned a usable trading pair.
    Found(MarketData),
    /// The provider answered but lists no trading pair for the asset.
    NoLiquidity,
    /// The lookup failed (transport, HTTP status or unparsable payload).
    NotFound,
}

impl MarketLookup {
    /// Returns the market data if the lookup succeeded.
    pub fn into_market_data(self) -> Option<MarketData> {
        match self {
            MarketLookup::Found(data) => Some(data),
            MarketLookup::NoLiquidity | MarketLookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MarketLookup::Found(_))
    }
}
