use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::holdings::Holding;
use crate::risk::TierExposure;

/// An immutable view of a wallet's enriched holdings at one point of a query.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub address: String,
    /// Query generation that produced this snapshot.
    pub generation: u64,
    /// Native balance in SOL, independent of the holding list.
    pub native_balance: Decimal,
    /// Enriched holdings in merge order, one per asset id.
    pub holdings: Vec<Holding>,
    pub total_value_usd: Decimal,
    pub risk_score: Decimal,
    pub risk_breakdown: Vec<TierExposure>,
    /// Holdings left out because their market data could not be resolved.
    pub dropped_count: usize,
    /// Enrichments not yet settled.
    pub pending_count: usize,
    pub captured_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn holding(&self, asset_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.asset_id() == asset_id)
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// True once no enrichment is outstanding.
    pub fn is_settled(&self) -> bool {
        self.pending_count == 0
    }

    /// The `n` most valuable holdings, highest first. Ties keep merge order.
    pub fn top_holdings_by_value(&self, n: usize) -> Vec<&Holding> {
        let mut ranked: Vec<&Holding> = self.holdings.iter().collect();
        ranked.sort_by(|a, b| b.value_usd().cmp(&a.value_usd()));
        ranked.truncate(n);
        ranked
    }
}
