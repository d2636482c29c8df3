use std::collections::HashSet;

use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;

use super::snapshot_model::PortfolioSnapshot;
use crate::holdings::Holding;
use crate::risk::summarize;

/// Mutable snapshot state owned by a single running query.
///
/// Only grows: holdings are appended, never removed or reordered. Totals are
/// not stored here; [`SnapshotBuilder::build`] derives them from the full set.
#[derive(Debug)]
pub(crate) struct SnapshotBuilder {
    address: String,
    generation: u64,
    native_balance: Decimal,
    holdings: Vec<Holding>,
    seen: HashSet<String>,
    dropped: usize,
    pending: usize,
}

impl SnapshotBuilder {
    pub(crate) fn new(address: String, generation: u64, native_balance: Decimal, pending: usize) -> Self {
        Self {
            address,
            generation,
            native_balance,
            holdings: Vec::with_capacity(pending),
            seen: HashSet::with_capacity(pending),
            dropped: 0,
            pending,
        }
    }

    /// Append an enriched holding. Returns false for an asset already merged.
    pub(crate) fn merge(&mut self, holding: Holding) -> bool {
        self.pending = self.pending.saturating_sub(1);
        if !self.seen.insert(holding.asset_id().to_string()) {
            debug!("Ignoring duplicate merge for {}", holding.asset_id());
            return false;
        }
        self.holdings.push(holding);
        true
    }

    /// Settle an enrichment that produced no market data.
    pub(crate) fn record_miss(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        self.dropped += 1;
    }

    /// Give up on every unsettled enrichment, counting each as dropped.
    pub(crate) fn abandon_pending(&mut self) -> usize {
        let abandoned = self.pending;
        self.dropped += abandoned;
        self.pending = 0;
        abandoned
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    pub(crate) fn build(&self) -> PortfolioSnapshot {
        let summary = summarize(&self.holdings);
        PortfolioSnapshot {
            address: self.address.clone(),
            generation: self.generation,
            native_balance: self.native_balance,
            holdings: self.holdings.clone(),
            total_value_usd: summary.total_value_usd,
            risk_score: summary.risk_score,
            risk_breakdown: summary.breakdown,
            dropped_count: self.dropped,
            pending_count: self.pending,
            captured_at: Utc::now(),
        }
    }
}
