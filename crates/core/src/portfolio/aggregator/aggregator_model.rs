use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::constants::DEFAULT_QUERY_TIMEOUT_SECS;
use crate::errors::Error;
use crate::portfolio::snapshot::PortfolioSnapshot;

/// Aggregator options.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Overall deadline for discovery plus enrichment.
    pub query_timeout: Duration,
    /// Report native SOL as a holding keyed by the wrapped SOL mint.
    pub include_native_holding: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            include_native_holding: false,
        }
    }
}

/// Category of a terminal query failure shown to the user.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    InvalidAddress,
    DiscoveryFailed,
    Unexpected,
}

impl From<&Error> for FailureKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::InvalidAddress { .. } => FailureKind::InvalidAddress,
            Error::DiscoveryFailed(_) => FailureKind::DiscoveryFailed,
            _ => FailureKind::Unexpected,
        }
    }
}

/// Lifecycle of the current query.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum QueryStatus {
    /// No query has been started.
    Idle,
    /// Enrichments are still settling.
    Loading,
    /// Every enrichment settled.
    Complete,
    /// The deadline elapsed with enrichments outstanding.
    Partial,
    Failed { kind: FailureKind, message: String },
}

/// The observable state of the aggregator.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    /// Generation of the query this state belongs to. 0 before any query.
    pub generation: u64,
    pub address: Option<String>,
    pub status: QueryStatus,
    /// `None` until the query publishes its first snapshot.
    pub snapshot: Option<Arc<PortfolioSnapshot>>,
}

impl QueryState {
    pub fn idle() -> Self {
        Self {
            generation: 0,
            address: None,
            status: QueryStatus::Idle,
            snapshot: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Whether the query has stopped producing updates.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            QueryStatus::Complete | QueryStatus::Partial | QueryStatus::Failed { .. }
        )
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::idle()
    }
}
