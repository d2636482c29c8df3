//! Portfolio queries: discovery, enrichment and progressive snapshots.

pub mod aggregator;
pub mod snapshot;

pub use aggregator::*;
pub use snapshot::PortfolioSnapshot;
