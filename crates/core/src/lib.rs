//! Walletlens Core - wallet discovery, market enrichment and risk scoring.
//!
//! The entry point is [`PortfolioAggregator`]: it validates an address,
//! discovers its balances through a [`ledger::LedgerClient`], enriches each
//! holding through the rate-limited market data resolver, and publishes a
//! [`PortfolioSnapshot`] after every merge.

pub mod constants;
pub mod errors;
pub mod filters;
pub mod holdings;
pub mod ledger;
pub mod portfolio;
pub mod risk;
pub mod utils;

pub use holdings::{Holding, RawHolding};
pub use portfolio::*;
pub use risk::{RiskSummary, RiskTier, TierExposure};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
