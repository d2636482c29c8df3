//! Data models for the market data crate.

mod market_data;

pub use market_data::{MarketData, MarketLookup};
