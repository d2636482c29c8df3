//! Wallet holdings as discovered on the ledger and enriched with market data.

mod holdings_model;

pub use holdings_model::{Holding, RawHolding};
