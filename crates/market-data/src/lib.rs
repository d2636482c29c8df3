//! Walletlens Market Data Crate
//!
//! This crate fetches token market data (price, market cap, logo, market
//! page) for the walletlens portfolio pipeline.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |    Aggregator    |  (walletlens-core, one lookup per holding)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |     Resolver     |  (failures folded into MarketLookup)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   RequestQueue   |  (FIFO, one task at a time, fixed delay)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |     Provider     |  (DexScreener)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`RequestQueue`] - Shared rate-limited FIFO task queue
//! - [`MarketDataResolver`] - Queue-backed lookup returning [`MarketLookup`]
//! - [`TokenInfoProvider`] - Provider abstraction
//! - [`MarketData`] - Market metadata for one asset

pub mod errors;
pub mod models;
pub mod provider;
pub mod queue;
pub mod resolver;

pub use errors::MarketDataError;
pub use models::{MarketData, MarketLookup};
pub use provider::dexscreener::DexScreenerProvider;
pub use provider::TokenInfoProvider;
pub use queue::{
    QueueConfig, QueueError, QueueState, QueueTicket, RequestQueue, DEFAULT_REQUEST_DELAY,
};
pub use resolver::MarketDataResolver;
