//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `TokenInfoProvider` trait that all providers implement
//! - The DexScreener implementation used in production
//!
//! Providers perform exactly one network lookup per call and know nothing
//! about rate limiting. Scheduling is the job of the
//! [`RequestQueue`](crate::queue::RequestQueue), which the resolver wraps
//! around every provider call.

mod traits;

pub mod dexscreener;

// Re-exports
pub use traits::TokenInfoProvider;
