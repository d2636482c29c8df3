//! Market data resolution through the rate-limited queue.
//!
//! [`MarketDataResolver`] is the only entry point the portfolio layer uses
//! for prices. It pushes one provider call per asset onto the shared
//! [`RequestQueue`] and folds every failure into a [`MarketLookup`], so
//! callers never see a raw transport error.

use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{MarketData, MarketLookup};
use crate::provider::TokenInfoProvider;
use crate::queue::{QueueError, RequestQueue};

/// Resolves asset identifiers to market data, one queued lookup per call.
#[derive(Clone)]
pub struct MarketDataResolver {
    provider: Arc<dyn TokenInfoProvider>,
    queue: RequestQueue,
}

impl MarketDataResolver {
    pub fn new(provider: Arc<dyn TokenInfoProvider>, queue: RequestQueue) -> Self {
        Self { provider, queue }
    }

    /// Queue a lookup for `asset_id` and return a future for its outcome.
    ///
    /// The lookup is on the queue when this returns, so lookups submitted
    /// in a loop run in loop order. Dropping the returned future before the
    /// lookup starts removes it from the queue.
    pub fn submit(&self, asset_id: &str) -> impl Future<Output = MarketLookup> + Send + 'static {
        let provider = Arc::clone(&self.provider);
        let asset_id = asset_id.to_string();
        let task_asset_id = asset_id.clone();

        let ticket = self
            .queue
            .submit(move || async move { provider.fetch_token_info(&task_asset_id).await });

        async move { settle(&asset_id, ticket.await) }
    }

    /// Look up market data for a single asset.
    pub async fn resolve(&self, asset_id: &str) -> MarketLookup {
        self.submit(asset_id).await
    }

    /// The queue shared by every lookup of this resolver.
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }
}

fn settle(
    asset_id: &str,
    outcome: Result<Result<Option<MarketData>, MarketDataError>, QueueError>,
) -> MarketLookup {
    match outcome.map_err(MarketDataError::from) {
        Ok(Ok(Some(data))) => {
            debug!("Resolved {} as {} at ${}", asset_id, data.symbol, data.price_usd);
            MarketLookup::Found(data)
        }
        Ok(Ok(None)) => {
            debug!("No trading pair listed for {}", asset_id);
            MarketLookup::NoLiquidity
        }
        Ok(Err(e)) | Err(e) => {
            warn!("Market data lookup failed for {}: {}", asset_id, e);
            MarketLookup::NotFound
        }
    }
}
