//! Market data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::MarketData;

/// Trait for token market data providers.
///
/// Implement this trait to add support for a new market data source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use walletlens_market_data::{MarketData, MarketDataError, TokenInfoProvider};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl TokenInfoProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn fetch_token_info(
///         &self,
///         asset_id: &str,
///     ) -> Result<Option<MarketData>, MarketDataError> {
///         // ... one request for `asset_id`
///     }
/// }
/// ```
#[async_trait]
pub trait TokenInfoProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch market data for one asset.
    ///
    /// # Arguments
    ///
    /// * `asset_id` - The on-chain mint address of the asset
    ///
    /// # Returns
    ///
    /// `Ok(Some(_))` with the first trading pair's data, `Ok(None)` when the
    /// provider lists no pair for the asset, or a `MarketDataError` when the
    /// lookup itself failed.
    async fn fetch_token_info(&self, asset_id: &str)
        -> Result<Option<MarketData>, MarketDataError>;
}
