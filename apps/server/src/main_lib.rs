use std::sync::Arc;

use crate::config::{Config, LogFormat};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use walletlens_core::{
    ledger::{LedgerClient, SolanaRpcClient},
    AggregatorConfig, PortfolioAggregator,
};
use walletlens_market_data::{
    DexScreenerProvider, MarketDataResolver, QueueConfig, RequestQueue, TokenInfoProvider,
};

pub struct AppState {
    pub aggregator: Arc<PortfolioAggregator>,
    pub resolver: MarketDataResolver,
}

impl AppState {
    /// Assemble the state from explicit ledger and market data backends.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        provider: Arc<dyn TokenInfoProvider>,
        config: &Config,
    ) -> Arc<Self> {
        let queue = RequestQueue::with_config(QueueConfig {
            request_delay: config.request_delay,
        });
        let resolver = MarketDataResolver::new(provider, queue);
        let aggregator = PortfolioAggregator::new(
            ledger,
            resolver.clone(),
            AggregatorConfig {
                query_timeout: config.query_timeout,
                include_native_holding: config.include_native_holding,
            },
        );

        Arc::new(Self {
            aggregator: Arc::new(aggregator),
            resolver,
        })
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tracing::info!("Ledger RPC endpoint: {}", config.rpc_url);
    if config.rpc_api_key.is_none() {
        tracing::warn!("WL_RPC_API_KEY is not set; the RPC endpoint may reject requests");
    }

    let ledger: Arc<dyn LedgerClient> = Arc::new(SolanaRpcClient::new(
        config.rpc_url.clone(),
        config.rpc_api_key.clone(),
    ));
    let provider: Arc<dyn TokenInfoProvider> =
        Arc::new(DexScreenerProvider::with_base_url(config.market_data_url.clone()));

    let state = AppState::new(ledger, provider, config);
    tracing::info!(
        "Market data via {} every {:?}, query deadline {:?}",
        state.resolver.provider_id(),
        state.resolver.queue().delay(),
        config.query_timeout
    );
    Ok(state)
}
