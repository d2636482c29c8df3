use std::sync::{Arc, Mutex, MutexGuard};

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{timeout_at, Instant};
use walletlens_market_data::MarketDataResolver;

use super::aggregator_model::{AggregatorConfig, FailureKind, QueryState, QueryStatus};
use crate::errors::{Error, LedgerError, Result};
use crate::holdings::Holding;
use crate::ledger::{BalanceDiscovery, DiscoveryConfig, LedgerClient, WalletAddress};
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotBuilder};

/// A query running in the background.
pub struct QueryHandle {
    generation: u64,
    join: JoinHandle<Result<Arc<PortfolioSnapshot>>>,
}

impl QueryHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the query to finish. A superseded query yields `QueryCancelled`.
    pub async fn wait(self) -> Result<Arc<PortfolioSnapshot>> {
        match self.join.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::QueryCancelled),
            Err(e) => Err(Error::Unexpected(format!("Query task failed: {}", e))),
        }
    }
}

/// Orchestrates discovery and enrichment, and owns the observable query state.
///
/// Starting a query supersedes the previous one: its generation is retired,
/// so whatever it still tries to publish is discarded.
pub struct PortfolioAggregator {
    discovery: BalanceDiscovery,
    resolver: MarketDataResolver,
    config: AggregatorConfig,
    state: watch::Sender<QueryState>,
    active: Mutex<Option<(u64, AbortHandle)>>,
}

impl PortfolioAggregator {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        resolver: MarketDataResolver,
        config: AggregatorConfig,
    ) -> Self {
        let discovery = BalanceDiscovery::new(
            ledger,
            DiscoveryConfig {
                include_native_holding: config.include_native_holding,
            },
        );
        let (state, _) = watch::channel(QueryState::idle());

        Self {
            discovery,
            resolver,
            config,
            state,
            active: Mutex::new(None),
        }
    }

    /// Subscribe to state changes. Every publish replaces the previous value.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Latest published state.
    pub fn current(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Run a query for `address` to completion on the calling task.
    ///
    /// Intermediate snapshots are published as holdings are merged. Returns
    /// the final snapshot, which is `Partial` when the deadline elapsed.
    pub async fn run_query(&self, address: &str) -> Result<Arc<PortfolioSnapshot>> {
        let generation = self.begin(address);
        let owner = self.validate(generation, address)?;
        self.execute(generation, owner).await
    }

    /// Validate `address` and run its query on a background task.
    ///
    /// Any query still running is aborted. An invalid address fails the new
    /// generation immediately and no task is spawned.
    pub fn start_query(self: &Arc<Self>, address: &str) -> Result<QueryHandle> {
        let generation = self.begin(address);
        let owner = self.validate(generation, address)?;

        let aggregator = Arc::clone(self);
        let join = tokio::spawn(async move { aggregator.execute(generation, owner).await });
        self.activate(generation, join.abort_handle());

        Ok(QueryHandle { generation, join })
    }

    /// Retire the current generation and reset the state for a new query.
    fn begin(&self, address: &str) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.generation + 1;
            *state = QueryState {
                generation,
                address: Some(address.trim().to_string()),
                status: QueryStatus::Loading,
                snapshot: None,
            };
        });

        if let Some((previous, handle)) = self.lock_active().take() {
            debug!("Query {} superseded by {}", previous, generation);
            handle.abort();
        }

        info!("Starting portfolio query {} for {}", generation, address.trim());
        generation
    }

    fn validate(&self, generation: u64, address: &str) -> Result<WalletAddress> {
        WalletAddress::parse(address).inspect_err(|e| {
            warn!("Rejected query {}: {}", generation, e);
            self.fail(generation, e);
        })
    }

    /// Track the spawned task of `generation` unless a newer query already started.
    fn activate(&self, generation: u64, handle: AbortHandle) {
        let mut active = self.lock_active();
        if self.state.borrow().generation != generation {
            handle.abort();
            return;
        }
        if let Some((_, previous)) = active.replace((generation, handle)) {
            previous.abort();
        }
    }

    async fn execute(&self, generation: u64, owner: WalletAddress) -> Result<Arc<PortfolioSnapshot>> {
        let deadline = Instant::now() + self.config.query_timeout;

        let discovered = match timeout_at(deadline, self.discovery.discover_owner(&owner)).await {
            Ok(Ok(discovered)) => discovered,
            Ok(Err(e)) => return Err(self.discovery_failed(generation, &owner, e)),
            Err(_) => {
                let e = Error::DiscoveryFailed(LedgerError::Timeout);
                return Err(self.discovery_failed(generation, &owner, e));
            }
        };

        let mut builder = SnapshotBuilder::new(
            owner.to_string(),
            generation,
            discovered.native_balance,
            discovered.holdings.len(),
        );
        let mut snapshot = self.publish(generation, &builder, status_of(&builder))?;

        // Submitting in list order fixes the queue order before anything runs.
        let mut lookups: FuturesUnordered<_> = discovered
            .holdings
            .into_iter()
            .map(|raw| {
                let lookup = self.resolver.submit(&raw.asset_id);
                async move { (raw, lookup.await) }
            })
            .collect();

        loop {
            match timeout_at(deadline, lookups.next()).await {
                Ok(Some((raw, lookup))) => {
                    match lookup.into_market_data() {
                        Some(data) => {
                            let mut holding = Holding::from_raw(&raw);
                            holding.apply_market_data(data);
                            builder.merge(holding);
                        }
                        None => {
                            debug!("Dropping {} from query {}: no market data", raw.asset_id, generation);
                            builder.record_miss();
                        }
                    }
                    snapshot = self.publish(generation, &builder, status_of(&builder))?;
                }
                Ok(None) => break,
                Err(_) => {
                    // Dropping the pending lookups releases their queue slots.
                    drop(lookups);
                    let abandoned = builder.abandon_pending();
                    warn!(
                        "Query {} hit its deadline with {} enrichments outstanding",
                        generation, abandoned
                    );
                    return self.publish(generation, &builder, QueryStatus::Partial);
                }
            }
        }

        info!(
            "Query {} complete: {} holdings, {} dropped, ${} total",
            generation,
            snapshot.len(),
            snapshot.dropped_count,
            snapshot.total_value_usd
        );
        Ok(snapshot)
    }

    /// Publish a snapshot of `builder` if `generation` is still current.
    fn publish(
        &self,
        generation: u64,
        builder: &SnapshotBuilder,
        status: QueryStatus,
    ) -> Result<Arc<PortfolioSnapshot>> {
        let snapshot = Arc::new(builder.build());
        let published = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.status = status;
            state.snapshot = Some(Arc::clone(&snapshot));
            true
        });

        if published {
            Ok(snapshot)
        } else {
            debug!("Discarding snapshot of superseded query {}", generation);
            Err(Error::QueryCancelled)
        }
    }

    fn fail(&self, generation: u64, error: &Error) {
        let kind = FailureKind::from(error);
        let message = error.to_string();
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.status = QueryStatus::Failed { kind, message };
            true
        });
    }

    fn discovery_failed(&self, generation: u64, owner: &WalletAddress, error: Error) -> Error {
        error!("Discovery failed for {} (query {}): {}", owner, generation, error);
        self.fail(generation, &error);
        error
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<(u64, AbortHandle)>> {
        self.active.lock().unwrap_or_else(|poisoned| {
            warn!("Active query mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

fn status_of(builder: &SnapshotBuilder) -> QueryStatus {
    if builder.pending() == 0 {
        QueryStatus::Complete
    } else {
        QueryStatus::Loading
    }
}
