use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use anyhow::anyhow;
use axum::http::{HeaderValue, StatusCode};
use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures_core::stream::Stream;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::WatchStream;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use walletlens_core::{
    filters::{sort_holdings, CategoryFilter, ColumnSpec, HoldingFilter, SortDirection, SortKey, COLUMNS},
    utils::format::{format_market_cap, format_significant_decimal},
    Holding, QueryState,
};
use walletlens_market_data::QueueState;

const PORTFOLIO_EVENT: &str = "portfolio";

pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    provider: &'static str,
    queue: QueueState,
    pending_requests: usize,
    request_delay_ms: u64,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let queue = state.resolver.queue();
    Json(StatusResponse {
        provider: state.resolver.provider_id(),
        queue: queue.state(),
        pending_requests: queue.pending(),
        request_delay_ms: u64::try_from(queue.delay().as_millis()).unwrap_or(u64::MAX),
    })
}

#[derive(Deserialize)]
struct QueryBody {
    address: String,
}

#[derive(Serialize)]
struct QueryAccepted {
    generation: u64,
}

async fn start_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> ApiResult<(StatusCode, Json<QueryAccepted>)> {
    let handle = state.aggregator.start_query(&body.address)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(QueryAccepted {
            generation: handle.generation(),
        }),
    ))
}

async fn get_portfolio(State(state): State<Arc<AppState>>) -> Json<QueryState> {
    Json(state.aggregator.current())
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct HoldingsQuery {
    search: Option<String>,
    high_risk_only: bool,
    hide_high_risk: bool,
    min_market_cap: Option<Decimal>,
    max_market_cap: Option<Decimal>,
    min_value_usd: Option<Decimal>,
    sort_by: Option<SortKey>,
    direction: Option<SortDirection>,
}

impl HoldingsQuery {
    fn to_filter(&self) -> ApiResult<HoldingFilter> {
        let category = match (self.high_risk_only, self.hide_high_risk) {
            (true, true) => {
                return Err(ApiError::BadRequest(
                    "highRiskOnly and hideHighRisk are mutually exclusive".to_string(),
                ))
            }
            (true, false) => CategoryFilter::OnlyHighRisk,
            (false, true) => CategoryFilter::ExcludeHighRisk,
            (false, false) => CategoryFilter::All,
        };
        Ok(HoldingFilter {
            search: self.search.clone(),
            category,
            min_market_cap: self.min_market_cap,
            max_market_cap: self.max_market_cap,
            min_value_usd: self.min_value_usd,
        })
    }
}

/// Pre-rendered display strings for one holding.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayValues {
    quantity: String,
    price: String,
    value: String,
    market_cap: String,
}

#[derive(Serialize)]
struct HoldingRow<'a> {
    #[serde(flatten)]
    holding: &'a Holding,
    display: DisplayValues,
}

impl<'a> From<&'a Holding> for HoldingRow<'a> {
    fn from(holding: &'a Holding) -> Self {
        Self {
            holding,
            display: DisplayValues {
                quantity: format_significant_decimal(holding.quantity()),
                price: holding
                    .unit_price_usd()
                    .map(|p| format!("${}", format_significant_decimal(p)))
                    .unwrap_or_else(|| "-".to_string()),
                value: format!("${}", format_significant_decimal(holding.value_usd())),
                market_cap: format_market_cap(holding.market_cap_usd()),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsResponse<'a> {
    generation: u64,
    total: usize,
    holdings: Vec<HoldingRow<'a>>,
}

async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HoldingsQuery>,
) -> ApiResult<Response> {
    let filter = query.to_filter()?;
    let current = state.aggregator.current();
    let Some(snapshot) = current.snapshot.as_ref() else {
        return Err(ApiError::NotFound);
    };

    let mut view = filter.apply(&snapshot.holdings);
    if let Some(key) = query.sort_by {
        sort_holdings(&mut view, key, query.direction.unwrap_or_default());
    }

    let response = HoldingsResponse {
        generation: snapshot.generation,
        total: snapshot.holdings.len(),
        holdings: view.into_iter().map(HoldingRow::from).collect(),
    };
    Ok(Json(response).into_response())
}

#[derive(Deserialize)]
struct TopQuery {
    limit: Option<usize>,
}

async fn get_top_holdings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Json<Vec<Holding>>> {
    let current = state.aggregator.current();
    let snapshot = current.snapshot.as_ref().ok_or(ApiError::NotFound)?;
    let top = snapshot
        .top_holdings_by_value(query.limit.unwrap_or(5))
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(top))
}

async fn get_columns() -> Json<&'static [ColumnSpec]> {
    Json(COLUMNS)
}

async fn stream_portfolio(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = WatchStream::new(state.aggregator.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |query_state| {
        match SseEvent::default().event(PORTFOLIO_EVENT).json_data(&query_state) {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::error!("Failed to serialize SSE payload for {}: {}", PORTFOLIO_EVENT, err);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Invalid WL_CORS_ALLOW_ORIGINS entry: {}", e))?;
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .route("/portfolio", get(get_portfolio))
        .route("/portfolio/query", post(start_query))
        .route("/portfolio/holdings", get(get_holdings))
        .route("/portfolio/top", get(get_top_holdings))
        .route("/portfolio/columns", get(get_columns))
        .route("/portfolio/stream", get(stream_portfolio));

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http()))
}
