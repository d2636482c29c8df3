//! Tests for the snapshot model and its builder.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use walletlens_market_data::MarketData;

use super::{PortfolioSnapshot, SnapshotBuilder};
use crate::holdings::Holding;
use crate::risk::RiskTier;

const ADDRESS: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

fn priced(asset_id: &str, quantity: Decimal, price: Decimal, cap: Option<Decimal>) -> Holding {
    let mut holding = Holding::new(asset_id, quantity);
    holding.apply_market_data(MarketData {
        symbol: asset_id.to_uppercase(),
        name: asset_id.to_string(),
        logo_url: None,
        price_usd: price,
        market_cap_usd: cap,
        url: None,
    });
    holding
}

// ==================== Builder ====================

#[test]
fn test_empty_builder_builds_empty_snapshot() {
    let snapshot = SnapshotBuilder::new(ADDRESS.to_string(), 3, dec!(2.5), 0).build();

    assert_eq!(snapshot.address, ADDRESS);
    assert_eq!(snapshot.generation, 3);
    assert_eq!(snapshot.native_balance, dec!(2.5));
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.total_value_usd, Decimal::ZERO);
    assert_eq!(snapshot.risk_score, Decimal::ZERO);
    assert!(snapshot.is_settled());
}

#[test]
fn test_totals_follow_every_merge() {
    let mut builder = SnapshotBuilder::new(ADDRESS.to_string(), 1, Decimal::ZERO, 3);

    builder.merge(priced("blue", dec!(10), dec!(1.5), Some(dec!(500000000))));
    let first = builder.build();
    assert_eq!(first.total_value_usd, dec!(15));
    assert_eq!(first.risk_score, Decimal::ZERO);
    assert_eq!(first.pending_count, 2);

    builder.merge(priced("tiny", dec!(5), dec!(3), None));
    let second = builder.build();
    assert_eq!(second.total_value_usd, dec!(30));
    assert_eq!(second.risk_score, dec!(50));
    assert_eq!(second.holdings[1].risk_tier(), RiskTier::High);

    builder.record_miss();
    let last = builder.build();
    assert_eq!(last.len(), 2);
    assert_eq!(last.dropped_count, 1);
    assert!(last.is_settled());
}

#[test]
fn test_duplicate_merge_is_ignored() {
    let mut builder = SnapshotBuilder::new(ADDRESS.to_string(), 1, Decimal::ZERO, 2);

    assert!(builder.merge(priced("blue", dec!(1), dec!(1), None)));
    assert!(!builder.merge(priced("blue", dec!(9), dec!(9), None)));

    let snapshot = builder.build();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.total_value_usd, dec!(1));
}

#[test]
fn test_abandon_pending_counts_as_dropped() {
    let mut builder = SnapshotBuilder::new(ADDRESS.to_string(), 1, Decimal::ZERO, 4);
    builder.merge(priced("blue", dec!(1), dec!(1), None));
    builder.record_miss();

    assert_eq!(builder.abandon_pending(), 2);
    let snapshot = builder.build();
    assert_eq!(snapshot.dropped_count, 3);
    assert_eq!(snapshot.pending_count, 0);
    assert_eq!(builder.pending(), 0);
}

// ==================== Snapshot views ====================

fn snapshot_with(holdings: Vec<Holding>) -> PortfolioSnapshot {
    let mut builder = SnapshotBuilder::new(ADDRESS.to_string(), 1, Decimal::ZERO, holdings.len());
    for holding in holdings {
        builder.merge(holding);
    }
    builder.build()
}

#[test]
fn test_top_holdings_by_value() {
    let snapshot = snapshot_with(vec![
        priced("a", dec!(1), dec!(5), None),
        priced("b", dec!(1), dec!(50), None),
        priced("c", dec!(1), dec!(20), None),
        priced("d", dec!(1), dec!(20), None),
    ]);

    let top: Vec<&str> = snapshot
        .top_holdings_by_value(3)
        .iter()
        .map(|h| h.asset_id())
        .collect();
    assert_eq!(top, vec!["b", "c", "d"]);
    assert_eq!(snapshot.top_holdings_by_value(10).len(), 4);
    assert!(snapshot.top_holdings_by_value(0).is_empty());
}

#[test]
fn test_holding_lookup() {
    let snapshot = snapshot_with(vec![priced("a", dec!(2), dec!(5), None)]);
    assert_eq!(snapshot.holding("a").map(|h| h.value_usd()), Some(dec!(10)));
    assert!(snapshot.holding("zzz").is_none());
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let snapshot = snapshot_with(vec![priced("a", dec!(2), dec!(5), None)]);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["address"], ADDRESS);
    assert_eq!(json["droppedCount"], 0);
    assert_eq!(json["holdings"][0]["assetId"], "a");
    assert_eq!(json["riskBreakdown"].as_array().map(|a| a.len()), Some(5));
    assert!(json["capturedAt"].is_string());
}
