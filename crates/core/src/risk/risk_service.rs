use rust_decimal::Decimal;

use super::risk_model::{RiskSummary, RiskTier, TierExposure};
use crate::constants::{
    KNOWN_STABLE_ASSETS, LOW_RISK_MARKET_CAP, MAX_RISK_SCORE, MEDIUM_RISK_MARKET_CAP,
};
use crate::holdings::Holding;

/// Whether the asset is on the stable allow-list (SOL, USDC, USDT).
pub fn is_known_stable(asset_id: &str) -> bool {
    KNOWN_STABLE_ASSETS.contains(&asset_id)
}

/// Assign a risk tier from market cap and stable status.
///
/// First match wins: stable, then cap >= 100M (Low), then cap >= 20M
/// (Medium), else High. An absent cap counts as zero. Total over all inputs.
pub fn classify_market_cap(market_cap_usd: Option<Decimal>, is_known_stable: bool) -> RiskTier {
    if is_known_stable {
        return RiskTier::Stable;
    }

    let market_cap = market_cap_usd.unwrap_or(Decimal::ZERO);
    if market_cap >= LOW_RISK_MARKET_CAP {
        RiskTier::Low
    } else if market_cap >= MEDIUM_RISK_MARKET_CAP {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Assign a risk tier to a holding.
pub fn classify(holding: &Holding, is_known_stable: bool) -> RiskTier {
    classify_market_cap(holding.market_cap_usd(), is_known_stable)
}

/// Compute total value, per-tier exposure and the weighted risk score.
///
/// Always recomputed from the full set, never adjusted incrementally.
pub fn summarize(holdings: &[Holding]) -> RiskSummary {
    let mut tier_values = [Decimal::ZERO; RiskTier::ALL.len()];
    for holding in holdings {
        let slot = &mut tier_values[tier_index(holding.risk_tier())];
        *slot = slot.saturating_add(holding.value_usd());
    }

    let total_value_usd = tier_values
        .iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(*value));

    let breakdown: Vec<TierExposure> = RiskTier::ALL
        .iter()
        .zip(tier_values)
        .map(|(tier, value_usd)| TierExposure {
            tier: *tier,
            value_usd,
            share: if total_value_usd.is_zero() {
                Decimal::ZERO
            } else {
                value_usd / total_value_usd
            },
        })
        .collect();

    let risk_score = breakdown
        .iter()
        .map(|exposure| exposure.share * exposure.tier.weight())
        .sum::<Decimal>()
        .clamp(Decimal::ZERO, MAX_RISK_SCORE);

    RiskSummary {
        total_value_usd,
        risk_score,
        breakdown,
    }
}

/// Weighted 0-100 risk score of a holding set.
pub fn risk_score(holdings: &[Holding]) -> Decimal {
    summarize(holdings).risk_score
}

fn tier_index(tier: RiskTier) -> usize {
    RiskTier::ALL
        .iter()
        .position(|candidate| *candidate == tier)
        .unwrap_or(RiskTier::ALL.len() - 1)
}
