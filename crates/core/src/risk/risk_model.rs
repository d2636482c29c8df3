use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Coarse liquidity/verification risk of a holding.
///
/// Variants are ordered from safest to riskiest so tiers sort naturally.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum RiskTier {
    Stable,
    Low,
    Medium,
    /// Carried in the weight table, never assigned by the classifier.
    MediumHigh,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 5] = [
        RiskTier::Stable,
        RiskTier::Low,
        RiskTier::Medium,
        RiskTier::MediumHigh,
        RiskTier::High,
    ];

    /// Contribution of a fully concentrated portfolio to the risk score.
    pub fn weight(self) -> Decimal {
        match self {
            RiskTier::Stable | RiskTier::Low => Decimal::ZERO,
            RiskTier::Medium => dec!(33),
            RiskTier::MediumHigh => dec!(66),
            RiskTier::High => dec!(100),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Stable => "stable",
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::MediumHigh => "mediumHigh",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// USD exposure to one risk tier.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TierExposure {
    pub tier: RiskTier,
    pub value_usd: Decimal,
    /// Fraction of the total portfolio value, between 0 and 1.
    pub share: Decimal,
}

/// Totals derived from a complete holding set.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total_value_usd: Decimal,
    /// Weighted score between 0 and 100.
    pub risk_score: Decimal,
    /// One entry per tier, in [`RiskTier::ALL`] order.
    pub breakdown: Vec<TierExposure>,
}
