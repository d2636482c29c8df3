//! Risk tiers, the per-holding classifier and the aggregate risk score.

mod risk_model;
mod risk_service;

pub use risk_model::{RiskSummary, RiskTier, TierExposure};
pub use risk_service::{classify, classify_market_cap, is_known_stable, risk_score, summarize};
