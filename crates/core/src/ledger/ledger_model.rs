use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::RawHolding;

/// One token account as reported by the ledger, in base units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountBalance {
    pub mint: String,
    pub raw_amount: u64,
    pub decimals: u8,
}

impl TokenAccountBalance {
    pub fn quantity(&self) -> Decimal {
        to_display_units(self.raw_amount, self.decimals)
    }
}

/// Result of a successful discovery.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredBalances {
    /// Native balance in SOL.
    pub native_balance: Decimal,
    /// Non-zero fungible balances, one entry per asset, native first.
    pub holdings: Vec<RawHolding>,
}

/// Convert a base-unit amount to display units.
///
/// Scales beyond what `Decimal` can represent are truncated; anything that
/// would need more than 20 extra digits is below representable precision.
pub fn to_display_units(raw_amount: u64, decimals: u8) -> Decimal {
    const MAX_SCALE: u32 = 28;

    let decimals = u32::from(decimals);
    if decimals <= MAX_SCALE {
        return Decimal::from_i128_with_scale(i128::from(raw_amount), decimals).normalize();
    }

    let shift = decimals - MAX_SCALE;
    if shift >= 20 {
        return Decimal::ZERO;
    }
    let truncated = raw_amount / 10u64.pow(shift);
    Decimal::from_i128_with_scale(i128::from(truncated), MAX_SCALE).normalize()
}
