use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use walletlens_market_data::MarketData;

use crate::constants::{HIGH_RISK_MINT_SUFFIX, NATIVE_MINT};
use crate::risk::{classify_market_cap, is_known_stable, RiskTier};

/// A fungible balance read from the ledger, in display units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawHolding {
    pub asset_id: String,
    /// Always strictly positive once it leaves discovery.
    pub quantity: Decimal,
    pub decimals: u8,
}

impl RawHolding {
    pub fn new(asset_id: impl Into<String>, quantity: Decimal, decimals: u8) -> Self {
        Self {
            asset_id: asset_id.into(),
            quantity,
            decimals,
        }
    }
}

/// Position view model for display.
///
/// Derived fields (`value_usd`, `risk_tier`) are recomputed whenever their
/// inputs change, so they cannot drift from price, quantity and market cap.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    asset_id: String,
    quantity: Decimal,
    symbol: Option<String>,
    display_name: Option<String>,
    logo_url: Option<String>,
    unit_price_usd: Option<Decimal>,
    value_usd: Decimal,
    market_cap_usd: Option<Decimal>,
    risk_tier: RiskTier,
    external_url: Option<String>,
    is_native: bool,
    high_risk_category: bool,
}

impl Holding {
    /// A holding with no market data yet. Valued at zero, tier High unless
    /// the asset is on the stable allow-list.
    pub fn new(asset_id: impl Into<String>, quantity: Decimal) -> Self {
        let asset_id = asset_id.into();
        let stable = is_known_stable(&asset_id);
        let high_risk_category = asset_id
            .to_ascii_lowercase()
            .ends_with(HIGH_RISK_MINT_SUFFIX);

        Self {
            is_native: asset_id == NATIVE_MINT,
            risk_tier: classify_market_cap(None, stable),
            asset_id,
            quantity,
            symbol: None,
            display_name: None,
            logo_url: None,
            unit_price_usd: None,
            value_usd: Decimal::ZERO,
            market_cap_usd: None,
            external_url: None,
            high_risk_category,
        }
    }

    pub fn from_raw(raw: &RawHolding) -> Self {
        Self::new(raw.asset_id.clone(), raw.quantity)
    }

    /// Copy market fields onto the holding and recompute value and tier.
    pub fn apply_market_data(&mut self, data: MarketData) {
        self.symbol = Some(data.symbol);
        self.display_name = Some(data.name);
        self.logo_url = data.logo_url;
        self.unit_price_usd = Some(data.price_usd);
        self.market_cap_usd = data.market_cap_usd;
        self.external_url = data.url;
        self.recompute();
    }

    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.value_usd = match self.unit_price_usd {
            Some(price) => self.quantity.checked_mul(price).unwrap_or(Decimal::MAX),
            None => Decimal::ZERO,
        };
        self.risk_tier = classify_market_cap(self.market_cap_usd, is_known_stable(&self.asset_id));
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    pub fn unit_price_usd(&self) -> Option<Decimal> {
        self.unit_price_usd
    }

    /// `quantity * unit_price_usd`, or zero while unpriced.
    pub fn value_usd(&self) -> Decimal {
        self.value_usd
    }

    pub fn market_cap_usd(&self) -> Option<Decimal> {
        self.market_cap_usd
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    pub fn external_url(&self) -> Option<&str> {
        self.external_url.as_deref()
    }

    /// Whether this is the native SOL pseudo-holding.
    pub fn is_native(&self) -> bool {
        self.is_native
    }

    /// Whether the mint belongs to the designated high-risk launch category.
    pub fn is_high_risk_category(&self) -> bool {
        self.high_risk_category
    }

    pub fn is_priced(&self) -> bool {
        self.unit_price_usd.is_some()
    }
}
