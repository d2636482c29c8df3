use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::Holding;

/// Case-insensitive substring match on symbol or asset id. An empty term matches.
pub fn matches_search(holding: &Holding, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    holding
        .symbol()
        .is_some_and(|symbol| symbol.to_lowercase().contains(&term))
        || holding.asset_id().to_lowercase().contains(&term)
}

pub fn is_high_risk_category(holding: &Holding) -> bool {
    holding.is_high_risk_category()
}

/// Inclusive range check on market cap. An absent cap counts as zero.
pub fn market_cap_in_range(holding: &Holding, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    let market_cap = holding.market_cap_usd().unwrap_or(Decimal::ZERO);
    min.map_or(true, |min| market_cap >= min) && max.map_or(true, |max| market_cap <= max)
}

/// Whether the holding is worth at least `floor` USD.
pub fn meets_value_floor(holding: &Holding, floor: Decimal) -> bool {
    holding.value_usd() >= floor
}

/// Which side of the high-risk category split to keep.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CategoryFilter {
    #[default]
    All,
    OnlyHighRisk,
    ExcludeHighRisk,
}

/// All active holding filters. The default keeps everything.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HoldingFilter {
    pub search: Option<String>,
    pub category: CategoryFilter,
    pub min_market_cap: Option<Decimal>,
    pub max_market_cap: Option<Decimal>,
    /// Hide holdings worth less than this many USD.
    pub min_value_usd: Option<Decimal>,
}

impl HoldingFilter {
    pub fn matches(&self, holding: &Holding) -> bool {
        let category_ok = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::OnlyHighRisk => is_high_risk_category(holding),
            CategoryFilter::ExcludeHighRisk => !is_high_risk_category(holding),
        };

        category_ok
            && self
                .search
                .as_deref()
                .map_or(true, |term| matches_search(holding, term))
            && market_cap_in_range(holding, self.min_market_cap, self.max_market_cap)
            && self
                .min_value_usd
                .map_or(true, |floor| meets_value_floor(holding, floor))
    }

    /// Keep the matching holdings, preserving order.
    pub fn apply<'a, I>(&self, holdings: I) -> Vec<&'a Holding>
    where
        I: IntoIterator<Item = &'a Holding>,
    {
        holdings.into_iter().filter(|h| self.matches(h)).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Symbol,
    Quantity,
    Price,
    Value,
    MarketCap,
    RiskTier,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortKey {
    /// Compare two holdings on this key. Absent numbers sort as zero.
    pub fn compare(self, a: &Holding, b: &Holding) -> Ordering {
        match self {
            SortKey::Symbol => a
                .symbol()
                .unwrap_or_default()
                .to_lowercase()
                .cmp(&b.symbol().unwrap_or_default().to_lowercase()),
            SortKey::Quantity => a.quantity().cmp(&b.quantity()),
            SortKey::Price => or_zero(a.unit_price_usd()).cmp(&or_zero(b.unit_price_usd())),
            SortKey::Value => a.value_usd().cmp(&b.value_usd()),
            SortKey::MarketCap => or_zero(a.market_cap_usd()).cmp(&or_zero(b.market_cap_usd())),
            SortKey::RiskTier => a.risk_tier().cmp(&b.risk_tier()),
        }
    }
}

fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Stable sort: holdings that compare equal keep their relative order.
pub fn sort_holdings(holdings: &mut [&Holding], key: SortKey, direction: SortDirection) {
    holdings.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskTier;
    use rust_decimal_macros::dec;
    use walletlens_market_data::MarketData;

    fn holding(asset_id: &str, symbol: &str, quantity: Decimal, price: Decimal, cap: Option<Decimal>) -> Holding {
        let mut holding = Holding::new(asset_id, quantity);
        holding.apply_market_data(MarketData {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            logo_url: None,
            price_usd: price,
            market_cap_usd: cap,
            url: None,
        });
        holding
    }

    fn valued(asset_id: &str, value: Decimal) -> Holding {
        holding(asset_id, asset_id, dec!(1), value, None)
    }

    #[test]
    fn test_value_floor_is_inclusive() {
        let holdings = vec![valued("a", dec!(0.5)), valued("b", dec!(1.0)), valued("c", dec!(50))];
        let filter = HoldingFilter {
            min_value_usd: Some(dec!(1)),
            ..Default::default()
        };

        let kept: Vec<Decimal> = filter.apply(&holdings).iter().map(|h| h.value_usd()).collect();
        assert_eq!(kept, vec![dec!(1.0), dec!(50)]);
    }

    #[test]
    fn test_search_matches_symbol_or_mint() {
        let bonk = holding("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "Bonk", dec!(1), dec!(1), None);
        assert!(matches_search(&bonk, "bon"));
        assert!(matches_search(&bonk, "DEZX"));
        assert!(matches_search(&bonk, "  "));
        assert!(!matches_search(&bonk, "wif"));

        let unpriced = Holding::new("abc", dec!(1));
        assert!(matches_search(&unpriced, "AB"));
    }

    #[test]
    fn test_market_cap_range() {
        let mid = holding("m", "M", dec!(1), dec!(1), Some(dec!(50000000)));
        assert!(market_cap_in_range(&mid, Some(dec!(50000000)), Some(dec!(50000000))));
        assert!(market_cap_in_range(&mid, None, None));
        assert!(!market_cap_in_range(&mid, Some(dec!(60000000)), None));
        assert!(!market_cap_in_range(&mid, None, Some(dec!(1))));

        let unknown = Holding::new("u", dec!(1));
        assert!(market_cap_in_range(&unknown, None, Some(dec!(0))));
        assert!(!market_cap_in_range(&unknown, Some(dec!(1)), None));
    }

    #[test]
    fn test_category_filter() {
        let pump = valued("6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfpump", dec!(5));
        let plain = valued("plain", dec!(5));
        let holdings = vec![pump, plain];

        let only = HoldingFilter {
            category: CategoryFilter::OnlyHighRisk,
            ..Default::default()
        };
        let exclude = HoldingFilter {
            category: CategoryFilter::ExcludeHighRisk,
            ..Default::default()
        };

        assert_eq!(only.apply(&holdings).len(), 1);
        assert!(is_high_risk_category(only.apply(&holdings)[0]));
        assert_eq!(exclude.apply(&holdings)[0].asset_id(), "plain");
        assert_eq!(HoldingFilter::default().apply(&holdings).len(), 2);
    }

    #[test]
    fn test_sort_by_value_and_direction() {
        let holdings = vec![valued("a", dec!(3)), valued("b", dec!(10)), valued("c", dec!(1))];
        let mut view: Vec<&Holding> = holdings.iter().collect();

        sort_holdings(&mut view, SortKey::Value, SortDirection::Desc);
        let ids: Vec<&str> = view.iter().map(|h| h.asset_id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        sort_holdings(&mut view, SortKey::Value, SortDirection::Asc);
        let ids: Vec<&str> = view.iter().map(|h| h.asset_id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_absent_market_cap_as_zero() {
        let capped = holding("capped", "CAP", dec!(1), dec!(1), Some(dec!(5)));
        let unknown = Holding::new("unknown", dec!(1));
        let mut view = vec![&capped, &unknown];

        sort_holdings(&mut view, SortKey::MarketCap, SortDirection::Asc);
        assert_eq!(view[0].asset_id(), "unknown");
    }

    #[test]
    fn test_sort_by_symbol_and_tier() {
        let low = holding("x", "zeta", dec!(1), dec!(1), Some(dec!(200000000)));
        let high = holding("y", "Alpha", dec!(1), dec!(1), None);
        let mut view = vec![&low, &high];

        sort_holdings(&mut view, SortKey::Symbol, SortDirection::Asc);
        assert_eq!(view[0].symbol(), Some("Alpha"));

        sort_holdings(&mut view, SortKey::RiskTier, SortDirection::Desc);
        assert_eq!(view[0].risk_tier(), RiskTier::High);
    }
}
