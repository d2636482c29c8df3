use serde::Serialize;

use super::holding_filters::SortKey;

/// How a column's value is rendered.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ColumnFormat {
    /// Symbol with logo and display name.
    Asset,
    /// `format_significant_decimal`
    Quantity,
    /// `$` prefix plus `format_significant_decimal`
    Usd,
    /// `format_market_cap`
    MarketCap,
    RiskTier,
    Link,
}

/// One column of the holdings table.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub format: ColumnFormat,
    /// `None` for columns that cannot be sorted.
    pub sort_key: Option<SortKey>,
}

pub const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        id: "asset",
        label: "Asset",
        format: ColumnFormat::Asset,
        sort_key: Some(SortKey::Symbol),
    },
    ColumnSpec {
        id: "quantity",
        label: "Balance",
        format: ColumnFormat::Quantity,
        sort_key: Some(SortKey::Quantity),
    },
    ColumnSpec {
        id: "price",
        label: "Price",
        format: ColumnFormat::Usd,
        sort_key: Some(SortKey::Price),
    },
    ColumnSpec {
        id: "value",
        label: "Value",
        format: ColumnFormat::Usd,
        sort_key: Some(SortKey::Value),
    },
    ColumnSpec {
        id: "marketCap",
        label: "Market Cap",
        format: ColumnFormat::MarketCap,
        sort_key: Some(SortKey::MarketCap),
    },
    ColumnSpec {
        id: "riskTier",
        label: "Risk",
        format: ColumnFormat::RiskTier,
        sort_key: Some(SortKey::RiskTier),
    },
    ColumnSpec {
        id: "link",
        label: "Chart",
        format: ColumnFormat::Link,
        sort_key: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ids_are_unique() {
        let mut ids: Vec<&str> = COLUMNS.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), COLUMNS.len());
    }

    #[test]
    fn test_every_sort_key_has_a_column() {
        for key in [
            SortKey::Symbol,
            SortKey::Quantity,
            SortKey::Price,
            SortKey::Value,
            SortKey::MarketCap,
            SortKey::RiskTier,
        ] {
            assert!(COLUMNS.iter().any(|c| c.sort_key == Some(key)), "{:?}", key);
        }
    }

    #[test]
    fn test_columns_serialize() {
        let json = serde_json::to_value(COLUMNS).unwrap();
        assert_eq!(json[4]["id"], "marketCap");
        assert_eq!(json[4]["sortKey"], "marketCap");
        assert!(json[6]["sortKey"].is_null());
    }
}
