//! Holding predicates, sorting and the table column schema.

mod columns;
mod holding_filters;

pub use columns::{ColumnFormat, ColumnSpec, COLUMNS};
pub use holding_filters::{
    is_high_risk_category, market_cap_in_range, matches_search, meets_value_floor, sort_holdings,
    CategoryFilter, HoldingFilter, SortDirection, SortKey,
};
