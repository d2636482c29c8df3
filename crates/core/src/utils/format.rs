//! Display formatting for prices, quantities and market caps.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const BILLION: Decimal = dec!(1000000000);
const MILLION: Decimal = dec!(1000000);
const THOUSAND: Decimal = dec!(1000);
const TINY_THRESHOLD: Decimal = dec!(0.0001);

/// Abbreviate a market cap: `$1.23B`, `$4.56M`, `$7.89K` or `$12.00`.
///
/// Absent or zero caps render as `N/A`.
pub fn format_market_cap(market_cap_usd: Option<Decimal>) -> String {
    let value = match market_cap_usd {
        Some(value) if !value.is_zero() => value,
        _ => return "N/A".to_string(),
    };

    let (scaled, suffix) = if value >= BILLION {
        (value / BILLION, "B")
    } else if value >= MILLION {
        (value / MILLION, "M")
    } else if value >= THOUSAND {
        (value / THOUSAND, "K")
    } else {
        (value, "")
    };

    format!("${:.2}{}", round_half_up(scaled, 2), suffix)
}

/// Render a number with just enough fractional digits to be meaningful.
///
/// Whole numbers print as-is. Positive values below 0.0001 print in the
/// compact `0.{n}d` form, where `n` is the count of zeros after the point
/// and `d` the first significant digit. Anything else is rounded to its
/// first non-zero fractional digit.
pub fn format_significant_decimal(value: Decimal) -> String {
    let value = value.normalize();
    if value.fract().is_zero() {
        return value.trunc().to_string();
    }

    let fraction_digits = fraction_digits(value);
    let first_significant = fraction_digits
        .iter()
        .position(|digit| *digit != 0)
        .unwrap_or(0);

    if value > Decimal::ZERO && value < TINY_THRESHOLD {
        let digit = fraction_digits.get(first_significant).copied().unwrap_or(0);
        return format!("0.{{{}}}{}", first_significant, digit);
    }

    let dp = u32::try_from(first_significant + 1).unwrap_or(u32::MAX);
    round_half_up(value, dp).normalize().to_string()
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// The fractional digits of `value`, most significant first.
fn fraction_digits(value: Decimal) -> Vec<u32> {
    let text = value.abs().to_string();
    text.split_once('.')
        .map(|(_, fraction)| fraction.chars().filter_map(|c| c.to_digit(10)).collect())
        .unwrap_or_default()
}
