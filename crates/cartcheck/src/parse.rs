//! Scraping numbers out of storefront text.
//!
//! Every function here fails with [`CheckError::FormatMismatch`] when the
//! text does not have the expected shape. Nothing falls back to zero.

use crate::result::{CheckError, CheckResult};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const PRICE_PATTERN: &str = r"^(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$";
const AMOUNT_PATTERN: &str = r"\$\s*(\d[\d,]*(?:\.\d+)?)";
const CART_SUMMARY_PATTERN: &str = r"^\s*(\d+)\s+item\(s\)\s+-\s+\$\s*(\S+)\s*$";
const RESTRICTION_PATTERN: &str = r"This product has a (minimum|maximum) quantity of (\d+)";

static PRICE_RE: OnceLock<Regex> = OnceLock::new();
static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();
static CART_SUMMARY_RE: OnceLock<Regex> = OnceLock::new();
static RESTRICTION_RE: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

/// Parse a price such as `10,000,000.00` or `45.99`.
///
/// Thousands separators are accepted only in groups of three.
pub fn parse_price(text: &str) -> CheckResult<Decimal> {
    let trimmed = text.trim();
    if !cached(&PRICE_RE, PRICE_PATTERN).is_match(trimmed) {
        return Err(CheckError::format_mismatch("a price like 1,234.56", text));
    }
    Decimal::from_str(&trimmed.replace(',', ""))
        .map_err(|_| CheckError::format_mismatch("a price like 1,234.56", text))
}

/// The raw text of the first `$<amount>` in `text`
pub fn extract_amount(text: &str) -> CheckResult<&str> {
    cached(&AMOUNT_RE, AMOUNT_PATTERN)
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| CheckError::format_mismatch("a dollar amount like $45.99", text))
}

/// Parse the first `$<amount>` in `text`
pub fn parse_amount(text: &str) -> CheckResult<Decimal> {
    parse_price(extract_amount(text)?)
}

/// Format an amount the way the storefront displays it, without the currency sign
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{cents}")
}

/// Header cart button contents: `<N> item(s) - $<amount>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Item count
    pub quantity: u32,
    /// Displayed cart value
    pub value: Decimal,
    /// Amount exactly as displayed
    pub value_text: String,
}

impl CartSummary {
    /// Whether the summary describes an empty cart
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity == 0 && self.value.is_zero()
    }
}

impl fmt::Display for CartSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item(s) - ${}", self.quantity, self.value_text)
    }
}

/// Parse the header cart button text
pub fn parse_cart_summary(text: &str) -> CheckResult<CartSummary> {
    let mismatch = || CheckError::format_mismatch("\"<N> item(s) - $<amount>\"", text);
    let caps = cached(&CART_SUMMARY_RE, CART_SUMMARY_PATTERN)
        .captures(text)
        .ok_or_else(mismatch)?;
    let quantity = caps[1].parse::<u32>().map_err(|_| mismatch())?;
    let value_text = caps[2].to_string();
    let value = parse_price(&value_text)?;
    Ok(CartSummary {
        quantity,
        value,
        value_text,
    })
}

/// Direction of a per-product quantity restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionKind {
    /// Cart quantity must be at least the bound
    Minimum,
    /// Cart quantity must be at most the bound
    Maximum,
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        })
    }
}

/// A quantity restriction announced on a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRestriction {
    /// Minimum or maximum
    pub kind: RestrictionKind,
    /// The bound
    pub quantity: u32,
}

/// Parse "This product has a minimum quantity of N" (or "maximum")
pub fn parse_quantity_restriction(text: &str) -> CheckResult<QuantityRestriction> {
    let mismatch = || {
        CheckError::format_mismatch(
            "\"This product has a minimum|maximum quantity of <N>\"",
            text,
        )
    };
    let caps = cached(&RESTRICTION_RE, RESTRICTION_PATTERN)
        .captures(text)
        .ok_or_else(mismatch)?;
    let kind = match &caps[1] {
        "minimum" => RestrictionKind::Minimum,
        _ => RestrictionKind::Maximum,
    };
    let quantity = caps[2].parse::<u32>().map_err(|_| mismatch())?;
    Ok(QuantityRestriction { kind, quantity })
}

/// Parse a whole-number quantity such as an input's value
pub fn parse_quantity(text: &str) -> CheckResult<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| CheckError::format_mismatch("a whole-number quantity", text))
}

/// The message line of a dismissible alert, without its close glyph
pub fn first_line(text: &str) -> CheckResult<&str> {
    text.lines()
        .map(|line| line.trim().trim_end_matches('×').trim_end())
        .find(|line| !line.is_empty())
        .ok_or_else(|| CheckError::format_mismatch("a non-empty alert message", text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    mod price_tests {
        use super::*;

        #[test]
        fn test_thousands_separators_removed() {
            assert_eq!(parse_price("10,000,000.00").unwrap(), dec("10000000"));
        }

        #[test]
        fn test_plain_price() {
            assert_eq!(parse_price("45.99").unwrap(), dec("45.99"));
            assert_eq!(parse_price(" 7 ").unwrap(), dec("7"));
        }

        #[test]
        fn test_malformed_groups_rejected() {
            assert!(parse_price("1,23.00").is_err());
            assert!(parse_price("12,3456").is_err());
            assert!(parse_price(",100").is_err());
        }

        #[test]
        fn test_garbage_is_mismatch_not_zero() {
            let err = parse_price("N/A").unwrap_err();
            assert!(matches!(err, CheckError::FormatMismatch { .. }));
            assert!(parse_price("").is_err());
            assert!(parse_price("$45.99").is_err());
        }
    }

    mod amount_tests {
        use super::*;

        #[test]
        fn test_extract_from_label() {
            assert_eq!(extract_amount("Flat Shipping Rate - $5.00").unwrap(), "5.00");
            assert_eq!(parse_amount("$12,345.67").unwrap(), dec("12345.67"));
        }

        #[test]
        fn test_first_amount_wins() {
            assert_eq!(extract_amount("$122.00 Ex Tax: $100.00").unwrap(), "122.00");
        }

        #[test]
        fn test_no_dollar_sign() {
            assert!(matches!(
                extract_amount("45.99"),
                Err(CheckError::FormatMismatch { .. })
            ));
        }

        #[test]
        fn test_format_amount() {
            assert_eq!(format_amount(dec("0")), "0.00");
            assert_eq!(format_amount(dec("45.9")), "45.90");
            assert_eq!(format_amount(dec("1234.5")), "1,234.50");
            assert_eq!(format_amount(dec("10000000")), "10,000,000.00");
            assert_eq!(format_amount(dec("-1234.5")), "-1,234.50");
        }
    }

    mod cart_summary_tests {
        use super::*;

        #[test]
        fn test_parse_summary() {
            let summary = parse_cart_summary("3 item(s) - $45.99").unwrap();
            assert_eq!(summary.quantity, 3);
            assert_eq!(summary.value, dec("45.99"));
            assert_eq!(summary.value_text, "45.99");
            assert_eq!(summary.to_string(), "3 item(s) - $45.99");
        }

        #[test]
        fn test_empty_summary() {
            let summary = parse_cart_summary("0 item(s) - $0.00").unwrap();
            assert!(summary.is_empty());
        }

        #[test]
        fn test_large_summary_value() {
            let summary = parse_cart_summary(" 12 item(s) - $12,345.67 ").unwrap();
            assert_eq!(summary.quantity, 12);
            assert_eq!(summary.value, dec("12345.67"));
        }

        #[test]
        fn test_summary_mismatch() {
            assert!(parse_cart_summary("Shopping Cart").is_err());
            assert!(parse_cart_summary("x item(s) - $1.00").is_err());
            assert!(parse_cart_summary("1 item(s) - $abc").is_err());
        }
    }

    mod restriction_tests {
        use super::*;

        #[test]
        fn test_minimum() {
            let r = parse_quantity_restriction("This product has a minimum quantity of 2").unwrap();
            assert_eq!(r.kind, RestrictionKind::Minimum);
            assert_eq!(r.quantity, 2);
        }

        #[test]
        fn test_maximum_inside_alert() {
            let r = parse_quantity_restriction(" This product has a maximum quantity of 10\n×")
                .unwrap();
            assert_eq!(r.kind, RestrictionKind::Maximum);
            assert_eq!(r.quantity, 10);
        }

        #[test]
        fn test_unrelated_alert() {
            assert!(parse_quantity_restriction("Success: You have added it").is_err());
        }
    }

    mod first_line_tests {
        use super::*;

        #[test]
        fn test_alert_with_close_glyph() {
            assert_eq!(
                first_line("Success: You have modified your shopping cart!\n×").unwrap(),
                "Success: You have modified your shopping cart!"
            );
            assert_eq!(
                first_line(" Minimum order amount for Test product 1 is 2! ×").unwrap(),
                "Minimum order amount for Test product 1 is 2!"
            );
        }

        #[test]
        fn test_empty_alert() {
            assert!(first_line(" \n×").is_err());
        }

        #[test]
        fn test_parse_quantity() {
            assert_eq!(parse_quantity(" 2 ").unwrap(), 2);
            assert!(parse_quantity("two").is_err());
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_format_then_parse_is_identity(cents in 0i64..10_000_000_000) {
                let amount = Decimal::new(cents, 2);
                prop_assert_eq!(parse_price(&format_amount(amount)).unwrap(), amount);
            }

            #[test]
            fn prop_summary_quantity_read_back(qty in 0u32..10_000, cents in 0i64..100_000_000) {
                let amount = Decimal::new(cents, 2);
                let text = format!("{qty} item(s) - ${}", format_amount(amount));
                let summary = parse_cart_summary(&text).unwrap();
                prop_assert_eq!(summary.quantity, qty);
                prop_assert_eq!(summary.value, amount);
            }

            #[test]
            fn prop_unparsable_never_zero(s in "[a-zA-Z ]{1,12}") {
                prop_assert!(parse_price(&s).is_err());
            }

            #[test]
            fn prop_plain_float_prices(units in 0u32..1_000_000) {
                let text = format!("{units}.50");
                let expected = Decimal::from_u32(units).unwrap() + dec("0.5");
                prop_assert_eq!(parse_price(&text).unwrap(), expected);
            }
        }
    }
}
