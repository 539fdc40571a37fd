use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, Result};

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D+").unwrap())
}

/// Strip everything but digits from a price display string and parse the rest
/// ("12 990 ₽" -> 12990). Currency symbols, grouping separators and decimal
/// points are all dropped, so "$1,234.56" comes out as 123456.
pub fn parse_price(display: &str) -> Result<i64> {
    let digits = non_digits().replace_all(display, "");
    if digits.is_empty() {
        return Err(AppError::Parse {
            message: format!("no digits in price text {display:?}"),
        });
    }
    digits.parse::<i64>().map_err(|_| AppError::Parse {
        message: format!("price out of range: {digits}"),
    })
}

/// One scraped search-result row or product card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub price: i64,
    pub shop_name: Option<String>,
}

impl Listing {
    /// Build a listing from scraped display text. The price is always derived
    /// by digit-extraction, never stored as the raw currency string.
    pub fn from_display(name: impl Into<String>, price_display: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            price: parse_price(price_display)?,
            shop_name: None,
        })
    }

    pub fn with_shop(mut self, shop_name: impl Into<String>) -> Self {
        self.shop_name = Some(shop_name.into());
        self
    }

    /// Re-parse the price from a fresh display string, keeping name and shop.
    pub fn reprice(&mut self, price_display: &str) -> Result<()> {
        self.price = parse_price(price_display)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("12 990 ₽", 12990)]
    #[case("24990", 24990)]
    #[case("1 299 000 ₽", 1_299_000)]
    // Digit stripping drops the decimal point, so fractional prices collapse
    // into one integer. Lossy on purpose.
    #[case("$1,234.56", 123456)]
    #[case("от 590 ₽/шт", 590)]
    fn parses_display_prices(#[case] display: &str, #[case] expected: i64) {
        assert_eq!(parse_price(display).unwrap(), expected);
    }

    #[rstest]
    #[case("N/A")]
    #[case("")]
    #[case("цена по запросу")]
    fn no_digits_is_a_parse_error(#[case] display: &str) {
        let err = parse_price(display).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn overlong_digit_runs_are_a_parse_error() {
        let err = parse_price("99999999999999999999999999 ₽").unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_listing_from_display() {
        let listing = Listing::from_display("POCO X6 Pro 12/512", "29 990 ₽").unwrap();
        assert_eq!(listing.name, "POCO X6 Pro 12/512");
        assert_eq!(listing.price, 29990);
        assert_eq!(listing.shop_name, None);
    }

    #[test]
    fn test_listing_with_shop() {
        let listing = Listing::from_display("", "29 990 ₽")
            .unwrap()
            .with_shop("DNS");
        assert_eq!(listing.shop_name.as_deref(), Some("DNS"));
    }

    #[test]
    fn test_reprice_keeps_name_and_shop() {
        let mut listing = Listing::from_display("POCO X6 Pro", "29 990 ₽")
            .unwrap()
            .with_shop("DNS");
        listing.reprice("27 490 ₽").unwrap();
        assert_eq!(listing.price, 27490);
        assert_eq!(listing.name, "POCO X6 Pro");
        assert_eq!(listing.shop_name.as_deref(), Some("DNS"));

        assert!(listing.reprice("нет в наличии").is_err());
    }

    #[test]
    fn test_value_equality() {
        let a = Listing::from_display("POCO X6 Pro", "29 990 ₽").unwrap();
        let b = Listing::from_display("POCO X6 Pro", "29990").unwrap();
        assert_eq!(a, b);
    }
}
