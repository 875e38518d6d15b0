//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are authored in the content store as plain numbers in the shop's
//! currency. Display follows the storefront's locale conventions: currency
//! symbol prefix, thousands grouped with commas, and a fixed number of
//! fraction digits per currency (TWD shows none, so `790` renders `NT$790`).

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price, rejecting negative amounts.
    ///
    /// ```
    /// use kiyone_core::{CurrencyCode, Price};
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Price::non_negative(Decimal::from(790), CurrencyCode::TWD).is_some());
    /// assert!(Price::non_negative(Decimal::from(-1), CurrencyCode::TWD).is_none());
    /// ```
    #[must_use]
    pub fn non_negative(amount: Decimal, currency_code: CurrencyCode) -> Option<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return None;
        }
        Some(Self::new(amount, currency_code))
    }

    /// Format for display (e.g., `NT$1,290` or `$19.99`).
    #[must_use]
    pub fn format(&self) -> String {
        let digits = self.currency_code.display_fraction_digits();
        let mut rounded = self
            .amount
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(digits);

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut out = format!("{sign}{}{}", self.currency_code.symbol(), group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Insert a comma between every group of three integer digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency codes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    TWD,
    USD,
    EUR,
    GBP,
    JPY,
}

impl CurrencyCode {
    /// Display symbol (zh-TW locale conventions).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::TWD => "NT$",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY => "¥",
        }
    }

    /// ISO code string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TWD => "TWD",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::JPY => "JPY",
        }
    }

    /// Fraction digits shown to shoppers.
    ///
    /// TWD prices are whole dollars on the storefront even though ISO 4217
    /// defines two minor digits for it.
    #[must_use]
    pub const fn display_fraction_digits(self) -> u32 {
        match self {
            Self::TWD | Self::JPY => 0,
            Self::USD | Self::EUR | Self::GBP => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twd(amount: i64) -> Price {
        Price::new(Decimal::from(amount), CurrencyCode::TWD)
    }

    #[test]
    fn test_format_twd_has_no_fraction_digits() {
        assert_eq!(twd(790).format(), "NT$790");
        assert_eq!(twd(0).format(), "NT$0");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(twd(1290).format(), "NT$1,290");
        assert_eq!(twd(1_234_567).format(), "NT$1,234,567");
        assert_eq!(twd(100_000).format(), "NT$100,000");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        let price = Price::new(Decimal::new(7905, 1), CurrencyCode::TWD);
        assert_eq!(price.format(), "NT$791");

        let price = Price::new(Decimal::new(7904, 1), CurrencyCode::TWD);
        assert_eq!(price.format(), "NT$790");
    }

    #[test]
    fn test_format_pads_two_digit_currencies() {
        let price = Price::new(Decimal::new(199, 1), CurrencyCode::USD);
        assert_eq!(price.format(), "$19.90");

        let price = Price::new(Decimal::from(1500), CurrencyCode::EUR);
        assert_eq!(price.format(), "€1,500.00");
    }

    #[test]
    fn test_display_matches_format() {
        assert_eq!(twd(790).to_string(), "NT$790");
    }

    #[test]
    fn test_non_negative_rejects_negative_amounts() {
        assert!(Price::non_negative(Decimal::from(-5), CurrencyCode::TWD).is_none());
        assert_eq!(
            Price::non_negative(Decimal::ZERO, CurrencyCode::TWD),
            Some(twd(0))
        );
    }

    #[test]
    fn test_default_currency_is_twd() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::TWD);
        assert_eq!(CurrencyCode::TWD.code(), "TWD");
    }
}
