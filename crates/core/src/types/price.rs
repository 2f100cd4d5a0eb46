//! Type-safe price representation using decimal arithmetic.
//!
//! Prices never go through floating point: catalog prices, line subtotals and
//! cart totals are all `rust_decimal::Decimal` values, rounded to two decimal
//! places only when rendered.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
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

    /// Create a price in US dollars.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// A zero amount in the default currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::usd(Decimal::ZERO)
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at the largest representable amount instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Amount rounded half away from zero to exactly two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        amount
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.rounded())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        debug_assert_eq!(
            self.currency_code, rhs.currency_code,
            "cannot add prices in different currencies"
        );
        Self::new(self.amount.saturating_add(rhs.amount), self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_amount() {
        assert_eq!(Price::usd(Decimal::from(349)).display(), "$349.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        let price = Price::usd(Decimal::new(10_005, 3)); // 10.005
        assert_eq!(price.display(), "$10.01");
    }

    #[test]
    fn test_times() {
        let price = Price::usd(Decimal::from(159)).times(3);
        assert_eq!(price.amount, Decimal::from(477));
    }

    #[test]
    fn test_sum() {
        let total: Price = [349, 129, 69]
            .into_iter()
            .map(|amount| Price::usd(Decimal::from(amount)))
            .sum();
        assert_eq!(total.display(), "$547.00");
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = Price::usd(Decimal::MAX);
        assert_eq!(huge.times(2).amount, Decimal::MAX);
        assert_eq!((huge + Price::usd(Decimal::ONE)).amount, Decimal::MAX);

        let total: Price = [huge, huge.times(u32::MAX)].into_iter().sum();
        assert_eq!(total.amount, Decimal::MAX);
        assert!(total.display().starts_with('$'));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::zero());
        assert_eq!(total.display(), "$0.00");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::GBP).display(), "£1.00");
        assert_eq!(CurrencyCode::EUR.code(), "EUR");
    }

    #[test]
    fn test_serde_amount_as_string() {
        let price = Price::usd(Decimal::from(69));
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, r#"{"amount":"69","currency_code":"USD"}"#);
    }
}
