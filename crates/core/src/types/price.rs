//! Currency handling and display-price conversion.
//!
//! All prices are stored and computed in the store's base currency (USD).
//! Conversion to the shopper's display currency happens at the edge via
//! [`convert_price`] and is never persisted.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 5] = [Self::USD, Self::EUR, Self::GBP, Self::CAD, Self::AUD];

    /// Currency symbol for display (e.g., "$19.99").
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }

    /// Compiled-in fallback rate (base currency units -> this currency).
    ///
    /// Used when no fresher rate is available from the exchange service.
    #[must_use]
    pub fn fallback_rate(self) -> Decimal {
        match self {
            Self::USD => Decimal::ONE,
            Self::EUR => Decimal::new(92, 2),  // 0.92
            Self::GBP => Decimal::new(79, 2),  // 0.79
            Self::CAD => Decimal::new(136, 2), // 1.36
            Self::AUD => Decimal::new(152, 2), // 1.52
        }
    }
}

/// A set of exchange rates keyed by display currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: HashMap<Currency, Decimal>,
}

impl ExchangeRates {
    /// Build a rate table from the compiled-in fallback rates.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            rates: Currency::ALL
                .iter()
                .map(|&c| (c, c.fallback_rate()))
                .collect(),
        }
    }

    /// Build a rate table from fetched values, filling gaps with fallbacks.
    #[must_use]
    pub fn from_fetched(fetched: HashMap<Currency, Decimal>) -> Self {
        let mut rates = Self::fallback().rates;
        rates.extend(fetched);
        Self { rates }
    }

    /// Rate for a display currency.
    #[must_use]
    pub fn rate(&self, currency: Currency) -> Decimal {
        self.rates
            .get(&currency)
            .copied()
            .unwrap_or_else(|| currency.fallback_rate())
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Convert a base-currency amount into a display currency.
///
/// The result is rounded to two decimal places for display. Converted
/// values are never written back to storage.
#[must_use]
pub fn convert_price(amount: Decimal, rate: Decimal) -> Decimal {
    (amount * rate).round_dp(2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_rate_is_identity() {
        let rates = ExchangeRates::fallback();
        let amount = Decimal::new(1999, 2); // 19.99
        assert_eq!(convert_price(amount, rates.rate(Currency::USD)), amount);
    }

    #[test]
    fn test_convert_rounds_to_cents() {
        // 19.99 * 0.92 = 18.3908 -> 18.39
        let amount = Decimal::new(1999, 2);
        let converted = convert_price(amount, Currency::EUR.fallback_rate());
        assert_eq!(converted, Decimal::new(1839, 2));
    }

    #[test]
    fn test_fetched_rates_override_fallback() {
        let mut fetched = HashMap::new();
        fetched.insert(Currency::EUR, Decimal::ONE);
        let rates = ExchangeRates::from_fetched(fetched);
        assert_eq!(rates.rate(Currency::EUR), Decimal::ONE);
        // Untouched currencies keep fallback values
        assert_eq!(rates.rate(Currency::GBP), Currency::GBP.fallback_rate());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::USD.symbol(), "$");
        assert_eq!(Currency::GBP.code(), "GBP");
    }
}
