use super::currency::Currency;
use super::money::Amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Bolivares per unit of the reference currencies, as published by the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub usd: Decimal,
    pub eur: Decimal,
    pub as_of: DateTime<Utc>,
}

impl ExchangeRate {
    /// The rate for `currency`, if the feed covers it.
    pub fn for_currency(&self, currency: Currency) -> Option<Decimal> {
        match currency {
            Currency::Usd => Some(self.usd),
            Currency::Eur => Some(self.eur),
            Currency::Ves | Currency::Cny => None,
        }
    }
}

/// Latest known state of the exchange-rate feed.
///
/// Display code must treat anything but `Available` as "show plain amounts".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RateState {
    #[default]
    Loading,
    Available(ExchangeRate),
    Unavailable(String),
}

impl RateState {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Converts `amount` in `currency` to bolivares, when a rate applies.
    pub fn convert(&self, amount: Amount, currency: Currency) -> Option<Amount> {
        match self {
            Self::Available(rate) => rate
                .for_currency(currency)
                .map(|r| Amount::new(amount.value() * r)),
            Self::Loading | Self::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate() -> ExchangeRate {
        ExchangeRate {
            usd: dec!(36.50),
            eur: dec!(39.10),
            as_of: Utc::now(),
        }
    }

    #[test]
    fn test_convert_when_available() {
        let state = RateState::Available(rate());
        assert_eq!(
            state.convert(Amount::new(dec!(2)), Currency::Usd),
            Some(Amount::new(dec!(73.00)))
        );
        assert_eq!(
            state.convert(Amount::new(dec!(1)), Currency::Eur),
            Some(Amount::new(dec!(39.10)))
        );
    }

    #[test]
    fn test_no_conversion_for_uncovered_currency() {
        let state = RateState::Available(rate());
        assert_eq!(state.convert(Amount::new(dec!(2)), Currency::Ves), None);
        assert_eq!(state.convert(Amount::new(dec!(2)), Currency::Cny), None);
    }

    #[test]
    fn test_unavailable_never_converts() {
        let state = RateState::Unavailable("timeout".to_string());
        assert!(!state.is_available());
        assert_eq!(state.convert(Amount::new(dec!(2)), Currency::Usd), None);
        assert_eq!(RateState::Loading.convert(Amount::new(dec!(2)), Currency::Usd), None);
    }
}
