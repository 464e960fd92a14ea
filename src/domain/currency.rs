use super::money::Amount;
use crate::error::SplitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currencies an invoice can be entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Ves,
    Eur,
    Cny,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Self::Usd, Self::Ves, Self::Eur, Self::Cny];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Ves => "VES",
            Self::Eur => "EUR",
            Self::Cny => "CNY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Ves => "Bolivares",
            Self::Eur => "Euro",
            Self::Cny => "Chinese Yuan",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Ves => "Bs",
            Self::Eur => "€",
            Self::Cny => "¥",
        }
    }

    /// Formats `amount` as symbol followed by the amount in cents, e.g. `$38.50`.
    pub fn format(&self, amount: Amount) -> String {
        format!("{}{}", self.symbol(), amount)
    }
}

impl FromStr for Currency {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| SplitError::InvalidInput(format!("unsupported currency '{code}'")))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::Eur);
        assert!(matches!(
            "GBP".parse::<Currency>(),
            Err(SplitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_format() {
        assert_eq!(Currency::Usd.format(Amount::new(dec!(38.5))), "$38.50");
        assert_eq!(Currency::Ves.format(Amount::new(dec!(1))), "Bs1.00");
    }
}
