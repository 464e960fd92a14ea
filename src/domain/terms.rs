use super::money::{Amount, parse_amount};
use crate::error::SplitError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the `value` of a tax or tip term is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermMode {
    /// `value` is a percent of the subtotal.
    #[default]
    Percentage,
    /// `value` is an absolute amount, applied regardless of the subtotal.
    Fixed,
}

impl FromStr for TermMode {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "fixed" | "amount" => Ok(Self::Fixed),
            other => Err(SplitError::InvalidInput(format!(
                "unknown tax/tip mode '{other}', expected 'percentage' or 'fixed'"
            ))),
        }
    }
}

impl fmt::Display for TermMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage => f.write_str("percentage"),
            Self::Fixed => f.write_str("fixed"),
        }
    }
}

/// A tax or tip configuration. `value` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaxTipTerm {
    value: Decimal,
    mode: TermMode,
}

impl TaxTipTerm {
    pub const NONE: Self = Self {
        value: Decimal::ZERO,
        mode: TermMode::Percentage,
    };

    pub fn new(value: Decimal, mode: TermMode) -> Result<Self, SplitError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(SplitError::InvalidInput(format!(
                "tax/tip value must not be negative, got {value}"
            )));
        }
        Ok(Self { value, mode })
    }

    pub fn percentage(value: Decimal) -> Result<Self, SplitError> {
        Self::new(value, TermMode::Percentage)
    }

    pub fn fixed(value: Decimal) -> Result<Self, SplitError> {
        Self::new(value, TermMode::Fixed)
    }

    /// Parses form input. A blank field means "no tax/tip".
    pub fn parse(text: &str, mode: TermMode) -> Result<Self, SplitError> {
        if text.trim().is_empty() {
            return Ok(Self {
                value: Decimal::ZERO,
                mode,
            });
        }
        Self::new(parse_amount(text)?, mode)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn mode(&self) -> TermMode {
        self.mode
    }

    /// The amount this term adds on top of `subtotal`.
    pub fn apply(&self, subtotal: Amount) -> Result<Amount, SplitError> {
        match self.mode {
            TermMode::Percentage => subtotal.checked_scale(self.value, dec!(100)),
            TermMode::Fixed => Ok(Amount::new(self.value)),
        }
    }
}
