use crate::error::SplitError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A monetary value.
///
/// Wraps `rust_decimal::Decimal` so that invoice arithmetic never goes through
/// floating point. Results of the allocation engine are `Amount`s; they are not
/// clamped, so differences such as an unallocated remainder may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(pub Decimal);

/// The total cost of a line item.
///
/// Always non-negative. The only way to build one is through `Price::new`
/// (or `TryFrom<Decimal>`), which rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, SplitError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SplitError::InvalidInput(format!(
                "price must not be negative, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = SplitError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Price {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_amount(s)?)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl From<Price> for Amount {
    fn from(price: Price) -> Self {
        Self(price.0)
    }
}

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, SplitError> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(out_of_range)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, SplitError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or_else(out_of_range)
    }

    /// `self * numerator / denominator`. Fails on overflow or a zero denominator.
    pub fn checked_scale(self, numerator: Decimal, denominator: Decimal) -> Result<Self, SplitError> {
        self.0
            .checked_mul(numerator)
            .and_then(|v| v.checked_div(denominator))
            .map(Self)
            .ok_or_else(out_of_range)
    }

    /// Sums amounts, failing instead of overflowing.
    pub fn checked_sum<I: IntoIterator<Item = Self>>(iter: I) -> Result<Self, SplitError> {
        iter.into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Rounds to cents for display. Midpoints round away from zero and
    /// anything that rounds to zero is plain zero, never `-0.00`.
    pub fn to_cents(&self) -> Self {
        let cents = self
            .0
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        if cents.is_zero() { Self::ZERO } else { Self(cents) }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_cents().0)
    }
}

fn out_of_range() -> SplitError {
    SplitError::InvalidInput("amount out of range".to_string())
}

/// Parses a user-entered decimal amount.
///
/// Leading and trailing whitespace is ignored and a single decimal comma is
/// accepted (`"36,50"`). Empty, non-numeric and negative input is rejected.
pub fn parse_amount(text: &str) -> Result<Decimal, SplitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SplitError::InvalidInput("amount is empty".to_string()));
    }

    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1)
    } else {
        trimmed.to_string()
    };

    let value = Decimal::from_str(&normalized).map_err(|_| {
        SplitError::InvalidInput(format!("'{trimmed}' is not a valid amount"))
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(SplitError::InvalidInput(format!(
            "amount must not be negative, got {trimmed}"
        )));
    }

    Ok(value)
}

// Arithmetic so that `Amount` is usable as a value object
impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
