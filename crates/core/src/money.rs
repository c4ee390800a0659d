use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Rounds to two decimal places; bank exports never carry sub-cent precision.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn amount(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn from_decimal_rounds_to_cents() {
        let m = Money::from_decimal(Decimal::from_str("1.005").unwrap());
        assert_eq!(m.amount(), Decimal::from_str("1.00").unwrap());
    }

    #[test]
    fn zero_is_zero() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn negative_detection() {
        let m = Money::from_decimal(Decimal::from_str("-4.50").unwrap());
        assert!(m.is_negative());
        assert!(!(-m).is_negative());
    }

    #[test]
    fn display_formats_two_places() {
        let m = Money::from_decimal(Decimal::from_str("42").unwrap());
        assert_eq!(m.to_string(), "$42.00");
    }

    #[test]
    fn serializes_as_bare_decimal() {
        let m = Money::from_decimal(Decimal::from_str("-4.5").unwrap());
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"-4.5\"");
    }
}
