//! Money type for representing currency amounts
//!
//! Amounts are whole currency units stored as i64. The dashboard currency is
//! quoted without a minor unit, so sums and differences stay exact and only
//! ratios (margins, growth, percentages) are computed in floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Default currency symbol used by `Display`
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

/// A monetary amount in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from whole units
    ///
    /// # Examples
    /// ```
    /// use ledgerpulse::models::Money;
    /// let amount = Money::new(500_000);
    /// assert_eq!(amount.amount(), 500_000);
    /// ```
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw amount
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Get the amount as a float, for ratio computations
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// `self / total * 100`, or 0 when `total` is zero
    pub fn percentage_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.as_f64() / total.as_f64() * 100.0
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "250000", "250,000", "₦250,000" and "-1500". Fractional input
    /// such as "10.50" is rejected since amounts carry no minor unit.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s
            .strip_prefix(DEFAULT_CURRENCY_SYMBOL)
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s);

        let digits: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol and thousands separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let grouped = group_thousands(self.0.unsigned_abs());
        if self.is_negative() {
            format!("-{}{}", symbol, grouped)
        } else {
            format!("{}{}", symbol, grouped)
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY_SYMBOL))
    }
}

// Arithmetic saturates at the i64 bounds so aggregates never wrap or panic.
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(500_000)), "₦500,000");
        assert_eq!(format!("{}", Money::new(0)), "₦0");
        assert_eq!(format!("{}", Money::new(-20_000)), "-₦20,000");
        assert_eq!(format!("{}", Money::new(999)), "₦999");
        assert_eq!(format!("{}", Money::new(1_500_000)), "₦1,500,000");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::new(1234).format_with_symbol("$"), "$1,234");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(500);

        assert_eq!((a + b).amount(), 1500);
        assert_eq!((a - b).amount(), 500);
        assert_eq!((-a).amount(), -1000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let half = Money::new(i64::MAX / 2 + 1);
        assert_eq!(half + half, Money::new(i64::MAX));
        assert_eq!(-half - half - half, Money::new(i64::MIN));
        assert_eq!(-Money::new(i64::MIN), Money::new(i64::MAX));
        assert_eq!(Money::new(i64::MIN).abs(), Money::new(i64::MAX));

        let mut total = Money::new(i64::MAX);
        total += Money::new(1);
        assert_eq!(total, Money::new(i64::MAX));
        total -= Money::new(i64::MAX);
        total -= Money::new(i64::MAX);
        total -= Money::new(i64::MAX);
        assert_eq!(total, Money::new(i64::MIN));

        let sum: Money = vec![half, half, half].into_iter().sum();
        assert_eq!(sum, Money::new(i64::MAX));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("250000").unwrap().amount(), 250_000);
        assert_eq!(Money::parse("250,000").unwrap().amount(), 250_000);
        assert_eq!(Money::parse("₦250,000").unwrap().amount(), 250_000);
        assert_eq!(Money::parse("-1500").unwrap().amount(), -1500);
        assert!(Money::parse("10.50").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(Money::new(50).percentage_of(Money::new(200)), 25.0);
        assert_eq!(Money::new(50).percentage_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::new(100), Money::new(200), Money::new(300)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.amount(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::new(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
