//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront prices are US dollars. Amounts never pass through floating
//! point; rounding to cents is explicit and rounds half away from zero.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A USD price.
///
/// Serialized as a decimal string (`"49.99"`) so that catalog files and
/// session payloads round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The dollar amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to whole cents, half away from zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply by a rate (e.g. a tax rate) and round to cents.
    #[must_use]
    pub fn apply_rate(self, rate: Decimal) -> Self {
        Self(self.0 * rate).round_to_cents()
    }

    /// Subtract, returning `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Price {
    /// Formats as `$12.34` (always two decimal places).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.round_to_cents().0;
        if cents.is_sign_negative() && !cents.is_zero() {
            write!(f, "-${:.2}", cents.abs())
        } else {
            write!(f, "${cents:.2}")
        }
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::from_cents(5000).to_string(), "$50.00");
        assert_eq!(Price::from_cents(999).to_string(), "$9.99");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn test_apply_rate_rounds_half_away_from_zero() {
        // 0.3125 * 0.08 = 0.025 -> 0.03
        let price = Price::new(Decimal::new(3125, 4));
        assert_eq!(price.apply_rate(Decimal::new(8, 2)), Price::from_cents(3));
    }

    #[test]
    fn test_multiply_and_sum() {
        let total: Price = [Price::from_cents(1999) * 2, Price::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(3999));
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let price = Price::from_cents(4999);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"49.99\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_cents(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
    }
}
