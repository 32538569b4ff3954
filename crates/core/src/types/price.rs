//! Type-safe price representation using decimal arithmetic.
//!
//! A [`Price`] is a non-negative, finite decimal amount. The only ways to
//! construct one are [`Price::parse`] and [`Price::new`], both of which
//! reject negative values, so a negative price can never reach storage.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a valid decimal number.
    #[error("price must be a valid number")]
    NotANumber,
    /// The amount is negative.
    #[error("price must not be negative")]
    Negative,
}

/// A non-negative product price in the store's standard currency unit
/// (dollars, not cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from an already-parsed decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a decimal number,
    /// or is negative.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount: Decimal = input.parse().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    /// Format for display with two decimal places (e.g., "49.99").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let price = Price::parse("49.99").unwrap();
        assert_eq!(price.amount(), Decimal::new(4999, 2));
    }

    #[test]
    fn test_parse_zero() {
        assert!(Price::parse("0").is_ok());
        assert!(Price::parse("0.00").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert!(Price::parse("  12.50 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("   "), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_not_a_number() {
        assert_eq!(Price::parse("abc"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("12.3.4"), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-5"), Err(PriceError::Negative));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(Price::parse("5").unwrap().to_string(), "5.00");
        assert_eq!(Price::parse("49.99").unwrap().to_string(), "49.99");
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Price::parse("19.95").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
