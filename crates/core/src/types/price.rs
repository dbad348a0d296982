//! Artwork price type.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing an [`ArtworkPrice`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// The input string is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
}

/// A non-negative artwork price in US dollars.
///
/// Uses decimal arithmetic rather than floats so `1234.56` survives the trip
/// through the hosted `artworks.price` numeric column unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkPrice(Decimal);

impl ArtworkPrice {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from a form input string like `"1234.56"`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-numeric or negative input.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a dollar sign and thousands separators,
    /// e.g. `$1,250` or `$1,250.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let normalized = self.0.normalize();
        let whole = normalized.trunc();
        let frac = normalized.fract();

        let mut digits = whole.abs().to_string();
        let mut grouped = String::new();
        while digits.len() > 3 {
            let split = digits.len() - 3;
            grouped.insert_str(0, &format!(",{}", &digits[split..]));
            digits.truncate(split);
        }
        grouped.insert_str(0, &digits);

        if frac.is_zero() {
            format!("${grouped}")
        } else {
            // Keep exactly two fractional digits for cents.
            let cents = (frac * Decimal::ONE_HUNDRED)
                .round()
                .to_i64()
                .unwrap_or(0)
                .abs();
            format!("${grouped}.{cents:02}")
        }
    }
}

impl fmt::Display for ArtworkPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            ArtworkPrice::parse("-10"),
            Err(PriceError::Negative)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            ArtworkPrice::parse("ten dollars"),
            Err(PriceError::NotANumber)
        ));
        assert!(matches!(ArtworkPrice::parse(""), Err(PriceError::NotANumber)));
    }

    #[test]
    fn test_zero_is_allowed() {
        let price = ArtworkPrice::parse("0").unwrap();
        assert_eq!(price.display(), "$0");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(ArtworkPrice::parse("950").unwrap().display(), "$950");
        assert_eq!(ArtworkPrice::parse("1250").unwrap().display(), "$1,250");
        assert_eq!(
            ArtworkPrice::parse("1234567").unwrap().display(),
            "$1,234,567"
        );
    }

    #[test]
    fn test_display_keeps_cents() {
        assert_eq!(ArtworkPrice::parse("1250.5").unwrap().display(), "$1,250.50");
        assert_eq!(ArtworkPrice::parse("99.99").unwrap().display(), "$99.99");
    }

    #[test]
    fn test_serde_is_transparent() {
        let price = ArtworkPrice::parse("1234.56").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let back: ArtworkPrice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
