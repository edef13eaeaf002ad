//! Item prices using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty.
    #[error("price is required")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The price is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than two digits after the decimal point.
    #[error("price can have at most 2 decimal places")]
    TooPrecise,
    /// Larger than the `NUMERIC(10,2)` column allows.
    #[error("price must be less than 100,000,000")]
    TooLarge,
}

/// A non-negative amount in dollars with at most two decimal places.
///
/// Backed by `NUMERIC(10,2)` in the database.
///
/// ```
/// use grocery_core::Price;
///
/// let price = Price::parse("3.5").unwrap();
/// assert_eq!(price.to_string(), "$3.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest value that fits in `NUMERIC(10,2)`: 9_999_999_999 hundredths.
    pub const MAX: Self = Self(Decimal::from_parts(1_410_065_407, 2, 0, false, 2));

    /// Parse a price from user input. A leading `$` is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] when the input is empty, not a number, negative,
    /// has more than two decimal places, or exceeds [`Price::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let s = s.strip_prefix('$').unwrap_or(s).trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(s).map_err(|_| PriceError::NotANumber)?;
        // `Decimal::from_str` rounds past 28 significant digits, so the
        // written fraction is checked before the value is.
        if let Some((_, fraction)) = s.split_once('.')
            && fraction.trim_end_matches('0').len() > 2
        {
            return Err(PriceError::TooPrecise);
        }
        Self::from_decimal(amount)
    }

    /// Validate an already-parsed decimal.
    ///
    /// # Errors
    ///
    /// Same constraints as [`Price::parse`].
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge);
        }

        let mut amount = amount.normalize();
        amount.rescale(2);
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

impl<'a> std::iter::Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Price::parse("4").unwrap().to_string(), "$4.00");
        assert_eq!(Price::parse("4.5").unwrap().to_string(), "$4.50");
        assert_eq!(Price::parse("0.99").unwrap().to_string(), "$0.99");
    }

    #[test]
    fn test_parse_accepts_dollar_sign() {
        assert_eq!(Price::parse(" $2.25 ").unwrap().to_string(), "$2.25");
    }

    #[test]
    fn test_parse_trailing_zeros_are_not_extra_precision() {
        assert_eq!(Price::parse("1.5000").unwrap().to_string(), "$1.50");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("$"), Err(PriceError::Empty));
        assert_eq!(Price::parse("cheap"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
        assert_eq!(Price::parse("1.999"), Err(PriceError::TooPrecise));
        assert_eq!(
            Price::parse("1.0000000000000000000000000000001"),
            Err(PriceError::TooPrecise)
        );
        assert_eq!(
            Price::parse("0.000000000000000000000000000009"),
            Err(PriceError::TooPrecise)
        );
        assert_eq!(Price::parse("100000000"), Err(PriceError::TooLarge));
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
        assert_eq!(Price::parse("-0").unwrap().to_string(), "$0.00");
    }

    #[test]
    fn test_max() {
        assert_eq!(Price::parse("99999999.99").unwrap(), Price::MAX);
    }

    #[test]
    fn test_sum() {
        let prices = [Price::parse("1.25").unwrap(), Price::parse("2.50").unwrap()];
        let total: Price = prices.iter().sum();
        assert_eq!(total.to_string(), "$3.75");

        let empty: [Price; 0] = [];
        assert_eq!(empty.iter().sum::<Price>().to_string(), "$0.00");
    }
}
