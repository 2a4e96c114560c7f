//! Types that can be used in other crates

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ParsingError;

/// Number of fractional digits gateways expect for major-unit amounts
const MAJOR_UNIT_SCALE: u32 = 2;

/// Amount in major units rendered as a fixed two-decimal string, e.g. `"10.50"`.
///
/// Uses a period as decimal separator and no thousands grouping.
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, PartialEq, Eq)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// Formats an amount given as a decimal string, e.g. `"10.5"`
    pub fn from_major_unit_as_str(amount: &str) -> Result<Self, error_stack::Report<ParsingError>> {
        let amount_decimal = amount.trim().parse::<Decimal>().map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;
        Ok(Self::from_decimal(amount_decimal))
    }

    fn from_decimal(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(MAJOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MAJOR_UNIT_SCALE);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Self(rounded.to_string())
    }

    /// Get string amount from struct
    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl Display for StringMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod amount_conversion_tests {
    use super::*;

    #[test]
    fn amount_is_padded_to_two_decimals() {
        let amount = StringMajorUnit::from_major_unit_as_str("10").unwrap();
        assert_eq!(amount.get_amount_as_string(), "10.00");
        let amount = StringMajorUnit::from_major_unit_as_str("10.5").unwrap();
        assert_eq!(amount.get_amount_as_string(), "10.50");
    }

    #[test]
    fn amount_has_no_grouping() {
        let amount = StringMajorUnit::from_major_unit_as_str("1234567.891").unwrap();
        assert_eq!(amount.to_string(), "1234567.89");
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        let amount = StringMajorUnit::from_major_unit_as_str("0.125").unwrap();
        assert_eq!(amount.to_string(), "0.13");
        let amount = StringMajorUnit::from_major_unit_as_str("-0.125").unwrap();
        assert_eq!(amount.to_string(), "-0.13");
    }

    #[test]
    fn rounding_to_zero_drops_sign() {
        let amount = StringMajorUnit::from_major_unit_as_str("-0.001").unwrap();
        assert_eq!(amount.to_string(), "0.00");
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        assert!(StringMajorUnit::from_major_unit_as_str("ten").is_err());
        assert!(StringMajorUnit::from_major_unit_as_str("NaN").is_err());
    }
}
