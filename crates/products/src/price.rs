//! Fixed-point product price.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use catalog_core::{ValidationError, ValidationResult, ValueObject};

/// Total digits the storage column accepts (`NUMERIC(10, 2)`).
pub const PRICE_PRECISION: u32 = 10;

/// Fractional digits every price carries.
pub const PRICE_SCALE: u32 = 2;

/// Non-negative price with exactly two fractional digits.
///
/// Extra precision is rounded half away from zero, which matches what a
/// `NUMERIC(10, 2)` column does on insert. This is plain fixed-point
/// rounding, not currency arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl ValueObject for Price {}

impl Price {
    pub const ZERO: Price = Price(Decimal::from_parts(0, 0, 0, false, PRICE_SCALE));

    /// Build a price from an arbitrary decimal, rejecting negatives.
    pub fn new(value: Decimal) -> ValidationResult<Self> {
        if value < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(value.to_string()));
        }

        let mut rounded =
            value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(PRICE_SCALE);
        Ok(Self(rounded))
    }

    /// Price from an integer count of hundredths (`1250` is `12.50`).
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), PRICE_SCALE))
    }

    /// Parse a textual decimal such as `"12.5"`, `"0.999"` or `"1e2"`.
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| ValidationError::invalid_price(format!("{raw:?}: {e}")))?;
        Self::new(value)
    }

    /// Read a JSON number.
    ///
    /// Goes through the number's shortest textual form so `19.99` stays
    /// `19.99` instead of picking up binary floating point noise.
    pub fn from_json_number(number: &serde_json::Number) -> ValidationResult<Self> {
        Self::parse(&number.to_string())
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether the value fits in `PRICE_PRECISION` total digits.
    pub fn fits_precision(&self) -> bool {
        let limit = Decimal::from(10_i64.pow(PRICE_PRECISION - PRICE_SCALE));
        self.0 < limit
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}
