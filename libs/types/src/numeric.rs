//! Decimal helpers for prices, quantities and notionals
//!
//! Uses rust_decimal so that level prices compare exactly as published by
//! the venue (no floating-point equality surprises in level matching).

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::errors::BookError;

/// Seconds in one hour, used to scale per-second rates.
pub const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Parse a venue-published decimal string.
///
/// Accepts plain (`"101.25"`) and scientific (`"1.5e-4"`) notation.
pub fn parse_decimal(raw: &str) -> Result<Decimal, BookError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| BookError::InvalidDecimal(raw.to_string()))
}

/// Parse a decimal that must not be negative.
pub fn parse_non_negative(raw: &str, field: &'static str) -> Result<Decimal, BookError> {
    let value = parse_decimal(raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BookError::NegativeValue {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Convert a float (e.g. a time span in seconds) into a decimal.
///
/// Returns `None` for NaN or infinite inputs.
pub fn from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}
