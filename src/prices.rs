//! Prices
//!
//! Parsing of `"AMOUNT CURRENCY"` price strings and currency codes.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{AUD, Currency, EUR, GBP, NZD, USD},
};
use thiserror::Error;

/// Decimal places every supported currency prices in.
const MINOR_UNIT_SCALE: u32 = 2;

/// Price parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Negative amounts are never valid prices
    #[error("Negative price: {0}")]
    NegativePrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported currency by its ISO alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] if the code is not supported.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "AUD" => Ok(AUD),
        "NZD" => Ok(NZD),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(PriceError::UnknownCurrency(code.to_string())),
    }
}

/// Parse price string (e.g., "89.99 AUD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal, is negative, has more decimal places than
/// the currency's minor unit, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::NegativePrice(s.to_string()));
    }

    if amount.scale() > MINOR_UNIT_SCALE {
        return Err(PriceError::InvalidPrice(format!(
            "More than {MINOR_UNIT_SCALE} decimal places: {s}"
        )));
    }

    let currency = currency_from_code(currency_code)?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a price string straight into [`Money`].
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}
