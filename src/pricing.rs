//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::CartItem;

/// Errors that can occur while calculating line or cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total did not fit in minor units (item id).
    #[error("line total for {0} overflows")]
    Overflow(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates `unit_price × quantity` for a single line.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
pub fn line_total(item: &CartItem) -> Result<Money<'static, Currency>, TotalPriceError> {
    let price = item.unit_price();

    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(item.quantity()))
        .ok_or_else(|| TotalPriceError::Overflow(item.key().id().to_string()))?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculates the total price of a list of cart lines in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total overflowed.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn total_price(
    items: &[CartItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let total = items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            Ok::<_, TotalPriceError>(acc.add(line_total(item)?)?)
        })?;

    Ok(total)
}
