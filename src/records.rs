//! Cart Records
//!
//! Serializable shape of a cart line, as written to durable storage.

use rusty_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    items::{CartItem, CartKey, ItemError, ItemType},
    prices::{PriceError, currency_from_code},
};

/// Errors converting a stored record back into a cart line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record describes an invalid item.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// The record's currency is not supported.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Cart Item Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    /// Catalog id
    pub id: String,

    /// Item type
    pub item_type: ItemType,

    /// Variant (size), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Unit price in minor units
    pub unit_price: i64,

    /// ISO currency code of the unit price
    pub currency: String,

    /// Number of units
    pub quantity: u32,
}

impl From<&CartItem> for CartItemRecord {
    fn from(item: &CartItem) -> Self {
        let key = item.key();

        Self {
            id: key.id().to_string(),
            item_type: key.item_type(),
            variant: key.variant().map(ToString::to_string),
            name: item.name().to_string(),
            unit_price: item.unit_price().to_minor_units(),
            currency: item.unit_price().currency().iso_alpha_code.to_string(),
            quantity: item.quantity(),
        }
    }
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = RecordError;

    fn try_from(record: CartItemRecord) -> Result<Self, Self::Error> {
        let currency = currency_from_code(&record.currency)?;

        let key = match record.variant {
            Some(variant) => CartKey::with_variant(record.id, record.item_type, variant),
            None => CartKey::new(record.id, record.item_type),
        };

        let item = CartItem::new(
            key,
            record.name,
            Money::from_minor(record.unit_price, currency),
        )?
        .with_quantity(record.quantity)?;

        Ok(item)
    }
}

/// Convert a slice of cart lines into records.
pub fn to_records<'a>(items: impl IntoIterator<Item = &'a CartItem>) -> Vec<CartItemRecord> {
    items.into_iter().map(CartItemRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::AUD;
    use testresult::TestResult;

    use super::*;

    fn record() -> CartItemRecord {
        CartItemRecord {
            id: "jersey-1".to_string(),
            item_type: ItemType::Merchandise,
            variant: Some("L".to_string()),
            name: "Home Jersey".to_string(),
            unit_price: 89_99,
            currency: "AUD".to_string(),
            quantity: 2,
        }
    }

    #[test]
    fn record_converts_into_item() -> TestResult {
        let item = CartItem::try_from(record())?;

        assert_eq!(
            item.key(),
            &CartKey::with_variant("jersey-1", ItemType::Merchandise, "L")
        );
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.unit_price(), &Money::from_minor(89_99, AUD));

        Ok(())
    }

    #[test]
    fn item_converts_back_into_same_record() -> TestResult {
        let item = CartItem::try_from(record())?;

        assert_eq!(CartItemRecord::from(&item), record());

        Ok(())
    }

    #[test]
    fn zero_quantity_record_is_rejected() {
        let result = CartItem::try_from(CartItemRecord {
            quantity: 0,
            ..record()
        });

        assert_eq!(result, Err(RecordError::Item(ItemError::ZeroQuantity)));
    }

    #[test]
    fn negative_price_record_is_rejected() {
        let result = CartItem::try_from(CartItemRecord {
            unit_price: -100,
            ..record()
        });

        assert!(matches!(
            result,
            Err(RecordError::Item(ItemError::NegativePrice(..)))
        ));
    }

    #[test]
    fn unknown_currency_record_is_rejected() {
        let result = CartItem::try_from(CartItemRecord {
            currency: "XYZ".to_string(),
            ..record()
        });

        assert!(matches!(
            result,
            Err(RecordError::Price(PriceError::UnknownCurrency(_)))
        ));
    }

    #[test]
    fn record_serializes_camel_case() -> TestResult {
        let json = serde_json::to_value(record())?;

        assert_eq!(json["itemType"], "merchandise");
        assert_eq!(json["unitPrice"], 8999);

        Ok(())
    }
}
