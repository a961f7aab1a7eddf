//! Items
//!
//! Purchasable cart lines and the typed identity used to merge them.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing cart items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    /// The catalog id was empty.
    #[error("item id must not be empty")]
    EmptyId,

    /// The unit price was below zero (id, minor units).
    #[error("item {0} has negative price {1}")]
    NegativePrice(String, i64),

    /// A quantity of zero was requested.
    #[error("item quantity must be at least 1")]
    ZeroQuantity,

    /// The item type could not be parsed.
    #[error("unknown item type: {0}")]
    UnknownItemType(String),
}

/// Kind of catalog entry a cart line refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    /// Club merchandise (jerseys, caps, ...)
    Merchandise,

    /// Season memberships
    Membership,

    /// Clubroom food and drink orders
    Clubroom,

    /// Event tickets
    Event,

    /// Bulk team or group orders
    GroupOrder,

    /// Fundraising donations
    Donation,
}

impl ItemType {
    /// Every item type, in catalog order.
    pub const ALL: [ItemType; 6] = [
        ItemType::Merchandise,
        ItemType::Membership,
        ItemType::Clubroom,
        ItemType::Event,
        ItemType::GroupOrder,
        ItemType::Donation,
    ];

    /// Stable kebab-case name of the item type.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Merchandise => "merchandise",
            ItemType::Membership => "membership",
            ItemType::Clubroom => "clubroom",
            ItemType::Event => "event",
            ItemType::GroupOrder => "group-order",
            ItemType::Donation => "donation",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|item_type| item_type.as_str() == s)
            .ok_or_else(|| ItemError::UnknownItemType(s.to_string()))
    }
}

/// Identity of a cart line.
///
/// Two items with equal keys merge into one line. The size/variant is part of the
/// identity, so a medium and a large jersey are separate lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartKey {
    id: String,
    item_type: ItemType,
    variant: Option<String>,
}

impl CartKey {
    /// Create a key for an item without a variant.
    pub fn new(id: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            item_type,
            variant: None,
        }
    }

    /// Create a key for a specific variant of an item.
    pub fn with_variant(
        id: impl Into<String>,
        item_type: ItemType,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            item_type,
            variant: Some(variant.into()),
        }
    }

    /// Catalog id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Item type
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Variant, if any
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl Display for CartKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.variant {
            Some(variant) => write!(f, "{}:{} ({variant})", self.item_type, self.id),
            None => write!(f, "{}:{}", self.item_type, self.id),
        }
    }
}

/// A validated line in the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    key: CartKey,
    name: String,
    unit_price: Money<'static, Currency>,
    quantity: u32,
}

impl CartItem {
    /// Create a cart item with a quantity of one.
    ///
    /// # Errors
    ///
    /// - [`ItemError::EmptyId`]: the key has an empty id.
    /// - [`ItemError::NegativePrice`]: the unit price is below zero.
    pub fn new(
        key: CartKey,
        name: impl Into<String>,
        unit_price: Money<'static, Currency>,
    ) -> Result<Self, ItemError> {
        if key.id.trim().is_empty() {
            return Err(ItemError::EmptyId);
        }

        let minor = unit_price.to_minor_units();

        if minor < 0 {
            return Err(ItemError::NegativePrice(key.id, minor));
        }

        Ok(Self {
            key,
            name: name.into(),
            unit_price,
            quantity: 1,
        })
    }

    /// Replace the quantity of the item.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::ZeroQuantity`] if `quantity` is zero.
    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, ItemError> {
        if quantity == 0 {
            return Err(ItemError::ZeroQuantity);
        }

        self.quantity = quantity;

        Ok(self)
    }

    /// Identity of the line
    pub fn key(&self) -> &CartKey {
        &self.key
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of a single unit
    pub fn unit_price(&self) -> &Money<'static, Currency> {
        &self.unit_price
    }

    /// Number of units on the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        debug_assert!(quantity > 0, "cart lines never hold zero units");

        self.quantity = quantity;
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::AUD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn item_type_round_trips_through_str() -> TestResult {
        for item_type in ItemType::ALL {
            assert_eq!(item_type.as_str().parse::<ItemType>()?, item_type);
        }

        Ok(())
    }

    #[test]
    fn item_type_rejects_unknown_names() {
        assert_eq!(
            "raffle".parse::<ItemType>(),
            Err(ItemError::UnknownItemType("raffle".to_string()))
        );
    }

    #[test]
    fn keys_with_ambiguous_dashes_stay_distinct() {
        let left = CartKey::new("1-2", ItemType::Event);
        let right = CartKey::new("1", ItemType::Event);

        assert_ne!(left, right);
        assert_ne!(left.to_string(), right.to_string());
    }

    #[test]
    fn variant_is_part_of_identity() {
        let medium = CartKey::with_variant("jersey-1", ItemType::Merchandise, "M");
        let large = CartKey::with_variant("jersey-1", ItemType::Merchandise, "L");
        let plain = CartKey::new("jersey-1", ItemType::Merchandise);

        assert_ne!(medium, large);
        assert_ne!(medium, plain);
        assert_eq!(medium.variant(), Some("M"));
    }

    #[test]
    fn new_item_defaults_to_one_unit() -> TestResult {
        let item = CartItem::new(
            CartKey::new("cap-1", ItemType::Merchandise),
            "Club Cap",
            Money::from_minor(25_00, AUD),
        )?;

        assert_eq!(item.quantity(), 1);
        assert_eq!(item.name(), "Club Cap");
        assert_eq!(item.unit_price(), &Money::from_minor(25_00, AUD));

        Ok(())
    }

    #[test]
    fn new_item_rejects_negative_price() {
        let result = CartItem::new(
            CartKey::new("cap-1", ItemType::Merchandise),
            "Club Cap",
            Money::from_minor(-1, AUD),
        );

        assert_eq!(
            result,
            Err(ItemError::NegativePrice("cap-1".to_string(), -1))
        );
    }

    #[test]
    fn new_item_rejects_empty_id() {
        let result = CartItem::new(
            CartKey::new("  ", ItemType::Donation),
            "Anonymous",
            Money::from_minor(10_00, AUD),
        );

        assert_eq!(result, Err(ItemError::EmptyId));
    }

    #[test]
    fn with_quantity_rejects_zero() -> TestResult {
        let item = CartItem::new(
            CartKey::new("cap-1", ItemType::Merchandise),
            "Club Cap",
            Money::from_minor(25_00, AUD),
        )?;

        assert_eq!(item.with_quantity(0), Err(ItemError::ZeroQuantity));

        Ok(())
    }

    #[test]
    fn free_items_are_allowed() -> TestResult {
        let item = CartItem::new(
            CartKey::new("junior-rego", ItemType::Membership),
            "Junior Registration",
            Money::from_minor(0, AUD),
        )?;

        assert_eq!(item.unit_price().to_minor_units(), 0);

        Ok(())
    }
}
