//! Cart
//!
//! The cart is a plain state struct. Mutations are synchronous and never touch storage;
//! see [`manager::CartManager`] for the persisted wrapper.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::{CartItem, CartKey},
    pricing::{TotalPriceError, total_price},
};

pub mod manager;

/// Errors related to cart mutation or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item key, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(CartKey, &'static str, &'static str),

    /// Total calculation failed.
    #[error(transparent)]
    Total(#[from] TotalPriceError),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    index: FxHashMap<CartKey, usize>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// Create a cart from previously stored lines.
    ///
    /// Lines sharing a key are merged by summing their quantities.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl IntoIterator<Item = CartItem>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        for item in items {
            cart.check_currency(&item)?;

            match cart.index.get(item.key()).copied() {
                Some(pos) => {
                    if let Some(existing) = cart.items.get_mut(pos) {
                        existing.set_quantity(existing.quantity().saturating_add(item.quantity()));
                    }
                }
                None => {
                    cart.push(item);
                }
            }
        }

        Ok(cart)
    }

    /// Add one unit of an item.
    ///
    /// If a line with the same key exists its quantity is incremented, otherwise the item is
    /// appended with a quantity of one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is priced in another currency. The
    /// cart is left unchanged.
    pub fn add(&mut self, mut item: CartItem) -> Result<(), CartError> {
        self.check_currency(&item)?;

        match self.index.get(item.key()).copied() {
            Some(pos) => {
                if let Some(existing) = self.items.get_mut(pos) {
                    existing.increment();
                }
            }
            None => {
                item.set_quantity(1);
                self.push(item);
            }
        }

        Ok(())
    }

    /// Remove every line matching `key`. Returns `true` if anything was removed.
    pub fn remove(&mut self, key: &CartKey) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.key() != key);

        if self.items.len() == before {
            return false;
        }

        self.reindex();

        true
    }

    /// Set the quantity of the line matching `key`.
    ///
    /// Zero or negative quantities remove the line. Returns the updated line, or `None` if the
    /// line was removed or never existed.
    pub fn update_quantity(&mut self, key: &CartKey, quantity: i64) -> Option<&CartItem> {
        if quantity <= 0 {
            self.remove(key);

            return None;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.set_existing(key, quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Calculate the total of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there was a money arithmetic or overflow error.
    pub fn total(&self) -> Result<Money<'static, Currency>, CartError> {
        Ok(total_price(&self.items, self.currency)?)
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Look up the line for a key.
    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.index.get(key).and_then(|pos| self.items.get(*pos))
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get the number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_currency(&self, item: &CartItem) -> Result<(), CartError> {
        let item_currency = item.unit_price().currency();

        if item_currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                item.key().clone(),
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }

    fn push(&mut self, item: CartItem) {
        self.index.insert(item.key().clone(), self.items.len());
        self.items.push(item);
    }

    fn set_existing(&mut self, key: &CartKey, quantity: u32) -> Option<&CartItem> {
        let pos = *self.index.get(key)?;
        let item = self.items.get_mut(pos)?;

        item.set_quantity(quantity);

        Some(&*item)
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.key().clone(), pos))
            .collect();
    }
}
