//! Cart manager.
//!
//! Wraps a [`Cart`] and persists it after every mutation. The in-memory cart is always
//! updated first; a failed save is reported but never rolls the change back.

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError},
    items::{CartItem, CartKey},
    persistence::{CartPersistence, StorageStatus},
    records::{CartItemRecord, to_records},
};

/// A cart kept in sync with durable storage.
#[derive(Debug)]
pub struct CartManager<P> {
    cart: Cart,
    store: P,
}

impl<P: CartPersistence> CartManager<P> {
    /// Rehydrate the cart from storage.
    ///
    /// Stored lines that fail validation, or are in another currency, are treated as corrupt
    /// data and the cart starts empty. If the store cannot be read the cart also starts
    /// empty and the failure is reported.
    #[tracing::instrument(name = "cart.open", skip(store, currency), fields(currency = currency.iso_alpha_code))]
    pub fn open(store: P, currency: &'static Currency) -> (Self, StorageStatus) {
        let (cart, status) = match store.load() {
            Ok(records) => (rehydrate(records, currency), StorageStatus::InSync),
            Err(error) => {
                warn!(%error, "failed to load cart, starting empty");

                (Cart::new(currency), StorageStatus::Degraded(error))
            }
        };

        debug!(lines = cart.len(), "cart opened");

        (Self { cart, store }, status)
    }

    /// Current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of an item, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the item is priced in another currency.
    /// Nothing is changed or saved in that case.
    #[tracing::instrument(name = "cart.add", skip(self, item), fields(key = %item.key()))]
    pub fn add_to_cart(&mut self, item: CartItem) -> Result<StorageStatus, CartError> {
        self.cart.add(item)?;

        Ok(self.persist())
    }

    /// Remove every line matching `key`.
    #[tracing::instrument(name = "cart.remove", skip(self), fields(key = %key))]
    pub fn remove_from_cart(&mut self, key: &CartKey) -> StorageStatus {
        if !self.cart.remove(key) {
            debug!("no matching line");
        }

        self.persist()
    }

    /// Set the quantity of a line; zero or below removes it.
    #[tracing::instrument(name = "cart.update_quantity", skip(self), fields(key = %key))]
    pub fn update_quantity(&mut self, key: &CartKey, quantity: i64) -> StorageStatus {
        self.cart.update_quantity(key, quantity);

        self.persist()
    }

    /// Remove every line.
    #[tracing::instrument(name = "cart.clear", skip(self))]
    pub fn clear_cart(&mut self) -> StorageStatus {
        self.cart.clear();

        self.persist()
    }

    /// Total of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the total cannot be calculated.
    pub fn total(&self) -> Result<Money<'static, Currency>, CartError> {
        self.cart.total()
    }

    /// Give back the cart and store.
    pub fn into_parts(self) -> (Cart, P) {
        (self.cart, self.store)
    }

    fn persist(&self) -> StorageStatus {
        let status = StorageStatus::from(self.store.save(&to_records(self.cart.iter())));

        if let Some(error) = status.warning() {
            warn!(%error, "failed to persist cart");
        }

        status
    }
}

fn rehydrate(records: Vec<CartItemRecord>, currency: &'static Currency) -> Cart {
    let items = match records
        .into_iter()
        .map(CartItem::try_from)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(items) => items,
        Err(error) => {
            warn!(%error, "stored cart is corrupt, starting empty");

            return Cart::new(currency);
        }
    };

    Cart::with_items(items, currency).unwrap_or_else(|error| {
        warn!(%error, "stored cart is corrupt, starting empty");

        Cart::new(currency)
    })
}

#[cfg(test)]
mod tests {
    use std::io;

    use rusty_money::iso::{AUD, NZD};
    use testresult::TestResult;

    use crate::{
        items::{ItemError, ItemType},
        persistence::{MockCartPersistence, PersistenceError},
    };

    use super::*;

    fn cap() -> Result<CartItem, ItemError> {
        CartItem::new(
            CartKey::new("cap-1", ItemType::Merchandise),
            "Club Cap",
            Money::from_minor(25_00, AUD),
        )
    }

    fn stored_cap(quantity: u32, currency: &str) -> CartItemRecord {
        CartItemRecord {
            id: "cap-1".to_string(),
            item_type: ItemType::Merchandise,
            variant: None,
            name: "Club Cap".to_string(),
            unit_price: 25_00,
            currency: currency.to_string(),
            quantity,
        }
    }

    fn unavailable() -> PersistenceError {
        PersistenceError::Unavailable(io::Error::other("disk full"))
    }

    #[test]
    fn open_rehydrates_stored_lines() {
        let mut store = MockCartPersistence::new();
        store
            .expect_load()
            .returning(|| Ok(vec![stored_cap(3, "AUD")]));

        let (manager, status) = CartManager::open(store, AUD);

        assert!(status.is_in_sync());
        assert_eq!(manager.cart().count(), 3);
    }

    #[test]
    fn open_with_invalid_lines_starts_empty() {
        let mut store = MockCartPersistence::new();
        store
            .expect_load()
            .returning(|| Ok(vec![stored_cap(2, "AUD"), stored_cap(0, "AUD")]));

        let (manager, status) = CartManager::open(store, AUD);

        assert!(status.is_in_sync());
        assert!(manager.cart().is_empty());
    }

    #[test]
    fn open_with_foreign_currency_starts_empty() {
        let mut store = MockCartPersistence::new();
        store
            .expect_load()
            .returning(|| Ok(vec![stored_cap(1, "AUD")]));

        let (manager, _) = CartManager::open(store, NZD);

        assert!(manager.cart().is_empty());
        assert_eq!(manager.cart().currency(), NZD);
    }

    #[test]
    fn open_with_unreachable_store_degrades() {
        let mut store = MockCartPersistence::new();
        store.expect_load().returning(|| Err(unavailable()));

        let (manager, status) = CartManager::open(store, AUD);

        assert!(!status.is_in_sync());
        assert!(manager.cart().is_empty());
    }

    #[test]
    fn every_mutation_saves_snapshot() -> TestResult {
        let mut store = MockCartPersistence::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store.expect_save().times(4).returning(|_| Ok(()));

        let (mut manager, _) = CartManager::open(store, AUD);
        let key = CartKey::new("cap-1", ItemType::Merchandise);

        assert!(manager.add_to_cart(cap()?)?.is_in_sync());
        assert!(manager.update_quantity(&key, 5).is_in_sync());
        assert!(manager.remove_from_cart(&key).is_in_sync());
        assert!(manager.clear_cart().is_in_sync());

        Ok(())
    }

    #[test]
    fn saved_snapshot_matches_cart() -> TestResult {
        let mut store = MockCartPersistence::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store
            .expect_save()
            .withf(|items| {
                items.len() == 1
                    && items
                        .first()
                        .is_some_and(|item| item.id == "cap-1" && item.quantity == 1)
            })
            .times(1)
            .returning(|_| Ok(()));

        let (mut manager, _) = CartManager::open(store, AUD);

        assert!(manager.add_to_cart(cap()?)?.is_in_sync());

        Ok(())
    }

    #[test]
    fn failed_save_keeps_in_memory_change() -> TestResult {
        let mut store = MockCartPersistence::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store.expect_save().returning(|_| Err(unavailable()));

        let (mut manager, _) = CartManager::open(store, AUD);

        let status = manager.add_to_cart(cap()?)?;

        assert!(matches!(
            status.warning(),
            Some(PersistenceError::Unavailable(_))
        ));
        assert_eq!(manager.cart().len(), 1);
        assert_eq!(manager.total()?, Money::from_minor(25_00, AUD));

        Ok(())
    }

    #[test]
    fn rejected_add_does_not_save() -> TestResult {
        let mut store = MockCartPersistence::new();
        store.expect_load().returning(|| Ok(Vec::new()));
        store.expect_save().never();

        let (mut manager, _) = CartManager::open(store, NZD);

        assert!(matches!(
            manager.add_to_cart(cap()?),
            Err(CartError::CurrencyMismatch(..))
        ));
        assert!(manager.cart().is_empty());

        Ok(())
    }
}
