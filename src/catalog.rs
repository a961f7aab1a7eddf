//! Store Catalog
//!
//! The mocked catalogs the club store sells from, loaded from YAML fixture files. One file
//! per item type lives in the catalog directory, e.g. `merchandise.yml`:
//!
//! ```yaml
//! entries:
//!   jersey-1:
//!     name: Home Jersey
//!     price: 89.99 AUD
//!     variants: [S, M, L, XL]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    items::{CartItem, CartKey, ItemError, ItemType},
    prices::{PriceError, parse_price},
};

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading catalog files
    #[error("Failed to read catalog file {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid entry price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Entry does not make a valid cart item
    #[error(transparent)]
    Item(#[from] ItemError),

    /// Currency mismatch between entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Entry not found
    #[error("No {0} with id {1}")]
    NotFound(ItemType, String),

    /// Entry has sizes/variants and none was chosen
    #[error("{0} needs a variant, one of: {1}")]
    VariantRequired(String, String),

    /// Chosen variant is not offered
    #[error("{0} has no variant {1:?}")]
    UnknownVariant(String, String),
}

/// Wrapper for catalog entries in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    entries: FxHashMap<String, EntryFixture>,
}

/// Catalog entry as written in YAML
#[derive(Debug, Deserialize)]
struct EntryFixture {
    name: String,
    price: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    variants: SmallVec<[String; 6]>,
}

/// Something the store sells.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Catalog id
    pub id: String,

    /// Item type
    pub item_type: ItemType,

    /// Display name
    pub name: String,

    /// Optional blurb
    pub description: Option<String>,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Sizes or other variants on offer; empty if the entry has none
    pub variants: SmallVec<[String; 6]>,
}

impl CatalogEntry {
    /// Build a cart item for this entry.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::VariantRequired`]: the entry has variants and none was given.
    /// - [`CatalogError::UnknownVariant`]: the given variant is not offered.
    pub fn to_cart_item(&self, variant: Option<&str>) -> Result<CartItem, CatalogError> {
        let key = match variant {
            None if self.variants.is_empty() => CartKey::new(&self.id, self.item_type),
            None => {
                return Err(CatalogError::VariantRequired(
                    self.id.clone(),
                    self.variants.join(", "),
                ));
            }
            Some(variant) if self.variants.iter().any(|offered| offered == variant) => {
                CartKey::with_variant(&self.id, self.item_type, variant)
            }
            Some(variant) => {
                return Err(CatalogError::UnknownVariant(
                    self.id.clone(),
                    variant.to_string(),
                ));
            }
        };

        Ok(CartItem::new(key, &self.name, self.price)?)
    }
}

/// Catalog
#[derive(Debug, Default)]
pub struct Catalog {
    entries: FxHashMap<(ItemType, String), CatalogEntry>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Fixture file name for an item type.
    pub fn fixture_name(item_type: ItemType) -> &'static str {
        match item_type {
            ItemType::Merchandise => "merchandise.yml",
            ItemType::Membership => "memberships.yml",
            ItemType::Clubroom => "clubroom.yml",
            ItemType::Event => "events.yml",
            ItemType::GroupOrder => "group-orders.yml",
            ItemType::Donation => "donations.yml",
        }
    }

    /// Load every catalog fixture found in `dir`. Missing files leave that item type empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if entries disagree on currency.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let mut catalog = Catalog::default();

        for item_type in ItemType::ALL {
            let path = dir.join(Self::fixture_name(item_type));

            match fs::read_to_string(&path) {
                Ok(contents) => {
                    catalog.load_str(item_type, &contents)?;
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "no catalog file");
                }
                Err(error) => return Err(CatalogError::Io(path, error)),
            }
        }

        Ok(catalog)
    }

    /// Load entries of one item type from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price is invalid, or the currency
    /// differs from entries already loaded.
    pub fn load_str(&mut self, item_type: ItemType, yaml: &str) -> Result<&mut Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        for (id, entry) in fixture.entries {
            let (minor_units, currency) = parse_price(&entry.price)?;

            if let Some(existing) = self.currency {
                if existing != currency {
                    return Err(CatalogError::CurrencyMismatch(
                        existing.iso_alpha_code,
                        currency.iso_alpha_code,
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let entry = CatalogEntry {
                id: id.clone(),
                item_type,
                name: entry.name,
                description: entry.description,
                price: Money::from_minor(minor_units, currency),
                variants: entry.variants,
            };

            self.entries.insert((item_type, id), entry);
        }

        Ok(self)
    }

    /// Look up an entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if there is no such entry.
    pub fn entry(&self, item_type: ItemType, id: &str) -> Result<&CatalogEntry, CatalogError> {
        self.entries
            .get(&(item_type, id.to_string()))
            .ok_or_else(|| CatalogError::NotFound(item_type, id.to_string()))
    }

    /// Entries of one item type, sorted by id.
    pub fn entries(&self, item_type: ItemType) -> Vec<&CatalogEntry> {
        let mut entries: Vec<_> = self
            .entries
            .values()
            .filter(|entry| entry.item_type == item_type)
            .collect();

        entries.sort_by(|left, right| left.id.cmp(&right.id));

        entries
    }

    /// Currency the catalog is priced in, `None` while empty.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
