//! AURFC Hub prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, manager::CartManager},
    catalog::{Catalog, CatalogEntry, CatalogError},
    items::{CartItem, CartKey, ItemError, ItemType},
    persistence::{
        CartPersistence, PersistenceError, ProgressPersistence, StorageStatus,
        json::JsonFileStore,
    },
    prices::{PriceError, currency_from_code, parse_money, parse_price},
    pricing::{TotalPriceError, line_total, total_price},
    progress::{
        JuniorProgress, ProgressError, award_experience, award_skill_points,
        badges::{Badge, BadgeSet},
        skills::{Skill, Skills},
        tracker::ProgressTracker,
    },
    receipt::{Receipt, ReceiptError},
    records::{CartItemRecord, RecordError},
};
