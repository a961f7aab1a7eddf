//! Persistence
//!
//! Contracts for the storage collaborators the cart and progress trackers hand their
//! snapshots to. Failures here are never fatal to the in-memory state.

use std::io;

use thiserror::Error;

use crate::{progress::JuniorProgress, records::CartItemRecord};

pub mod json;

/// Fixed namespace the cart is stored under.
pub const CART_NAMESPACE: &str = "aurfc-cart";

/// Errors raised by persistence collaborators.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing storage could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] io::Error),

    /// The state could not be encoded.
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    /// The user id cannot be used as a storage key.
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
}

/// Whether the in-memory state matches what storage holds.
#[derive(Debug)]
#[must_use]
pub enum StorageStatus {
    /// The latest state was loaded from or written to storage.
    InSync,

    /// Storage failed; the in-memory state is ahead of (or replaced) what is stored.
    Degraded(PersistenceError),
}

impl StorageStatus {
    /// Check whether storage is in sync.
    pub fn is_in_sync(&self) -> bool {
        matches!(self, StorageStatus::InSync)
    }

    /// The non-fatal warning, if storage failed.
    pub fn warning(&self) -> Option<&PersistenceError> {
        match self {
            StorageStatus::InSync => None,
            StorageStatus::Degraded(error) => Some(error),
        }
    }
}

impl From<Result<(), PersistenceError>> for StorageStatus {
    fn from(result: Result<(), PersistenceError>) -> Self {
        match result {
            Ok(()) => StorageStatus::InSync,
            Err(error) => StorageStatus::Degraded(error),
        }
    }
}

/// Durable storage for the cart lines.
///
/// Implementations must return an empty list for missing or corrupt data rather than an
/// error; errors are reserved for storage that cannot be reached.
#[cfg_attr(test, mockall::automock)]
pub trait CartPersistence {
    /// Load the stored cart lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the storage could not be read.
    fn load(&self) -> Result<Vec<CartItemRecord>, PersistenceError>;

    /// Replace the stored cart lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the storage could not be written.
    fn save(&self, items: &[CartItemRecord]) -> Result<(), PersistenceError>;
}

/// Per-user profile storage for junior progress.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressPersistence {
    /// Load the stored progress for a user, `None` if nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the storage could not be read.
    fn load(&self, user_id: &str) -> Result<Option<JuniorProgress>, PersistenceError>;

    /// Replace the stored progress for a user.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the storage could not be written.
    fn save(&self, user_id: &str, progress: &JuniorProgress) -> Result<(), PersistenceError>;
}

impl<T: CartPersistence + ?Sized> CartPersistence for &T {
    fn load(&self) -> Result<Vec<CartItemRecord>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, items: &[CartItemRecord]) -> Result<(), PersistenceError> {
        (**self).save(items)
    }
}

impl<T: ProgressPersistence + ?Sized> ProgressPersistence for &T {
    fn load(&self, user_id: &str) -> Result<Option<JuniorProgress>, PersistenceError> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, progress: &JuniorProgress) -> Result<(), PersistenceError> {
        (**self).save(user_id, progress)
    }
}
