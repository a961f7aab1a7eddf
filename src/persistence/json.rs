//! JSON file storage.
//!
//! Stores the cart as `<dir>/aurfc-cart.json` and each junior's progress as
//! `<dir>/juniors/<user_id>.json`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    persistence::{CART_NAMESPACE, CartPersistence, PersistenceError, ProgressPersistence},
    progress::{JuniorProgress, is_valid_user_id},
    records::CartItemRecord,
};

const JUNIORS_DIR: &str = "juniors";

/// File-backed store for carts and junior progress.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at the given directory. The directory is created on first save.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory the store writes to.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the cart file.
    pub fn cart_path(&self) -> PathBuf {
        self.base_path.join(format!("{CART_NAMESPACE}.json"))
    }

    /// Path of a junior's progress file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::InvalidUserId`] if the id could escape the store directory.
    pub fn progress_path(&self, user_id: &str) -> Result<PathBuf, PersistenceError> {
        if !is_valid_user_id(user_id) {
            return Err(PersistenceError::InvalidUserId(user_id.to_string()));
        }

        Ok(self
            .base_path
            .join(JUNIORS_DIR)
            .join(format!("{user_id}.json")))
    }
}

impl CartPersistence for JsonFileStore {
    fn load(&self) -> Result<Vec<CartItemRecord>, PersistenceError> {
        Ok(read_json(&self.cart_path())?.unwrap_or_default())
    }

    fn save(&self, items: &[CartItemRecord]) -> Result<(), PersistenceError> {
        write_json(&self.cart_path(), items)
    }
}

impl ProgressPersistence for JsonFileStore {
    fn load(&self, user_id: &str) -> Result<Option<JuniorProgress>, PersistenceError> {
        read_json(&self.progress_path(user_id)?)
    }

    fn save(&self, user_id: &str, progress: &JuniorProgress) -> Result<(), PersistenceError> {
        write_json(&self.progress_path(user_id)?, progress)
    }
}

/// Read and decode a JSON file. Missing files and undecodable contents both yield `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no stored state");

            return Ok(None);
        }
        Err(error) if error.kind() == io::ErrorKind::InvalidData => {
            warn!(path = %path.display(), "stored state is not UTF-8, ignoring");

            return Ok(None);
        }
        Err(error) => return Err(error.into()),
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            warn!(path = %path.display(), %error, "stored state is corrupt, ignoring");

            Ok(None)
        }
    }
}

/// Encode a value and replace the file at `path` with it.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let contents = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;

    debug!(path = %path.display(), "stored state");

    Ok(())
}
