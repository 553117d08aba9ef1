//! Persistence for the cart identifier.
//!
//! Only the identifier is kept on disk; line items are always refetched from
//! the storefront. The file format is `{"cartId": "..."}`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use artificial_wearables_core::CartId;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Where the cart identifier lives between runs.
pub trait CartIdStore {
    /// Load the saved identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<CartId>, StoreError>;

    /// Save the identifier, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, cart_id: &CartId) -> Result<(), StoreError>;

    /// Forget the identifier. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartFile {
    cart_id: CartId,
}

/// Cart identifier stored as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileCartIdStore {
    path: PathBuf,
}

impl FileCartIdStore {
    /// Create a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartIdStore for FileCartIdStore {
    fn load(&self) -> Result<Option<CartId>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let file: CartFile = serde_json::from_str(&contents)?;
        Ok(Some(file.cart_id))
    }

    fn save(&self, cart_id: &CartId) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(&CartFile {
            cart_id: cart_id.clone(),
        })?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), cart_id = %cart_id, "Saved cart ID");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    cart_id: Mutex<Option<CartId>>,
}

impl MemoryCartIdStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `cart_id`.
    #[must_use]
    pub fn with_cart(cart_id: CartId) -> Self {
        Self {
            cart_id: Mutex::new(Some(cart_id)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CartId>> {
        // A poisoned lock still holds a valid Option
        self.cart_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartIdStore for MemoryCartIdStore {
    fn load(&self) -> Result<Option<CartId>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, cart_id: &CartId) -> Result<(), StoreError> {
        *self.slot() = Some(cart_id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

impl<S: CartIdStore + ?Sized> CartIdStore for &S {
    fn load(&self) -> Result<Option<CartId>, StoreError> {
        (**self).load()
    }

    fn save(&self, cart_id: &CartId) -> Result<(), StoreError> {
        (**self).save(cart_id)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("aw-cart-{}", uuid::Uuid::new_v4()))
            .join("cart.json")
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path();
        let store = FileCartIdStore::new(&path);

        assert_eq!(store.load().unwrap(), None);

        store.save(&CartId::new("cart_1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(CartId::new("cart_1")));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"cartId":"cart_1"}"#
        );

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!path.exists());

        // Clearing twice is fine
        store.clear().unwrap();

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileCartIdStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCartIdStore::with_cart(CartId::new("cart_2"));
        assert_eq!(store.load().unwrap(), Some(CartId::new("cart_2")));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
