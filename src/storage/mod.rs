//! Client-side key-value persistence.
//!
//! Credentials, the cart mirror and the pending payment context live here.
//! Consumers receive an `Arc<dyn KeyValueStore>`; tests use a [`MemoryStore`].

mod error;
mod file;
mod memory;

pub use error::*;
pub use file::*;
pub use memory::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::CartLine;

/// Well-known keys shared by the views.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_ID: &str = "userId";
    pub const ROLE: &str = "role";
    pub const CART: &str = "cart";
    pub const ORDER_DATA: &str = "orderData";
    pub const ORDER_RESULT: &str = "orderResult";
}

/// A string key-value store with last-writer-wins semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Corrupt { key: key.to_string(), reason: e.to_string() }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialize { key: key.to_string(), reason: e.to_string() })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Persisted mirror of the cart lines.
#[derive(Clone)]
pub struct CartMirror {
    store: Arc<dyn KeyValueStore>,
}

impl CartMirror {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        let lines: Vec<CartLine> = self.store.get_json(keys::CART)?.unwrap_or_default();
        debug!(lines = lines.len(), "Cart mirror loaded");
        Ok(lines)
    }

    pub fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        self.store.set_json(keys::CART, lines)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(keys::CART)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[test]
    fn cart_mirror_round_trips_lines() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mirror = CartMirror::new(store.clone());
        assert!(mirror.load().unwrap().is_empty());

        let lines = vec![CartLine::new(Product::new("p2", "Mouse", 50000.0, 4), 2)];
        mirror.save(&lines).unwrap();
        assert_eq!(mirror.load().unwrap(), lines);

        mirror.clear().unwrap();
        assert_eq!(store.get(keys::CART).unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_reported_with_its_key() {
        let store = MemoryStore::new();
        store.set(keys::CART, "{not json").unwrap();
        let err = store.get_json::<Vec<CartLine>>(keys::CART).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "cart"));
    }
}
