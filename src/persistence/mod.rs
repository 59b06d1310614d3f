//! Key-value persistence for saved currency and upgrade levels
//!
//! Values are stored as strings (LocalStorage semantics) and read back as
//! integers. Anything missing or non-numeric reads as absent.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebStorage;

/// Storage keys
pub mod keys {
    pub const COINS: &str = "coins";
    pub const UPGRADE_FIRE_RATE: &str = "upgrade_fire_rate";
    pub const UPGRADE_HP: &str = "upgrade_hp";
    pub const STAR_HP: &str = "star_hp";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },
}

/// A string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Integer value of `key`, `None` when absent or not a number
    fn get_int(&self, key: &str) -> Option<i64> {
        self.get_item(key)?.trim().parse().ok()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        self.set_item(key, &value.to_string())
    }
}

/// Write an integer, logging (and otherwise ignoring) a failed write
pub fn store_int(store: &mut dyn KeyValueStore, key: &str, value: i64) {
    if let Err(e) = store.set_int(key, value) {
        log::warn!("Could not persist {}: {}", key, e);
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        let mut store = MemoryStore::new();
        store.set_int(keys::COINS, 42).expect("memory write");
        assert_eq!(store.get_int(keys::COINS), Some(42));
        assert_eq!(store.get_item(keys::COINS).as_deref(), Some("42"));
    }

    #[test]
    fn test_missing_and_garbage_read_as_absent() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int(keys::COINS), None);

        store.set_item(keys::COINS, "lots").expect("memory write");
        assert_eq!(store.get_int(keys::COINS), None);

        store.set_item(keys::COINS, "").expect("memory write");
        assert_eq!(store.get_int(keys::COINS), None);
    }

    #[test]
    fn test_store_int_writes() {
        let mut store = MemoryStore::new();
        store_int(&mut store, keys::STAR_HP, 2);
        assert_eq!(store.get_int(keys::STAR_HP), Some(2));
    }
}
