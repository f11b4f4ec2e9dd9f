//! Save/load through a durable key/value store
//!
//! The game only needs booleans, floats and 3-vectors under a handful of keys.
//! Where and how they are stored is up to the [`KeyValueStore`] implementation:
//! - [`MemoryStore`]: in-process map (tests, headless runs)
//! - [`JsonFileStore`]: one JSON document on disk, replaced atomically on write

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys written by the game (before prefixing)
pub mod keys {
    pub const GAME_ACTIVE: &str = ":GameActive";
    pub const PLAYING_TIME: &str = ":LevelPlayingTime";
    pub const PLAYER_POSITION: &str = ":PlayerPosition";
    pub const OPPONENT_POSITION: &str = ":EnemyPosition";
    pub const BEST_ROUND_TIME: &str = ":HighScore:LevelCompleted";
}

/// A single stored value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum StoredValue {
    Bool(bool),
    Float(f32),
    Vec3([f32; 3]),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key/value storage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<StoredValue>;
    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Typed, prefixed view over a store
///
/// Reads fall back to the supplied default when a key is missing or holds a
/// value of the wrong type. Write failures are logged and otherwise ignored so
/// a broken disk never stops a round.
pub struct PersistentState {
    store: Box<dyn KeyValueStore>,
    prefix: String,
}

impl std::fmt::Debug for PersistentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentState")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl PersistentState {
    pub fn new(store: Box<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Hand the underlying store back (e.g. to reopen the game on it)
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn write(&mut self, key: &str, value: StoredValue) {
        let full = self.key(key);
        if let Err(e) = self.store.put(&full, value) {
            log::warn!("Failed to save {}: {}", full, e);
        }
    }

    fn read(&self, key: &str) -> Option<StoredValue> {
        self.store.get(&self.key(key))
    }

    pub fn save_bool(&mut self, key: &str, value: bool) {
        self.write(key, StoredValue::Bool(value));
    }

    pub fn save_float(&mut self, key: &str, value: f32) {
        self.write(key, StoredValue::Float(value));
    }

    pub fn save_vec3(&mut self, key: &str, value: Vec3) {
        self.write(key, StoredValue::Vec3(value.to_array()));
    }

    pub fn load_bool(&self, key: &str, default: bool) -> bool {
        match self.read(key) {
            Some(StoredValue::Bool(v)) => v,
            Some(other) => mismatch(key, other, default),
            None => default,
        }
    }

    pub fn load_float(&self, key: &str, default: f32) -> f32 {
        match self.read(key) {
            Some(StoredValue::Float(v)) => v,
            Some(other) => mismatch(key, other, default),
            None => default,
        }
    }

    pub fn load_vec3(&self, key: &str, default: Vec3) -> Vec3 {
        match self.read(key) {
            Some(StoredValue::Vec3(v)) => Vec3::from_array(v),
            Some(other) => mismatch(key, other, default),
            None => default,
        }
    }

    /// Whether anything is stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    pub fn remove(&mut self, key: &str) {
        let full = self.key(key);
        if let Err(e) = self.store.remove(&full) {
            log::warn!("Failed to remove {}: {}", full, e);
        }
    }
}

fn mismatch<T>(key: &str, found: StoredValue, default: T) -> T {
    log::warn!("Ignoring {} with unexpected type ({:?})", key, found);
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PersistentState {
        PersistentState::new(Box::new(MemoryStore::new()), "Test")
    }

    #[test]
    fn test_missing_keys_return_defaults() {
        let s = state();
        assert!(s.load_bool(keys::GAME_ACTIVE, true));
        assert_eq!(s.load_float(keys::PLAYING_TIME, 3.5), 3.5);
        assert_eq!(s.load_vec3(keys::PLAYER_POSITION, Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn test_values_round_trip_with_prefix() {
        let mut s = state();
        s.save_bool(keys::GAME_ACTIVE, true);
        s.save_float(keys::PLAYING_TIME, 12.25);
        s.save_vec3(keys::PLAYER_POSITION, Vec3::new(1.0, 2.0, 3.0));
        assert!(s.load_bool(keys::GAME_ACTIVE, false));
        assert_eq!(s.load_float(keys::PLAYING_TIME, 0.0), 12.25);
        assert_eq!(s.load_vec3(keys::PLAYER_POSITION, Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));

        let store = s.into_store();
        assert_eq!(store.get("Test:GameActive"), Some(StoredValue::Bool(true)));
        assert_eq!(store.get(":GameActive"), None);
    }

    #[test]
    fn test_wrong_type_falls_back_to_default() {
        let mut s = state();
        s.save_float(keys::GAME_ACTIVE, 1.0);
        assert!(!s.load_bool(keys::GAME_ACTIVE, false));
    }

    #[test]
    fn test_remove() {
        let mut s = state();
        s.save_bool(keys::GAME_ACTIVE, true);
        assert!(s.contains(keys::GAME_ACTIVE));
        s.remove(keys::GAME_ACTIVE);
        assert!(!s.contains(keys::GAME_ACTIVE));
    }
}
