//! Key/value persistence
//!
//! Features:
//! - One [`KeyValueStore`] trait; LocalStorage on the web, in-memory elsewhere
//! - JSON helpers that treat malformed values as absent and clear them
//! - All storage keys in one place

#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Storage keys for each logical record
pub mod keys {
    pub const PROGRESS: &str = "puzzle-progress";
    pub const REVEAL_MODE: &str = "puzzle-reveal-mode";
    pub const DAY_MODE: &str = "puzzle-day-mode";
    pub const STEP_CONFIG: &str = "puzzle-step-config";
    pub const PUZZLE_OVERRIDE: &str = "puzzle-override";
    pub const STAMPS: &str = "puzzle-stamps";
    pub const SOUND: &str = "puzzle-sound";
}

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// Read and parse a JSON value
///
/// A value that fails to parse is logged, removed and reported as absent.
pub fn load_json<T: DeserializeOwned>(store: &mut dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding malformed '{}': {}", key, e);
            store.remove(key);
            None
        }
    }
}

/// Serialize and write a JSON value
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
