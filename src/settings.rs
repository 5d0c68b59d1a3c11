//! Player preferences
//!
//! Persisted separately from progress, one storage key per preference, so a
//! corrupt value only loses that one preference. Day mode lives with the step
//! lists in [`crate::config`].

use crate::persistence::{KeyValueStore, keys};
use crate::reveal::RevealMode;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// How the picture is uncovered
    pub reveal_mode: RevealMode,
    /// Puzzle picked by hand instead of today's rotation
    pub puzzle_override: Option<String>,
    /// Step/goal sound effects
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reveal_mode: RevealMode::Jigsaw,
            puzzle_override: None,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Load each preference, falling back to its default
    pub fn load(store: &mut dyn KeyValueStore) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = store.get(keys::REVEAL_MODE) {
            match RevealMode::from_str(&raw) {
                Some(mode) => settings.reveal_mode = mode,
                None => {
                    log::warn!("Unknown reveal mode '{}', using default", raw);
                    store.remove(keys::REVEAL_MODE);
                }
            }
        }

        settings.puzzle_override = store
            .get(keys::PUZZLE_OVERRIDE)
            .filter(|id| !id.trim().is_empty());

        if let Some(raw) = store.get(keys::SOUND) {
            match raw.as_str() {
                "on" => settings.sound_enabled = true,
                "off" => settings.sound_enabled = false,
                _ => {
                    log::warn!("Unknown sound setting '{}', using default", raw);
                    store.remove(keys::SOUND);
                }
            }
        }

        log::info!(
            "Loaded settings (reveal: {}, override: {:?}, sound: {})",
            settings.reveal_mode.as_str(),
            settings.puzzle_override,
            settings.sound_enabled
        );
        settings
    }

    /// Write every preference
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let results = [
            store.set(keys::REVEAL_MODE, self.reveal_mode.as_str()),
            store.set(keys::SOUND, if self.sound_enabled { "on" } else { "off" }),
        ];
        for result in results {
            if let Err(e) = result {
                log::warn!("Failed to save settings: {}", e);
            }
        }
        self.save_override(store);
    }

    /// Write (or clear) only the puzzle override
    pub fn save_override(&self, store: &mut dyn KeyValueStore) {
        match &self.puzzle_override {
            Some(id) => {
                if let Err(e) = store.set(keys::PUZZLE_OVERRIDE, id) {
                    log::warn!("Failed to save puzzle override: {}", e);
                }
            }
            None => store.remove(keys::PUZZLE_OVERRIDE),
        }
    }
}
