//! Step configuration
//!
//! Two independently ordered step lists, one for weekdays and one for
//! holidays. The day mode picks which one is active. Every list always holds
//! between [`MIN_STEPS`] and [`MAX_STEPS`] distinct known step ids; a mutation
//! that would break that is rejected and leaves the list untouched.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_STEPS, MIN_STEPS};
use crate::persistence::{KeyValueStore, keys, load_json, save_json};
use crate::steps::{self, DEFAULT_HOLIDAY, DEFAULT_WEEKDAY, StepDefinition};

/// Which step list is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayMode {
    #[default]
    Weekday,
    Holiday,
}

impl DayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayMode::Weekday => "weekday",
            DayMode::Holiday => "holiday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekday" => Some(DayMode::Weekday),
            "holiday" => Some(DayMode::Holiday),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DayMode::Weekday => DayMode::Holiday,
            DayMode::Holiday => DayMode::Weekday,
        }
    }
}

/// Persisted step lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    pub weekday: Vec<String>,
    pub holiday: Vec<String>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            weekday: to_owned_ids(DEFAULT_WEEKDAY),
            holiday: to_owned_ids(DEFAULT_HOLIDAY),
        }
    }
}

fn to_owned_ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Drop unknown and duplicate ids; fall back to `default` if the result is
/// outside the allowed size
fn sanitize_list(list: &[String], default: &[&str]) -> Vec<String> {
    let mut clean: Vec<String> = Vec::with_capacity(list.len());
    for id in list {
        if steps::is_known(id) && !clean.contains(id) {
            clean.push(id.clone());
        }
    }
    if (MIN_STEPS..=MAX_STEPS).contains(&clean.len()) {
        clean
    } else {
        to_owned_ids(default)
    }
}

impl StepConfig {
    pub fn list(&self, mode: DayMode) -> &[String] {
        match mode {
            DayMode::Weekday => &self.weekday,
            DayMode::Holiday => &self.holiday,
        }
    }

    fn list_mut(&mut self, mode: DayMode) -> &mut Vec<String> {
        match mode {
            DayMode::Weekday => &mut self.weekday,
            DayMode::Holiday => &mut self.holiday,
        }
    }

    /// Repair a stored config so every list satisfies the invariants
    pub fn sanitized(&self) -> Self {
        Self {
            weekday: sanitize_list(&self.weekday, DEFAULT_WEEKDAY),
            holiday: sanitize_list(&self.holiday, DEFAULT_HOLIDAY),
        }
    }
}

/// Why a configuration change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Removing would leave fewer than the minimum
    TooFew,
    /// Adding would exceed the maximum
    TooMany,
    /// Not a step in the catalog
    UnknownStep,
    /// Reorder index out of range
    BadIndex,
    /// Request would not change anything
    NoChange,
}

/// Result of a configuration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Applied,
    Rejected(Rejection),
}

impl ConfigChange {
    pub fn is_applied(&self) -> bool {
        matches!(self, ConfigChange::Applied)
    }
}

/// Owns the step lists and the active day mode
#[derive(Debug, Clone, Default)]
pub struct StepConfigManager {
    config: StepConfig,
    day_mode: DayMode,
}

impl StepConfigManager {
    pub fn new(config: StepConfig, day_mode: DayMode) -> Self {
        Self {
            config: config.sanitized(),
            day_mode,
        }
    }

    /// Load from storage, repairing or defaulting anything invalid
    pub fn load(store: &mut dyn KeyValueStore) -> Self {
        let config = match load_json::<StepConfig>(store, keys::STEP_CONFIG) {
            Some(stored) => {
                let clean = stored.sanitized();
                if clean != stored {
                    log::warn!("Stored step configuration repaired");
                }
                clean
            }
            None => StepConfig::default(),
        };
        let day_mode = store
            .get(keys::DAY_MODE)
            .and_then(|s| DayMode::from_str(&s))
            .unwrap_or_default();

        log::info!(
            "Step config loaded ({} mode, {} steps)",
            day_mode.as_str(),
            config.list(day_mode).len()
        );
        Self { config, day_mode }
    }

    /// Persist lists and day mode
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Err(e) = save_json(store, keys::STEP_CONFIG, &self.config) {
            log::warn!("Failed to save step config: {}", e);
        }
        if let Err(e) = store.set(keys::DAY_MODE, self.day_mode.as_str()) {
            log::warn!("Failed to save day mode: {}", e);
        }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn day_mode(&self) -> DayMode {
        self.day_mode
    }

    pub fn active_ids(&self) -> &[String] {
        self.config.list(self.day_mode)
    }

    pub fn active_steps(&self) -> Vec<&'static StepDefinition> {
        steps::step_defs(self.active_ids())
    }

    pub fn step_count(&self) -> usize {
        self.active_ids().len()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_ids().iter().any(|s| s == id)
    }

    /// Add `id` to the active list if absent, remove it if present
    pub fn toggle(&mut self, id: &str) -> ConfigChange {
        self.toggle_within(id, MIN_STEPS, MAX_STEPS)
    }

    fn toggle_within(&mut self, id: &str, min: usize, max: usize) -> ConfigChange {
        if !steps::is_known(id) {
            return ConfigChange::Rejected(Rejection::UnknownStep);
        }
        let list = self.config.list_mut(self.day_mode);

        match list.iter().position(|s| s == id) {
            Some(pos) => {
                if list.len() <= min {
                    return ConfigChange::Rejected(Rejection::TooFew);
                }
                list.remove(pos);
            }
            None => {
                if list.len() >= max {
                    return ConfigChange::Rejected(Rejection::TooMany);
                }
                list.push(id.to_string());
            }
        }
        ConfigChange::Applied
    }

    /// Move the step at `from` so it ends up at `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> ConfigChange {
        let list = self.config.list_mut(self.day_mode);
        if from >= list.len() || to >= list.len() {
            return ConfigChange::Rejected(Rejection::BadIndex);
        }
        if from == to {
            return ConfigChange::Rejected(Rejection::NoChange);
        }
        let id = list.remove(from);
        list.insert(to, id);
        ConfigChange::Applied
    }

    pub fn set_day_mode(&mut self, mode: DayMode) -> ConfigChange {
        if mode == self.day_mode {
            return ConfigChange::Rejected(Rejection::NoChange);
        }
        self.day_mode = mode;
        ConfigChange::Applied
    }
}
