//! Step catalog
//!
//! Every task a child can complete, plus the default weekday/holiday orderings.
//! Definitions are static and never mutated.

use serde::Serialize;

/// A single child-facing task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    /// Stable identifier (persisted in step configuration)
    pub id: &'static str,
    /// Button label
    pub label: &'static str,
    /// Icon resource, relative to the asset base
    pub icon_ref: &'static str,
    /// Fallback glyph when the icon is missing
    pub emoji: &'static str,
    /// Message shown when this step is completed
    pub goal_message: &'static str,
}

pub const ALL_STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: "shoes",
        label: "くつをはく",
        icon_ref: "images/icon-shoes.png",
        emoji: "👟",
        goal_message: "やった！くつ はけたね！",
    },
    StepDefinition {
        id: "move",
        label: "いどうする",
        icon_ref: "images/icon-walking.jpg",
        emoji: "🚶",
        goal_message: "いどう できたね！",
    },
    StepDefinition {
        id: "home",
        label: "おうち",
        icon_ref: "images/icon-apartment.png",
        emoji: "🏠",
        goal_message: "おうちに ついたよ！",
    },
    StepDefinition {
        id: "bath",
        label: "おふろ",
        icon_ref: "images/icon-bath.jpg",
        emoji: "🛀",
        goal_message: "おふろ はいれたね！",
    },
    StepDefinition {
        id: "bed",
        label: "ねる",
        icon_ref: "images/icon-bed.jpg",
        emoji: "😴",
        goal_message: "ねんね しようね！",
    },
    StepDefinition {
        id: "teeth",
        label: "はみがき",
        icon_ref: "images/icon-teethblush.jpg",
        emoji: "🪥",
        goal_message: "はみがき できたね！",
    },
    StepDefinition {
        id: "meal",
        label: "ごはん",
        icon_ref: "images/icon-eat.jpg",
        emoji: "🍚",
        goal_message: "ごはん たべたね！",
    },
    StepDefinition {
        id: "dress",
        label: "おきがえ",
        icon_ref: "images/icon-change-clothes.jpg",
        emoji: "👕",
        goal_message: "おきがえ できたね！",
    },
    StepDefinition {
        id: "diaper",
        label: "おむつ",
        icon_ref: "images/icon-diaper.jpg",
        emoji: "👶",
        goal_message: "おむつ かえたね！",
    },
    StepDefinition {
        id: "nap",
        label: "おひるね",
        icon_ref: "images/icon-nap.jpg",
        emoji: "💤",
        goal_message: "おひるね できたね！",
    },
];

pub const DEFAULT_WEEKDAY: &[&str] = &["shoes", "move", "home", "bath", "bed"];
pub const DEFAULT_HOLIDAY: &[&str] = &["bath", "bed"];

/// Look up a step definition by id
pub fn find_step(id: &str) -> Option<&'static StepDefinition> {
    ALL_STEPS.iter().find(|s| s.id == id)
}

/// Resolve an id list to definitions, skipping unknown ids
pub fn step_defs<S: AsRef<str>>(ids: &[S]) -> Vec<&'static StepDefinition> {
    ids.iter().filter_map(|id| find_step(id.as_ref())).collect()
}

/// Whether `id` names a known step
pub fn is_known(id: &str) -> bool {
    find_step(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = ALL_STEPS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), ALL_STEPS.len());
    }

    #[test]
    fn test_defaults_resolve() {
        assert_eq!(step_defs(DEFAULT_WEEKDAY).len(), DEFAULT_WEEKDAY.len());
        assert_eq!(step_defs(DEFAULT_HOLIDAY).len(), DEFAULT_HOLIDAY.len());
    }

    #[test]
    fn test_step_defs_skips_unknown() {
        let defs = step_defs(&["bath", "juggling", "bed"]);
        let ids: Vec<_> = defs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["bath", "bed"]);
    }
}
