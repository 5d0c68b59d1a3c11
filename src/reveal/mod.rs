//! Reveal plan module
//!
//! Pure, deterministic derivations the renderer consumes:
//! - Threshold curves (how much is revealed after each step)
//! - Seeded tile order (which jigsaw tiles open first)
//!
//! Nothing here is persisted; everything is cheap to recompute.

pub mod shuffle;
pub mod thresholds;

pub use shuffle::{SeededLcg, default_tile_order, seed_from_id, shuffle_tile_order};
pub use thresholds::{RevealPlan, compute_percent_thresholds, compute_tile_thresholds};

use serde::{Deserialize, Serialize};

/// Visual strategy for disclosing the hidden image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// 4x4 tiles open in seeded order
    #[default]
    Jigsaw,
    /// Bottom-up band
    Curtain,
    /// Whole image, blur shrinks with progress
    Blur,
}

impl RevealMode {
    pub const ALL: [RevealMode; 3] = [RevealMode::Jigsaw, RevealMode::Curtain, RevealMode::Blur];

    pub fn as_str(&self) -> &'static str {
        match self {
            RevealMode::Jigsaw => "jigsaw",
            RevealMode::Curtain => "curtain",
            RevealMode::Blur => "blur",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jigsaw" | "tiles" => Some(RevealMode::Jigsaw),
            "curtain" => Some(RevealMode::Curtain),
            "blur" => Some(RevealMode::Blur),
            _ => None,
        }
    }
}
