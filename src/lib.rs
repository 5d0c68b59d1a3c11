//! Puzzle Rally - a daily picture-reveal game for kids
//!
//! Core modules:
//! - `reveal`: Threshold curves and seeded tile order (pure, deterministic)
//! - `renderer`: Jigsaw / curtain / blur reveal strategies over a pixel frame
//! - `progress`: Step-by-step progress state machine with date/puzzle validation
//! - `config`: Weekday/holiday step configuration
//! - `session`: The controller that owns all mutable state
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `platform`: Browser/native clock abstraction
//! - `audio`: Step and goal chimes (web only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod puzzles;
pub mod renderer;
pub mod reveal;
pub mod session;
pub mod settings;
pub mod stamps;
pub mod steps;

pub use config::{DayMode, StepConfig, StepConfigManager};
pub use error::{CatalogError, ImageError, StorageError};
pub use progress::{CompletionOutcome, ProgressRecord, ProgressTracker};
pub use puzzles::{PuzzleCatalog, PuzzleEntry};
pub use renderer::{Bitmap, Frame, ImageSlot};
pub use reveal::{RevealMode, RevealPlan};
pub use session::{Session, SessionEvent};
pub use settings::Settings;
pub use stamps::StampLog;
pub use steps::StepDefinition;

/// Game configuration constants
pub mod consts {
    /// Jigsaw grid is GRID_SIZE x GRID_SIZE
    pub const GRID_SIZE: usize = 4;
    /// Total tiles in the jigsaw grid
    pub const TOTAL_TILES: usize = GRID_SIZE * GRID_SIZE;

    /// Active step list cardinality bounds
    pub const MIN_STEPS: usize = 2;
    pub const MAX_STEPS: usize = 10;

    /// Blur radius before the first reveal, as a fraction of canvas size
    pub const MAX_BLUR_FRACTION: f32 = 0.05;

    /// Curtain divider half-height (pixels)
    pub const DIVIDER_HALF_HEIGHT: f32 = 3.0;

    /// Sparkle dots drawn over the placeholder
    pub const SPARKLE_COUNT: usize = 15;

    /// Maximum user-added puzzles
    pub const MAX_CUSTOM_PUZZLES: usize = 10;
}
