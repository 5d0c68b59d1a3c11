//! Progress state machine
//!
//! `NotStarted -> StepComplete(0) -> ... -> StepComplete(n - 1)` (solved).
//! Steps can only be completed in order; anything else is ignored. The
//! latest state is persisted as a [`ProgressRecord`] that is only honoured on
//! the same calendar day for the same puzzle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_json, save_json};

/// Step index meaning "nothing completed yet"
pub const NOT_STARTED: i32 = -1;

/// Persisted progress (`{ date, step, puzzleId }`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub date: NaiveDate,
    pub step: i32,
    pub puzzle_id: String,
}

impl ProgressRecord {
    /// Whether this record still applies to `puzzle_id` on `today`
    pub fn is_valid_for(&self, today: NaiveDate, puzzle_id: &str, step_count: usize) -> bool {
        self.date == today
            && self.puzzle_id == puzzle_id
            && self.step >= NOT_STARTED
            && (self.step as i64) < step_count as i64
    }
}

/// Where the player is in today's sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    NotStarted,
    StepComplete(usize),
}

impl ProgressState {
    fn from_index(step: i32) -> Self {
        if step < 0 {
            ProgressState::NotStarted
        } else {
            ProgressState::StepComplete(step as usize)
        }
    }

    pub fn index(&self) -> i32 {
        match self {
            ProgressState::NotStarted => NOT_STARTED,
            ProgressState::StepComplete(i) => *i as i32,
        }
    }
}

/// Result of a completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Out of order or repeated; state unchanged
    Ignored,
    /// Step recorded, more to go
    Advanced { step: usize },
    /// Final step recorded
    Solved { step: usize },
}

impl CompletionOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, CompletionOutcome::Ignored)
    }
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    state: ProgressState,
    puzzle_id: String,
    step_count: usize,
}

impl ProgressTracker {
    pub fn new(puzzle_id: &str, step_count: usize) -> Self {
        Self {
            state: ProgressState::NotStarted,
            puzzle_id: puzzle_id.to_string(),
            step_count,
        }
    }

    /// Resume today's progress for `puzzle_id`, discarding a stale record
    pub fn restore(
        store: &mut dyn KeyValueStore,
        puzzle_id: &str,
        step_count: usize,
        today: NaiveDate,
    ) -> Self {
        let mut tracker = Self::new(puzzle_id, step_count);

        if let Some(record) = load_json::<ProgressRecord>(store, keys::PROGRESS) {
            if record.is_valid_for(today, puzzle_id, step_count) {
                tracker.state = ProgressState::from_index(record.step);
                log::info!("Restored progress: step {} of '{}'", record.step, puzzle_id);
            } else {
                log::info!(
                    "Discarding stale progress ({} / '{}')",
                    record.date,
                    record.puzzle_id
                );
                store.remove(keys::PROGRESS);
            }
        }

        tracker
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Last completed step, -1 if none
    pub fn current_step(&self) -> i32 {
        self.state.index()
    }

    /// The only step index `complete` will accept
    pub fn next_step(&self) -> Option<usize> {
        let next = (self.current_step() + 1) as usize;
        (next < self.step_count).then_some(next)
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle_id
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_solved(&self) -> bool {
        self.step_count > 0 && self.current_step() + 1 >= self.step_count as i32
    }

    /// Complete `step` if it is exactly the next one
    pub fn complete(
        &mut self,
        step: usize,
        today: NaiveDate,
        store: &mut dyn KeyValueStore,
    ) -> CompletionOutcome {
        if self.next_step() != Some(step) {
            log::debug!(
                "Ignoring completion of step {} (current {})",
                step,
                self.current_step()
            );
            return CompletionOutcome::Ignored;
        }

        self.state = ProgressState::StepComplete(step);
        let record = ProgressRecord {
            date: today,
            step: step as i32,
            puzzle_id: self.puzzle_id.clone(),
        };
        if let Err(e) = save_json(store, keys::PROGRESS, &record) {
            log::warn!("Failed to save progress: {}", e);
        }

        if self.is_solved() {
            log::info!("Puzzle '{}' solved", self.puzzle_id);
            CompletionOutcome::Solved { step }
        } else {
            log::info!("Step {} complete", step);
            CompletionOutcome::Advanced { step }
        }
    }

    /// Back to `NotStarted` and forget the persisted record
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) {
        self.state = ProgressState::NotStarted;
        store.remove(keys::PROGRESS);
    }

    /// Reset for a different puzzle and/or step count
    pub fn rebind(&mut self, puzzle_id: &str, step_count: usize, store: &mut dyn KeyValueStore) {
        self.puzzle_id = puzzle_id.to_string();
        self.step_count = step_count;
        self.reset(store);
    }
}
