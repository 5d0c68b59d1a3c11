//! Session controller
//!
//! The single owner of all mutable game state. Every user action goes through
//! a `Session` method, which updates the relevant component, runs the reset
//! cascade where needed, persists, and queues [`SessionEvent`]s for the host
//! (sounds, celebration, button state) to drain.

use chrono::NaiveDate;

use crate::config::{ConfigChange, DayMode, StepConfigManager};
use crate::error::{CatalogError, ImageError};
use crate::persistence::KeyValueStore;
use crate::platform::Clock;
use crate::progress::{CompletionOutcome, ProgressTracker};
use crate::puzzles::{PuzzleCatalog, PuzzleEntry};
use crate::renderer::{self, Bitmap, Frame, ImageSlot, LoadToken, RenderOutcome, RevealView};
use crate::reveal::{RevealMode, RevealPlan, default_tile_order, seed_from_id};
use crate::settings::Settings;
use crate::stamps::StampLog;
use crate::steps::StepDefinition;

/// Something the host should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A non-final step was completed
    StepCompleted { step: usize },
    /// The final step was completed
    Solved { puzzle_id: String },
    /// First solve of this puzzle today
    StampAwarded { puzzle_id: String, streak: u32 },
    /// Progress went back to "not started"
    ProgressReset,
}

pub struct Session {
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    today: NaiveDate,

    catalog: PuzzleCatalog,
    puzzle: PuzzleEntry,
    tile_order: Vec<usize>,

    steps: StepConfigManager,
    plan: RevealPlan,
    progress: ProgressTracker,

    settings: Settings,
    stamps: StampLog,

    image: ImageSlot,
    next_token: u64,

    events: Vec<SessionEvent>,
}

impl Session {
    /// Load everything from `store` and restore today's progress
    pub fn new(
        mut store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        catalog: PuzzleCatalog,
    ) -> Self {
        let today = clock.today();
        let mut settings = Settings::load(store.as_mut());
        let steps = StepConfigManager::load(store.as_mut());
        let stamps = StampLog::load(store.as_mut());

        let picked = settings.puzzle_override.as_deref().and_then(|id| {
            let found = catalog.find(id).cloned();
            if found.is_none() {
                log::warn!("Override puzzle '{}' not found, using today's", id);
            }
            found
        });
        if picked.is_none() && settings.puzzle_override.is_some() {
            settings.puzzle_override = None;
            settings.save_override(store.as_mut());
        }
        let puzzle = picked.unwrap_or_else(|| catalog.for_date(today).clone());

        let step_count = steps.step_count();
        let plan = RevealPlan::new(step_count);
        let progress = ProgressTracker::restore(store.as_mut(), &puzzle.id, step_count, today);
        let tile_order = default_tile_order(&puzzle.id);

        log::info!(
            "Session started {}: puzzle '{}', {} steps, {} mode",
            today,
            puzzle.id,
            step_count,
            settings.reveal_mode.as_str()
        );

        Self {
            store,
            clock,
            today,
            catalog,
            puzzle,
            tile_order,
            steps,
            plan,
            progress,
            settings,
            stamps,
            image: ImageSlot::Empty,
            next_token: 0,
            events: Vec::new(),
        }
    }

    /// Give the store back (e.g. to start a fresh session over it)
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    // === State ===

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    pub fn puzzle(&self) -> &PuzzleEntry {
        &self.puzzle
    }

    pub fn tile_order(&self) -> &[usize] {
        &self.tile_order
    }

    pub fn plan(&self) -> &RevealPlan {
        &self.plan
    }

    pub fn reveal_mode(&self) -> RevealMode {
        self.settings.reveal_mode
    }

    pub fn day_mode(&self) -> DayMode {
        self.steps.day_mode()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stamps(&self) -> &StampLog {
        &self.stamps
    }

    pub fn streak(&self) -> u32 {
        self.stamps.current_streak(self.today)
    }

    /// Last completed step, -1 if none
    pub fn current_step(&self) -> i32 {
        self.progress.current_step()
    }

    pub fn step_count(&self) -> usize {
        self.steps.step_count()
    }

    pub fn is_solved(&self) -> bool {
        self.progress.is_solved()
    }

    pub fn active_steps(&self) -> Vec<&'static StepDefinition> {
        self.steps.active_steps()
    }

    pub fn is_step_active(&self, id: &str) -> bool {
        self.steps.is_active(id)
    }

    /// Hint for the picture as revealed so far
    pub fn current_hint(&self) -> Option<&str> {
        self.puzzle.hint_for_step(self.current_step())
    }

    /// Tiles (jigsaw) revealed at the current step
    pub fn revealed_tiles(&self) -> usize {
        self.plan.tiles_at(self.current_step())
    }

    /// Fraction (curtain/blur) revealed at the current step
    pub fn revealed_percent(&self) -> f32 {
        self.plan.percent_at(self.current_step())
    }

    pub fn image(&self) -> &ImageSlot {
        &self.image
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // === Actions ===

    /// Complete `step` if it is next in line
    pub fn complete_step(&mut self, step: usize) -> CompletionOutcome {
        self.refresh_date();

        let outcome = self.progress.complete(step, self.today, self.store.as_mut());
        match outcome {
            CompletionOutcome::Ignored => {}
            CompletionOutcome::Advanced { step } => {
                self.events.push(SessionEvent::StepCompleted { step });
            }
            CompletionOutcome::Solved { .. } => {
                self.events.push(SessionEvent::Solved {
                    puzzle_id: self.puzzle.id.clone(),
                });
                self.award_stamp();
            }
        }
        outcome
    }

    fn award_stamp(&mut self) {
        if !self.stamps.award(self.today, &self.puzzle) {
            log::debug!("'{}' already stamped today", self.puzzle.id);
            return;
        }
        self.stamps.save(self.store.as_mut());
        let streak = self.stamps.current_streak(self.today);
        log::info!("Stamp awarded for '{}' (streak {})", self.puzzle.id, streak);
        self.events.push(SessionEvent::StampAwarded {
            puzzle_id: self.puzzle.id.clone(),
            streak,
        });
    }

    /// Pick a puzzle by hand; it stays selected across days until reset
    /// Returns false for unknown ids or the current puzzle
    pub fn switch_puzzle(&mut self, id: &str) -> bool {
        if id == self.puzzle.id {
            return false;
        }
        let Some(entry) = self.catalog.find(id).cloned() else {
            log::warn!("Unknown puzzle '{}'", id);
            return false;
        };

        self.settings.puzzle_override = Some(entry.id.clone());
        self.settings.save_override(self.store.as_mut());
        log::info!("Switched to puzzle '{}'", entry.id);
        self.bind_puzzle(entry);
        self.reset_progress();
        true
    }

    /// Forget the manual pick and today's progress
    pub fn reset(&mut self) {
        self.today = self.clock.today();
        if self.settings.puzzle_override.take().is_some() {
            self.settings.save_override(self.store.as_mut());
        }
        let todays = self.catalog.for_date(self.today).clone();
        if todays.id != self.puzzle.id {
            self.bind_puzzle(todays);
        }
        log::info!("Progress reset");
        self.reset_progress();
    }

    pub fn set_reveal_mode(&mut self, mode: RevealMode) -> bool {
        if mode == self.settings.reveal_mode {
            return false;
        }
        self.settings.reveal_mode = mode;
        self.settings.save(self.store.as_mut());
        log::info!("Reveal mode: {}", mode.as_str());
        self.reset_progress();
        true
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.settings.sound_enabled != enabled {
            self.settings.sound_enabled = enabled;
            self.settings.save(self.store.as_mut());
        }
    }

    pub fn toggle_step(&mut self, id: &str) -> ConfigChange {
        let change = self.steps.toggle(id);
        self.after_config_change(change)
    }

    pub fn reorder_steps(&mut self, from: usize, to: usize) -> ConfigChange {
        let change = self.steps.reorder(from, to);
        self.after_config_change(change)
    }

    pub fn set_day_mode(&mut self, mode: DayMode) -> ConfigChange {
        let change = self.steps.set_day_mode(mode);
        self.after_config_change(change)
    }

    pub fn toggle_day_mode(&mut self) -> ConfigChange {
        self.set_day_mode(self.steps.day_mode().toggled())
    }

    fn after_config_change(&mut self, change: ConfigChange) -> ConfigChange {
        if let ConfigChange::Rejected(reason) = change {
            log::debug!("Step config change rejected: {:?}", reason);
            return change;
        }

        self.steps.save(self.store.as_mut());
        self.plan = RevealPlan::new(self.steps.step_count());
        log::info!(
            "Step config changed ({} mode, {} steps)",
            self.steps.day_mode().as_str(),
            self.steps.step_count()
        );
        self.reset_progress();
        change
    }

    /// Pick up a calendar day change while running
    /// Returns true if the day changed
    pub fn refresh_date(&mut self) -> bool {
        let today = self.clock.today();
        if today == self.today {
            return false;
        }

        log::info!("New day: {} -> {}", self.today, today);
        self.today = today;
        if self.settings.puzzle_override.is_none() {
            let todays = self.catalog.for_date(today).clone();
            if todays.id != self.puzzle.id {
                self.bind_puzzle(todays);
            }
        }
        self.reset_progress();
        true
    }

    /// Register a user-added picture
    pub fn add_custom_puzzle(&mut self, entry: PuzzleEntry) -> Result<(), CatalogError> {
        self.catalog.add_custom(entry)
    }

    /// Remove a user-added picture, falling back to today's if it was showing
    pub fn remove_custom_puzzle(&mut self, id: &str) -> bool {
        if self.catalog.remove_custom(id).is_none() {
            return false;
        }
        if self.puzzle.id == id {
            self.reset();
        }
        true
    }

    fn bind_puzzle(&mut self, entry: PuzzleEntry) {
        self.tile_order = default_tile_order(&entry.id);
        self.puzzle = entry;
        self.image = ImageSlot::Empty;
    }

    fn reset_progress(&mut self) {
        self.progress
            .rebind(&self.puzzle.id, self.steps.step_count(), self.store.as_mut());
        self.events.push(SessionEvent::ProgressReset);
    }

    // === Image + rendering ===

    /// Start loading the current puzzle's picture
    ///
    /// Returns the request token and the image reference to fetch. Any
    /// earlier request still in flight becomes stale.
    pub fn begin_image_load(&mut self) -> (LoadToken, String) {
        self.next_token += 1;
        let token = LoadToken(self.next_token);
        self.image = ImageSlot::Pending { token };
        (token, self.puzzle.image_ref.clone())
    }

    /// Deliver a loader result; stale tokens are dropped
    pub fn finish_image_load(&mut self, token: LoadToken, result: Result<Bitmap, ImageError>) -> bool {
        if let Err(e) = &result {
            log::warn!("Image load {:?} failed: {}", token, e);
        }
        let bound = self.image.resolve(token, result);
        if !bound {
            log::debug!("Dropping stale image load {:?}", token);
        }
        bound
    }

    /// Draw the current state into `frame`
    pub fn render(&self, frame: &mut Frame) -> RenderOutcome {
        let view = RevealView {
            step: self.current_step(),
            plan: &self.plan,
            tile_order: &self.tile_order,
            seed: seed_from_id(&self.puzzle.id) as u64,
        };
        renderer::render(self.settings.reveal_mode, &self.image, &view, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rejection;
    use crate::persistence::{MemoryStore, keys};
    use crate::platform::FixedClock;
    use crate::renderer::jigsaw::revealed_tiles;
    use crate::renderer::test_support::{coord_image, count_image_pixels};
    use std::rc::Rc;

    /// 2026-10-18: day 18 maps to "komachi"
    fn komachi_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn session_with(store: MemoryStore, clock: Rc<FixedClock>) -> Session {
        Session::new(Box::new(store), Box::new(clock), PuzzleCatalog::builtin())
    }

    fn session() -> (Session, Rc<FixedClock>) {
        let clock = Rc::new(FixedClock::new(komachi_day()));
        (session_with(MemoryStore::new(), clock.clone()), clock)
    }

    fn loaded(session: &mut Session) {
        let (token, _) = session.begin_image_load();
        assert!(session.finish_image_load(token, Ok(coord_image(64))));
    }

    #[test]
    fn test_fresh_session_defaults() {
        let (session, _) = session();
        assert_eq!(session.puzzle().id, "komachi");
        assert_eq!(session.current_step(), -1);
        assert_eq!(session.step_count(), 5);
        assert_eq!(session.reveal_mode(), RevealMode::Jigsaw);
        assert_eq!(session.day_mode(), DayMode::Weekday);
        assert_eq!(
            session.tile_order(),
            &[10, 15, 8, 6, 5, 7, 1, 14, 2, 11, 12, 9, 0, 13, 4, 3]
        );
        assert_eq!(session.current_hint(), None);
    }

    #[test]
    fn test_first_step_reveals_one_tile() {
        let (mut session, _) = session();
        loaded(&mut session);

        let outcome = session.complete_step(0);
        assert_eq!(outcome, CompletionOutcome::Advanced { step: 0 });
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.revealed_tiles(), 1);

        let view = RevealView {
            step: session.current_step(),
            plan: session.plan(),
            tile_order: session.tile_order(),
            seed: 0,
        };
        let open = revealed_tiles(&view);
        assert_eq!(open.iter().filter(|&&o| o).count(), 1);
        assert!(open[10]);

        let mut frame = Frame::new(64);
        assert_eq!(session.render(&mut frame), RenderOutcome::Drawn);
        assert_eq!(count_image_pixels(&frame, &coord_image(64)), 16 * 16);

        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::StepCompleted { step: 0 }]
        );
        assert!(session.drain_events().is_empty());
        assert!(session.current_hint().is_some());
    }

    #[test]
    fn test_skip_ahead_is_ignored() {
        let (mut session, _) = session();
        session.complete_step(0);
        assert_eq!(session.complete_step(2), CompletionOutcome::Ignored);
        assert_eq!(session.current_step(), 0);
    }

    #[test]
    fn test_holiday_curtain_solves_once() {
        let (mut session, _) = session();
        assert!(session.set_day_mode(DayMode::Holiday).is_applied());
        assert!(session.set_reveal_mode(RevealMode::Curtain));
        assert_eq!(session.step_count(), 2);
        session.drain_events();

        session.complete_step(0);
        assert_eq!(session.revealed_percent(), 0.25);

        assert_eq!(session.complete_step(1), CompletionOutcome::Solved { step: 1 });
        assert_eq!(session.revealed_percent(), 1.0);
        assert_eq!(session.complete_step(1), CompletionOutcome::Ignored);

        let events = session.drain_events();
        let solved = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Solved { .. }))
            .count();
        assert_eq!(solved, 1);
        assert!(session.is_solved());
    }

    #[test]
    fn test_redraw_after_frame_resize() {
        let (mut session, _) = session();
        loaded(&mut session);
        for i in 0..5 {
            session.complete_step(i);
        }

        let mut frame = Frame::new(16);
        assert_eq!(session.render(&mut frame), RenderOutcome::Drawn);

        frame.resize(64);
        assert_eq!(session.render(&mut frame), RenderOutcome::Drawn);
        let image = coord_image(64);
        assert_eq!(count_image_pixels(&frame, &image), 64 * 64);
    }

    #[test]
    fn test_config_change_resets_progress() {
        let (mut session, _) = session();
        for i in 0..3 {
            session.complete_step(i);
        }
        assert_eq!(session.current_step(), 2);
        assert!(session.store().get(keys::PROGRESS).is_some());

        assert!(session.toggle_step("bath").is_applied());
        assert!(session.toggle_step("bed").is_applied());
        assert_eq!(session.step_count(), 3);
        assert_eq!(session.plan().tiles, vec![2, 7, 16]);
        assert_eq!(session.current_step(), -1);
        assert_eq!(session.store().get(keys::PROGRESS), None);
        assert!(session.drain_events().contains(&SessionEvent::ProgressReset));
    }

    #[test]
    fn test_reorder_resets_progress() {
        let (mut session, _) = session();
        session.complete_step(0);
        session.complete_step(1);
        assert_eq!(session.current_step(), 1);

        assert!(session.reorder_steps(0, 3).is_applied());
        assert_eq!(session.step_count(), 5);
        assert_eq!(session.current_step(), -1);
        assert_eq!(session.store().get(keys::PROGRESS), None);
        assert!(session.drain_events().contains(&SessionEvent::ProgressReset));
    }

    #[test]
    fn test_day_mode_switch_resets_progress() {
        let (mut session, _) = session();
        session.complete_step(0);
        assert!(session.store().get(keys::PROGRESS).is_some());

        assert!(session.toggle_day_mode().is_applied());
        assert_eq!(session.day_mode(), DayMode::Holiday);
        assert_eq!(session.step_count(), 2);
        assert_eq!(session.plan().tiles.len(), 2);
        assert_eq!(session.current_step(), -1);
        assert_eq!(session.store().get(keys::PROGRESS), None);
    }

    #[test]
    fn test_rejected_config_change_keeps_progress() {
        let (mut session, _) = session();
        session.complete_step(0);
        assert_eq!(
            session.toggle_step("unicycle"),
            ConfigChange::Rejected(Rejection::UnknownStep)
        );
        assert_eq!(
            session.reorder_steps(1, 1),
            ConfigChange::Rejected(Rejection::NoChange)
        );
        assert_eq!(session.current_step(), 0);
    }

    #[test]
    fn test_reveal_mode_switch_resets() {
        let (mut session, _) = session();
        session.complete_step(0);
        assert!(!session.set_reveal_mode(RevealMode::Jigsaw));
        assert_eq!(session.current_step(), 0);
        assert!(session.set_reveal_mode(RevealMode::Blur));
        assert_eq!(session.current_step(), -1);
    }

    #[test]
    fn test_one_stamp_per_day() {
        let (mut session, _) = session();
        session.set_day_mode(DayMode::Holiday);
        session.complete_step(0);
        session.complete_step(1);
        session.complete_step(1);
        assert_eq!(session.stamps().len(), 1);

        session.reset();
        session.complete_step(0);
        session.complete_step(1);
        assert_eq!(session.stamps().len(), 1);

        let awarded = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::StampAwarded { .. }))
            .count();
        assert_eq!(awarded, 1);
    }

    #[test]
    fn test_progress_survives_reload_same_day() {
        let (mut session, clock) = session();
        session.complete_step(0);
        session.complete_step(1);

        let store = session.into_store();
        let session = Session::new(store, Box::new(clock), PuzzleCatalog::builtin());
        assert_eq!(session.current_step(), 1);
    }

    #[test]
    fn test_progress_discarded_next_day() {
        let (mut session, clock) = session();
        session.complete_step(0);

        clock.advance_days(1);
        let store = session.into_store();
        let session = Session::new(store, Box::new(clock), PuzzleCatalog::builtin());
        assert_eq!(session.current_step(), -1);
        assert_eq!(session.store().get(keys::PROGRESS), None);
    }

    #[test]
    fn test_live_rollover() {
        let (mut session, clock) = session();
        session.complete_step(0);
        assert!(!session.refresh_date());

        clock.advance_days(1);
        assert!(session.refresh_date());
        assert_eq!(session.current_step(), -1);
        assert_ne!(session.puzzle().id, "komachi");
        assert!(!session.image().is_loaded());
    }

    #[test]
    fn test_completion_after_midnight_starts_over() {
        let (mut session, clock) = session();
        session.complete_step(0);
        clock.advance_days(1);
        assert_eq!(session.complete_step(1), CompletionOutcome::Ignored);
        assert_eq!(
            session.complete_step(0),
            CompletionOutcome::Advanced { step: 0 }
        );
    }

    #[test]
    fn test_switch_puzzle_persists_override() {
        let (mut session, clock) = session();
        session.complete_step(0);

        assert!(!session.switch_puzzle("komachi"));
        assert!(!session.switch_puzzle("nope"));
        assert!(session.switch_puzzle("panda"));
        assert_eq!(session.current_step(), -1);
        assert_eq!(
            session.store().get(keys::PUZZLE_OVERRIDE).as_deref(),
            Some("panda")
        );

        // override sticks across days
        clock.advance_days(1);
        session.refresh_date();
        assert_eq!(session.puzzle().id, "panda");

        session.reset();
        assert_eq!(session.store().get(keys::PUZZLE_OVERRIDE), None);
        assert_eq!(session.puzzle().id, session.catalog().for_date(session.today()).id);
    }

    #[test]
    fn test_unknown_override_falls_back() {
        let mut store = MemoryStore::new();
        store.set(keys::PUZZLE_OVERRIDE, "deleted-picture").unwrap();
        let clock = Rc::new(FixedClock::new(komachi_day()));
        let session = session_with(store, clock);
        assert_eq!(session.puzzle().id, "komachi");
        assert_eq!(session.store().get(keys::PUZZLE_OVERRIDE), None);
    }

    #[test]
    fn test_stale_image_load_is_dropped() {
        let (mut session, _) = session();
        let (first, _) = session.begin_image_load();
        let (second, image_ref) = session.begin_image_load();
        assert_eq!(image_ref, "images/komachi.png");

        assert!(!session.finish_image_load(first, Ok(coord_image(8))));
        let mut frame = Frame::new(8);
        assert_eq!(session.render(&mut frame), RenderOutcome::Skipped);

        assert!(session.finish_image_load(second, Err(ImageError::LoadFailed(image_ref))));
        assert_eq!(session.render(&mut frame), RenderOutcome::ErrorFrame);
        assert_eq!(session.current_step(), -1);
    }

    #[test]
    fn test_switch_invalidates_in_flight_load() {
        let (mut session, _) = session();
        let (token, _) = session.begin_image_load();
        session.switch_puzzle("panda");
        assert!(!session.finish_image_load(token, Ok(coord_image(8))));
        assert!(!session.image().is_loaded());
    }

    #[test]
    fn test_custom_puzzle_lifecycle() {
        let (mut session, _) = session();
        let entry = PuzzleEntry::new("my-drawing", "My drawing", "blob:drawing", &[]);
        session.add_custom_puzzle(entry.clone()).unwrap();
        assert_eq!(
            session.add_custom_puzzle(entry),
            Err(CatalogError::DuplicateId("my-drawing".to_string()))
        );

        assert!(session.switch_puzzle("my-drawing"));
        assert!(session.remove_custom_puzzle("my-drawing"));
        assert_eq!(session.puzzle().id, "komachi");
        assert!(!session.remove_custom_puzzle("komachi"));
    }
}
