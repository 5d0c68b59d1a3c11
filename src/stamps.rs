//! Stamp log
//!
//! One stamp per solved puzzle per day, persisted as a JSON array. Used for
//! the "days in a row" streak.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_json, save_json};
use crate::puzzles::PuzzleEntry;

/// A single stamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub date: NaiveDate,
    pub puzzle_id: String,
    pub puzzle_name: String,
    pub image_ref: String,
}

/// Append-only stamp collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampLog {
    pub entries: Vec<Stamp>,
}

impl StampLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stamp for `puzzle` on `date`
    /// Returns false if that puzzle was already stamped that day
    pub fn award(&mut self, date: NaiveDate, puzzle: &PuzzleEntry) -> bool {
        if self.has_stamp(date, &puzzle.id) {
            return false;
        }

        self.entries.push(Stamp {
            date,
            puzzle_id: puzzle.id.clone(),
            puzzle_name: puzzle.name.clone(),
            image_ref: puzzle.image_ref.clone(),
        });
        true
    }

    pub fn has_stamp(&self, date: NaiveDate, puzzle_id: &str) -> bool {
        self.entries
            .iter()
            .any(|s| s.date == date && s.puzzle_id == puzzle_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stamps earned on `date`
    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = &Stamp> {
        self.entries.iter().filter(move |s| s.date == date)
    }

    /// Consecutive days with at least one stamp, counting back from `today`
    ///
    /// A streak that ended yesterday still counts; today just isn't done yet.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let stamped = |d: NaiveDate| self.entries.iter().any(|s| s.date == d);

        let mut day = if stamped(today) {
            today
        } else {
            match today.checked_sub_days(Days::new(1)) {
                Some(d) if stamped(d) => d,
                _ => return 0,
            }
        };

        let mut streak = 0;
        loop {
            streak += 1;
            match day.checked_sub_days(Days::new(1)) {
                Some(prev) if stamped(prev) => day = prev,
                _ => return streak,
            }
        }
    }

    pub fn load(store: &mut dyn KeyValueStore) -> Self {
        match load_json::<StampLog>(store, keys::STAMPS) {
            Some(stamps) => {
                log::info!("Loaded {} stamps", stamps.entries.len());
                stamps
            }
            None => {
                log::info!("No stamps found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, keys::STAMPS, self) {
            Ok(()) => log::info!("Stamps saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save stamps: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn puzzle(id: &str) -> PuzzleEntry {
        PuzzleEntry::new(id, id, &format!("images/{}.png", id), &[])
    }

    #[test]
    fn test_award_dedupes_same_day() {
        let mut log = StampLog::new();
        assert!(log.award(day(10, 16), &puzzle("komachi")));
        assert!(!log.award(day(10, 16), &puzzle("komachi")));
        assert!(log.award(day(10, 16), &puzzle("panda")));
        assert!(log.award(day(10, 17), &puzzle("komachi")));
        assert_eq!(log.len(), 3);
        assert_eq!(log.on_date(day(10, 16)).count(), 2);
    }

    #[test]
    fn test_stamp_fields() {
        let mut log = StampLog::new();
        log.award(day(10, 16), &PuzzleEntry::new("panda", "パンダ", "images/panda.png", &[]));
        let stamp = &log.entries[0];
        assert_eq!(stamp.puzzle_id, "panda");
        assert_eq!(stamp.puzzle_name, "パンダ");
        assert_eq!(stamp.image_ref, "images/panda.png");
    }

    #[test]
    fn test_streak() {
        let mut log = StampLog::new();
        assert_eq!(log.current_streak(day(10, 16)), 0);

        log.award(day(10, 14), &puzzle("a"));
        log.award(day(10, 15), &puzzle("a"));
        log.award(day(10, 15), &puzzle("b"));
        // today not yet done
        assert_eq!(log.current_streak(day(10, 16)), 2);

        log.award(day(10, 16), &puzzle("a"));
        assert_eq!(log.current_streak(day(10, 16)), 3);

        // gap breaks it
        assert_eq!(log.current_streak(day(10, 18)), 0);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let mut log = StampLog::new();
        log.award(day(9, 30), &puzzle("a"));
        log.award(day(10, 1), &puzzle("a"));
        assert_eq!(log.current_streak(day(10, 1)), 2);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut log = StampLog::new();
        log.award(day(10, 16), &puzzle("komachi"));
        log.save(&mut store);

        let json = store.get(keys::STAMPS).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""puzzleId":"komachi""#));

        let loaded = StampLog::load(&mut store);
        assert_eq!(loaded.entries, log.entries);
    }

    #[test]
    fn test_load_corrupt_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(keys::STAMPS, "{").unwrap();
        assert!(StampLog::load(&mut store).is_empty());
        assert_eq!(store.get(keys::STAMPS), None);
    }
}
