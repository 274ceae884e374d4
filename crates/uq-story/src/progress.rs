//! Player progress record.
//!
//! Tracks where the player has been, what they carry and how they are doing.
//! Counting mutations notify subscribed [`StatsObserver`]s with the new
//! [`Stats`]. The record is never persisted by the game itself; a
//! [`ProgressSnapshot`] is provided as an extension point for save/load.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoryResult;
use crate::location::Location;

/// Counters shown to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Distinct puzzles solved.
    pub puzzles_solved: u32,
    /// Wrong puzzle answers given.
    pub wrong_answers: u32,
    /// Distinct locations entered.
    pub locations_visited: u32,
    /// Distinct items picked up.
    pub items_collected: u32,
}

/// Receives a stats snapshot after every counting mutation.
pub trait StatsObserver {
    /// Called with the stats as they are after the change.
    fn stats_changed(&mut self, stats: &Stats);
}

impl<F> StatsObserver for F
where
    F: FnMut(&Stats),
{
    fn stats_changed(&mut self, stats: &Stats) {
        self(stats)
    }
}

/// Mutable record of a single playthrough.
pub struct Progress {
    visited: HashSet<Location>,
    solved: HashSet<String>,
    items: HashSet<String>,
    flags: HashMap<String, bool>,
    stats: Stats,
    started_at: DateTime<Utc>,
    observers: Vec<Box<dyn StatsObserver>>,
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("visited", &self.visited)
            .field("solved", &self.solved)
            .field("items", &self.items)
            .field("flags", &self.flags)
            .field("stats", &self.stats)
            .field("started_at", &self.started_at)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create an empty record starting now.
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            solved: HashSet::new(),
            items: HashSet::new(),
            flags: HashMap::new(),
            stats: Stats::default(),
            started_at: Utc::now(),
            observers: Vec::new(),
        }
    }

    /// Clear everything and restart the session clock. Observers stay subscribed.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.solved.clear();
        self.items.clear();
        self.flags.clear();
        self.stats = Stats::default();
        self.started_at = Utc::now();
    }

    /// Subscribe to stats changes.
    pub fn subscribe(&mut self, observer: impl StatsObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self) {
        let stats = self.stats;
        for observer in &mut self.observers {
            observer.stats_changed(&stats);
        }
    }

    /// Add an item. Returns `false` if it was already owned.
    pub fn add_item(&mut self, item: &str) -> bool {
        if !self.items.insert(item.to_string()) {
            return false;
        }
        self.stats.items_collected += 1;
        self.notify();
        true
    }

    /// Check if the player owns an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// Mark a location visited. Returns `false` if it was visited before.
    pub fn visit_location(&mut self, location: Location) -> bool {
        if !self.visited.insert(location) {
            return false;
        }
        self.stats.locations_visited += 1;
        self.notify();
        true
    }

    /// Check if a location was visited.
    pub fn has_visited(&self, location: Location) -> bool {
        self.visited.contains(&location)
    }

    /// Mark a puzzle solved. Returns `false` if it was solved before.
    pub fn solve_puzzle(&mut self, puzzle: &str) -> bool {
        if !self.solved.insert(puzzle.to_string()) {
            return false;
        }
        self.stats.puzzles_solved += 1;
        self.notify();
        true
    }

    /// Check if a puzzle was solved.
    pub fn is_solved(&self, puzzle: &str) -> bool {
        self.solved.contains(puzzle)
    }

    /// Count a wrong answer.
    pub fn increment_wrong_answers(&mut self) {
        self.stats.wrong_answers += 1;
        self.notify();
    }

    /// Set a named flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Read a named flag, `false` when unset.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Current counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Owned items.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Time elapsed since the session started.
    pub fn play_time(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// Whether nothing has been recorded since the last reset.
    pub fn is_fresh(&self) -> bool {
        self.visited.is_empty()
            && self.solved.is_empty()
            && self.items.is_empty()
            && self.flags.is_empty()
            && self.stats == Stats::default()
    }

    /// Capture the record in a serializable form.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            visited: self.visited.iter().copied().collect(),
            solved: self.solved.iter().cloned().collect(),
            items: self.items.iter().cloned().collect(),
            flags: self
                .flags
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            stats: self.stats,
            started_at: self.started_at,
        }
    }

    /// Replace the record's contents with a snapshot and notify observers.
    pub fn restore(&mut self, snapshot: ProgressSnapshot) {
        self.visited = snapshot.visited.into_iter().collect();
        self.solved = snapshot.solved.into_iter().collect();
        self.items = snapshot.items.into_iter().collect();
        self.flags = snapshot.flags.into_iter().collect();
        self.stats = snapshot.stats;
        self.started_at = snapshot.started_at;
        self.notify();
    }

    /// Encode the record as pretty JSON.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Decode a record from JSON produced by [`Progress::to_json`].
    pub fn from_json(json: &str) -> StoryResult<Self> {
        let snapshot: ProgressSnapshot = serde_json::from_str(json)?;
        let mut progress = Self::new();
        progress.restore(snapshot);
        Ok(progress)
    }
}

/// Serializable copy of a [`Progress`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Visited locations.
    pub visited: BTreeSet<Location>,
    /// Solved puzzle ids.
    pub solved: BTreeSet<String>,
    /// Owned item ids.
    pub items: BTreeSet<String>,
    /// Named flags.
    pub flags: BTreeMap<String, bool>,
    /// Counters.
    pub stats: Stats,
    /// Session start.
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_record_is_fresh() {
        let progress = Progress::new();
        assert!(progress.is_fresh());
        assert_eq!(progress.stats(), Stats::default());
    }

    #[test]
    fn items_count_once() {
        let mut progress = Progress::new();
        assert!(progress.add_item("library_key"));
        assert!(!progress.add_item("library_key"));
        assert!(progress.has_item("library_key"));
        assert_eq!(progress.stats().items_collected, 1);
    }

    #[test]
    fn visits_count_once() {
        let mut progress = Progress::new();
        assert!(progress.visit_location(Location::Library));
        assert!(!progress.visit_location(Location::Library));
        assert!(progress.has_visited(Location::Library));
        assert!(!progress.has_visited(Location::Room605));
        assert_eq!(progress.stats().locations_visited, 1);
    }

    #[test]
    fn puzzles_count_once() {
        let mut progress = Progress::new();
        assert!(progress.solve_puzzle("math"));
        assert!(!progress.solve_puzzle("math"));
        assert!(progress.is_solved("math"));
        assert_eq!(progress.stats().puzzles_solved, 1);
    }

    #[test]
    fn flags_default_to_false() {
        let mut progress = Progress::new();
        assert!(!progress.flag("woke_up"));
        progress.set_flag("woke_up", true);
        assert!(progress.flag("woke_up"));
        progress.set_flag("woke_up", false);
        assert!(!progress.flag("woke_up"));
    }

    #[test]
    fn reset_clears_everything_but_keeps_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut progress = Progress::new();
        progress.subscribe(move |s: &Stats| sink.borrow_mut().push(*s));
        progress.add_item("library_key");
        progress.visit_location(Location::EntranceHall);
        progress.solve_puzzle("math");
        progress.increment_wrong_answers();
        progress.set_flag("x", true);

        progress.reset();
        assert!(progress.is_fresh());
        assert_eq!(progress.items().count(), 0);

        progress.add_item("room_521_key");
        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4].items_collected, 1);
    }

    #[test]
    fn observers_see_every_counting_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut progress = Progress::new();
        progress.subscribe(move |s: &Stats| sink.borrow_mut().push(*s));

        progress.visit_location(Location::EntranceHall);
        progress.visit_location(Location::EntranceHall);
        progress.increment_wrong_answers();
        progress.set_flag("silent", true);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].locations_visited, 1);
        assert_eq!(seen[1].wrong_answers, 1);
    }

    #[test]
    fn json_round_trip_preserves_contents() {
        let mut progress = Progress::new();
        progress.visit_location(Location::EntranceHall);
        progress.visit_location(Location::Library);
        progress.add_item("library_key");
        progress.solve_puzzle("math");
        progress.set_flag("woke_up", true);
        progress.increment_wrong_answers();

        let json = progress.to_json().unwrap();
        assert!(json.contains("\"library\""));
        assert!(json.contains("library_key"));

        let restored = Progress::from_json(&json).unwrap();
        assert_eq!(restored.snapshot(), progress.snapshot());
    }

    #[test]
    fn bad_json_is_a_snapshot_error() {
        let err = Progress::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("progress snapshot error"));
    }

    #[test]
    fn play_time_is_not_negative() {
        let progress = Progress::new();
        assert!(progress.play_time() >= chrono::Duration::zero());
    }

    proptest! {
        #[test]
        fn visit_counter_matches_distinct_locations(picks in proptest::collection::vec(0usize..6, 0..40)) {
            let mut progress = Progress::new();
            let mut distinct = HashSet::new();
            for i in picks {
                let loc = Location::ALL[i];
                progress.visit_location(loc);
                distinct.insert(loc);
            }
            prop_assert_eq!(progress.stats().locations_visited as usize, distinct.len());
        }

        #[test]
        fn item_counter_matches_distinct_items(items in proptest::collection::vec("[a-c]_key", 0..20)) {
            let mut progress = Progress::new();
            for item in &items {
                progress.add_item(item);
            }
            let distinct: HashSet<_> = items.iter().collect();
            prop_assert_eq!(progress.stats().items_collected as usize, distinct.len());
        }
    }
}
