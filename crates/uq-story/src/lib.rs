//! Story engine for the "See You at 6:05" university quest.
//!
//! The quest is a linear walk through a handful of university locations with
//! branching choices and two answer puzzles. All branching lives in
//! [`StoryMachine`]: front-ends feed it player input and elapsed time, and
//! drain the [`NarrativeEvent`]s it produces. The machine never touches a
//! renderer.

/// Timing configuration for delayed story beats.
pub mod config;
/// Static story content: descriptions, choices and responses.
pub mod content;
/// Error types for the story engine.
pub mod error;
/// Narrative events emitted towards the presentation layer.
pub mod event;
/// Location identifiers and the room 605 stage ladder.
pub mod location;
/// The story state machine.
pub mod machine;
/// Player progress record.
pub mod progress;
/// Puzzle definitions and answer checking.
pub mod puzzle;
/// Cooperative timers on a virtual clock.
pub mod scheduler;

pub use config::StoryConfig;
pub use error::{StoryError, StoryResult};
pub use event::{AudioCue, EventLog, NarrativeEvent};
pub use location::{Location, Room605Stage};
pub use machine::StoryMachine;
pub use progress::{Progress, ProgressSnapshot, Stats, StatsObserver};
pub use puzzle::{Puzzle, PuzzleKind};
