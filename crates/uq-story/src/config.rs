//! Timing configuration for delayed story beats.

use std::time::Duration;

use crate::location::Location;

/// Delays used by the state machine's scheduled callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryConfig {
    /// Revert delay after a wrong choice in the entrance hall.
    pub entrance_revert: Duration,
    /// Revert delay after a wrong room choice once the math puzzle is solved.
    pub after_puzzle_revert: Duration,
    /// Revert delay after a wrong choice in room 521.
    pub room_521_revert: Duration,
    /// Pause between the final action and the credits text.
    pub finale_text_delay: Duration,
    /// Pause between the credits text and the end of the game.
    pub finale_end_delay: Duration,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            entrance_revert: Duration::from_secs(7),
            after_puzzle_revert: Duration::from_secs(8),
            room_521_revert: Duration::from_secs(7),
            finale_text_delay: Duration::from_secs(3),
            finale_end_delay: Duration::from_secs(5),
        }
    }
}

impl StoryConfig {
    /// A config where every delayed beat fires at once.
    pub fn instant() -> Self {
        Self {
            entrance_revert: Duration::ZERO,
            after_puzzle_revert: Duration::ZERO,
            room_521_revert: Duration::ZERO,
            finale_text_delay: Duration::ZERO,
            finale_end_delay: Duration::ZERO,
        }
    }

    /// Set the entrance hall revert delay.
    pub fn with_entrance_revert(mut self, delay: Duration) -> Self {
        self.entrance_revert = delay;
        self
    }

    /// Set the post-puzzle library revert delay.
    pub fn with_after_puzzle_revert(mut self, delay: Duration) -> Self {
        self.after_puzzle_revert = delay;
        self
    }

    /// Set the room 521 revert delay.
    pub fn with_room_521_revert(mut self, delay: Duration) -> Self {
        self.room_521_revert = delay;
        self
    }

    /// Set both finale delays.
    pub fn with_finale_delays(mut self, text: Duration, end: Duration) -> Self {
        self.finale_text_delay = text;
        self.finale_end_delay = end;
        self
    }

    /// Revert delay for a location, `None` where wrong choices do not revert.
    pub fn revert_delay(&self, location: Location) -> Option<Duration> {
        match location {
            Location::EntranceHall => Some(self.entrance_revert),
            Location::LibraryAfterPuzzle => Some(self.after_puzzle_revert),
            Location::Room521 => Some(self.room_521_revert),
            Location::Library | Location::Room605 | Location::Credits => None,
        }
    }
}
