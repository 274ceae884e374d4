//! Location identifiers and the room 605 stage ladder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// A story scene the player can be in.
///
/// `LibraryAfterPuzzle` is the library once the math puzzle is solved: same
/// room, different choice set. It is a location in its own right so that
/// dispatch stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Ground-floor hall where the quest starts.
    EntranceHall,
    /// The university library with its shelf of books.
    Library,
    /// The library after the math puzzle has been solved.
    LibraryAfterPuzzle,
    /// Lecture room 521, home of the sequence puzzle.
    Room521,
    /// Lecture room 605, the four-stage finale.
    Room605,
    /// Terminal location reached after the credits.
    Credits,
}

impl Location {
    /// All locations in story order.
    pub const ALL: [Location; 6] = [
        Location::EntranceHall,
        Location::Library,
        Location::LibraryAfterPuzzle,
        Location::Room521,
        Location::Room605,
        Location::Credits,
    ];

    /// Stable identifier used in events and scripts.
    pub fn id(self) -> &'static str {
        match self {
            Self::EntranceHall => "entrance_hall",
            Self::Library => "library",
            Self::LibraryAfterPuzzle => "library_after_puzzle",
            Self::Room521 => "room_521",
            Self::Room605 => "room_605",
            Self::Credits => "credits",
        }
    }

    /// Human-readable name for headers.
    pub fn title(self) -> &'static str {
        match self {
            Self::EntranceHall => "Ground Floor Hall",
            Self::Library | Self::LibraryAfterPuzzle => "Library",
            Self::Room521 => "Room 521",
            Self::Room605 => "Room 605",
            Self::Credits => "See You at 6:05",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Location {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Location::ALL
            .into_iter()
            .find(|loc| loc.id() == wanted)
            .ok_or_else(|| StoryError::UnknownLocation(s.to_string()))
    }
}

/// Sub-state of room 605. Stages only move forward, one action per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Room605Stage {
    /// Offers "look out the window".
    #[default]
    First,
    /// Offers "inspect the room".
    Second,
    /// Offers "wake up".
    WakeUpReady,
    /// Offers "finish"; taking it ends the game.
    Final,
}

impl Room605Stage {
    /// The stage that follows this one, `None` after `Final`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::WakeUpReady),
            Self::WakeUpReady => Some(Self::Final),
            Self::Final => None,
        }
    }
}
