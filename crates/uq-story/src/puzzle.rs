//! Puzzle definitions and answer checking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// The two puzzle flavours in the quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    /// Arithmetic question in the library.
    Math,
    /// Sequence completion in room 521.
    Sequence,
}

impl PuzzleKind {
    /// Stable identifier, also used as the solved-puzzle id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Sequence => "sequence",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PuzzleKind {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "math" => Ok(Self::Math),
            "sequence" => Ok(Self::Sequence),
            _ => Err(StoryError::UnknownPuzzle(s.to_string())),
        }
    }
}

/// A free-text question with a single accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puzzle {
    /// Which puzzle this is.
    pub kind: PuzzleKind,
    /// The question shown to the player.
    pub question: &'static str,
    /// The only accepted answer.
    pub answer: &'static str,
    /// A nudge shown below the question.
    pub hint: &'static str,
}

impl Puzzle {
    /// The library arithmetic puzzle.
    pub const MATH: Puzzle = Puzzle {
        kind: PuzzleKind::Math,
        question: "Solve: (10+1)×(5+2)+444=?",
        answer: "521",
        hint: "But something is wrong there. Distortion of space and numbers.",
    };

    /// The room 521 sequence puzzle.
    pub const SEQUENCE: Puzzle = Puzzle {
        kind: PuzzleKind::Sequence,
        question: "Number series: 3, 1, 4, 1, 5, ...",
        answer: "9",
        hint: "It is a famous mathematical constant...",
    };

    /// Look up the puzzle definition for a kind.
    pub fn of_kind(kind: PuzzleKind) -> Puzzle {
        match kind {
            PuzzleKind::Math => Self::MATH,
            PuzzleKind::Sequence => Self::SEQUENCE,
        }
    }

    /// Check an answer. Surrounding whitespace is ignored, everything else
    /// must match exactly (case-sensitive, no numeric parsing).
    pub fn accepts(&self, input: &str) -> bool {
        input.trim() == self.answer
    }
}
