//! Narrative events emitted towards the presentation layer.

use std::fmt;

use crate::location::Location;
use crate::puzzle::Puzzle;

/// Sound cues the presentation layer may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Moving between rooms.
    Transition,
    /// A key was found.
    KeyFound,
    /// The alarm clock in room 605.
    Alarm,
    /// Closing credits music.
    Credits,
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transition => "transition",
            Self::KeyFound => "key_found",
            Self::Alarm => "alarm",
            Self::Credits => "credits",
        };
        f.write_str(name)
    }
}

/// Something the presentation layer should show or play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeEvent {
    /// The player entered a location.
    LocationChanged(Location),
    /// The header label changed without the player moving.
    TitleChanged(String),
    /// Lines of story text.
    StoryText {
        /// Text lines, shown in order.
        lines: Vec<String>,
        /// Show at once instead of revealing character by character.
        instant: bool,
        /// The lines are the closing credits.
        credits: bool,
    },
    /// The choices the player may pick from. Empty hides the choice list.
    ChoicesAvailable {
        /// Choice labels; the position is the selection index.
        items: Vec<String>,
        /// Whether labels should be shown with their numbers.
        numbered: bool,
    },
    /// A puzzle became active.
    PuzzleStarted(Puzzle),
    /// A sound cue.
    AudioCue(AudioCue),
    /// The game is over.
    GameEnded {
        /// Whether the player won.
        victory: bool,
    },
}

impl NarrativeEvent {
    /// Story text revealed with the typewriter effect.
    pub fn story(lines: &[&str]) -> Self {
        Self::StoryText {
            lines: to_owned_lines(lines),
            instant: false,
            credits: false,
        }
    }

    /// Closing credits, shown at once.
    pub fn credits(lines: &[&str]) -> Self {
        Self::StoryText {
            lines: to_owned_lines(lines),
            instant: true,
            credits: true,
        }
    }

    /// A numbered choice list.
    pub fn choices(items: &[&str]) -> Self {
        Self::ChoicesAvailable {
            items: to_owned_lines(items),
            numbered: true,
        }
    }

    /// An empty choice list, hiding the choice UI.
    pub fn no_choices() -> Self {
        Self::ChoicesAvailable {
            items: Vec::new(),
            numbered: false,
        }
    }
}

fn to_owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Outbox of events waiting to be drained by the presentation layer.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<NarrativeEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: NarrativeEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<NarrativeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether there is nothing to drain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
