//! Static story content: descriptions, choices and responses.
//!
//! Pure lookup data. Choice position in a list is the selection index, so the
//! order of each `choices` slice is significant.

use crate::event::AudioCue;
use crate::location::{Location, Room605Stage};
use crate::puzzle::PuzzleKind;

/// Item granted by the lexicology book.
pub const LIBRARY_KEY: &str = "library_key";
/// Item granted by solving the math puzzle.
pub const ROOM_521_KEY: &str = "room_521_key";

/// Flag set once the player wakes up in room 605.
pub const FLAG_WOKE_UP: &str = "woke_up";

/// Generic reply to a wrong puzzle answer.
pub const WRONG_ANSWER: &[&str] = &["Incorrect... Try again."];

/// What happens when a choice is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Move to another location.
    Transition {
        /// Where the player goes.
        target: Location,
        /// Sound played on the way.
        cue: Option<AudioCue>,
    },
    /// Grant an item and start a puzzle in place.
    Unlock {
        /// Item granted.
        item: &'static str,
        /// Puzzle started.
        puzzle: PuzzleKind,
    },
    /// Stay put.
    Reject,
}

/// A selectable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Label shown to the player.
    pub text: &'static str,
    /// Lines shown when the choice is picked.
    pub response: &'static [&'static str],
    /// Effect of picking it.
    pub outcome: ChoiceOutcome,
}

const fn reject(text: &'static str, response: &'static [&'static str]) -> ChoiceEntry {
    ChoiceEntry {
        text,
        response,
        outcome: ChoiceOutcome::Reject,
    }
}

/// One screen of story: text, then either choices or a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    /// Lines shown when the scene is displayed.
    pub description: &'static [&'static str],
    /// Options offered afterwards.
    pub choices: &'static [ChoiceEntry],
    /// Puzzle started afterwards, if any.
    pub puzzle: Option<PuzzleKind>,
}

impl Scene {
    /// Choice labels in selection order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.choices.iter().map(|c| c.text).collect()
    }

    /// Index of the choice with the given label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.choices.iter().position(|c| c.text == label)
    }
}

/// The ground floor hall.
pub static ENTRANCE_HALL: Scene = Scene {
    description: &[
        "The ground floor hall is empty. The clock above the cloakroom has stopped.",
        "Someone has left a note on the information desk: \"See you at 6:05.\"",
        "The corridor lights flicker, pointing the way to the library.",
    ],
    choices: &[
        ChoiceEntry {
            text: "Go to the library",
            response: &["You follow the flickering lights down the corridor."],
            outcome: ChoiceOutcome::Transition {
                target: Location::Library,
                cue: None,
            },
        },
        reject(
            "Check the cloakroom",
            &[
                "The cloakroom is locked. Nobody has worked here for years.",
                "That's not the place... Try again.",
            ],
        ),
        reject(
            "Leave through the main door",
            &[
                "The main door does not budge, as if the building will not let you go.",
                "That's not the place... Try again.",
            ],
        ),
    ],
    puzzle: None,
};

/// The library and its six books.
pub static LIBRARY: Scene = Scene {
    description: &[
        "Rows of shelves disappear into the dark.",
        "Six books lie on the reading table. One of them does not belong here.",
    ],
    choices: &[
        reject("Linear Algebra", &["Matrices and nothing else. This book doesn't stand out..."]),
        reject(
            "History of the University",
            &["A list of rectors and founding dates. This book doesn't stand out..."],
        ),
        reject(
            "Organic Chemistry",
            &["The pages smell of old reagents. This book doesn't stand out..."],
        ),
        reject(
            "World Literature",
            &["Someone underlined every third word, then gave up. Try another one."],
        ),
        reject(
            "Introduction to Philosophy",
            &["Does this book even exist? It doesn't stand out..."],
        ),
        ChoiceEntry {
            text: "Lexicology",
            response: &[
                "The lexicology textbook falls open on its own.",
                "A small brass key slides out from between the pages.",
                "On the flyleaf someone has scribbled an equation and circled it twice.",
            ],
            outcome: ChoiceOutcome::Unlock {
                item: LIBRARY_KEY,
                puzzle: PuzzleKind::Math,
            },
        },
    ],
    puzzle: None,
};

/// The library once the math puzzle is solved.
pub static LIBRARY_AFTER_PUZZLE: Scene = Scene {
    description: &["The corridors upstairs are open now. Where to go?"],
    choices: &[
        reject(
            "Room 314",
            &["Room 314 is dark and the key doesn't fit. Wrong door."],
        ),
        ChoiceEntry {
            text: "Room 521",
            response: &["You climb the stairs to the fifth floor. The key turns easily."],
            outcome: ChoiceOutcome::Transition {
                target: Location::Room521,
                cue: Some(AudioCue::Transition),
            },
        },
        reject(
            "The cafeteria",
            &["The cafeteria shutters are down. Nobody eats at this hour."],
        ),
    ],
    puzzle: None,
};

/// Room 521 on entry: the blackboard puzzle.
pub static ROOM_521: Scene = Scene {
    description: &[
        "Room 521 smells of chalk.",
        "Someone has written a row of numbers on the blackboard and left the last one blank.",
    ],
    choices: &[],
    puzzle: Some(PuzzleKind::Sequence),
};

/// Room 521 once the sequence puzzle is solved.
pub static ROOM_521_CLUE: Scene = Scene {
    description: &[
        "The chalk moves by itself and completes the row: 3.14159...",
        "Beneath it a new line appears: \"Six floors up. Five past six.\"",
        "Where now?",
    ],
    choices: &[
        reject("Room 506", &["Room 506 is a storage closet full of broken chairs."]),
        ChoiceEntry {
            text: "Room 605",
            response: &["You take the stairs one more floor up."],
            outcome: ChoiceOutcome::Transition {
                target: Location::Room605,
                cue: None,
            },
        },
        reject("Room 650", &["There is no room 650. The corridor ends at 649."]),
        reject(
            "Back to the library",
            &["The library has told you everything it knows."],
        ),
    ],
    puzzle: None,
};

/// Room 605 on entry.
pub static ROOM_605: Scene = Scene {
    description: &[
        "Room 605 is flooded with pale morning light.",
        "There is nobody here, only an old alarm clock ticking on the lecturer's desk.",
    ],
    choices: &[],
    puzzle: None,
};

/// The single action offered at a room 605 stage and what taking it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageBeat {
    /// Label of the one action on offer.
    pub action: &'static str,
    /// Lines shown after the action is taken.
    pub response: &'static [&'static str],
    /// Header label shown after the action is taken.
    pub title: Option<&'static str>,
    /// Sound played after the action is taken.
    pub cue: Option<AudioCue>,
}

static STAGE_FIRST: StageBeat = StageBeat {
    action: "Look out of the window",
    response: &[
        "Outside, the campus is empty. The street lamps go out one by one.",
        "Your reflection in the glass looks tired. Very tired.",
    ],
    title: Some("— — —"),
    cue: None,
};

static STAGE_SECOND: StageBeat = StageBeat {
    action: "Inspect the room",
    response: &[
        "Your own notebook lies on the front desk, open at the page where you fell asleep.",
        "The alarm clock reads 6:04.",
    ],
    title: None,
    cue: None,
};

static STAGE_WAKE_UP: StageBeat = StageBeat {
    action: "Wake up",
    response: &[
        "The alarm rings. 6:05.",
        "You open your eyes at your desk at home. The exam is today.",
        "On the desk lies a note in your own handwriting: \"See you at 6:05.\"",
    ],
    title: Some("6:05"),
    cue: Some(AudioCue::Alarm),
};

static STAGE_FINAL: StageBeat = StageBeat {
    action: "Finish",
    response: &[
        "SEE YOU AT 6:05",
        "",
        "Story, puzzles and late nights: the University Quest team",
        "",
        "Thank you for playing.",
    ],
    title: None,
    cue: Some(AudioCue::Credits),
};

/// Beat for a room 605 stage.
pub fn stage_beat(stage: Room605Stage) -> &'static StageBeat {
    match stage {
        Room605Stage::First => &STAGE_FIRST,
        Room605Stage::Second => &STAGE_SECOND,
        Room605Stage::WakeUpReady => &STAGE_WAKE_UP,
        Room605Stage::Final => &STAGE_FINAL,
    }
}

/// Scene shown when entering a location, `None` for the credits.
pub fn entry_scene(location: Location) -> Option<&'static Scene> {
    match location {
        Location::EntranceHall => Some(&ENTRANCE_HALL),
        Location::Library => Some(&LIBRARY),
        Location::LibraryAfterPuzzle => Some(&LIBRARY_AFTER_PUZZLE),
        Location::Room521 => Some(&ROOM_521),
        Location::Room605 => Some(&ROOM_605),
        Location::Credits => None,
    }
}
