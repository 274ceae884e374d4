//! Presentation state for the interactive front-end.
//!
//! [`PlayApp`] owns the [`StoryMachine`], turns drained events into what the
//! screen shows, and maps key presses back to machine input.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use uq_story::{AudioCue, Location, NarrativeEvent, Puzzle, StoryConfig, StoryMachine};

use crate::typewriter::{Typewriter, TypewriterConfig};

/// A block of story text on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBlock {
    /// Lines of the block.
    pub lines: Vec<String>,
    /// Rendered centred as closing credits.
    pub credits: bool,
}

impl StoryBlock {
    fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).sum()
    }
}

/// Interactive front-end state.
pub struct PlayApp {
    machine: StoryMachine,
    typewriter: Typewriter,
    /// Header text: location title or a title override.
    pub header: String,
    /// Story blocks of the current location, oldest first.
    pub blocks: Vec<StoryBlock>,
    /// Offered choice labels.
    pub choices: Vec<String>,
    /// Highlighted choice.
    pub selected: usize,
    /// Puzzle awaiting an answer.
    pub puzzle: Option<Puzzle>,
    /// Answer being typed.
    pub input: String,
    /// Most recent sound cue.
    pub last_cue: Option<AudioCue>,
    /// Set once the story has ended.
    pub finished: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl PlayApp {
    /// Create the app and start a new game.
    pub fn new(story: StoryConfig, typewriter: TypewriterConfig) -> Self {
        let mut app = Self {
            machine: StoryMachine::new(story),
            typewriter: Typewriter::new(typewriter),
            header: String::new(),
            blocks: Vec::new(),
            choices: Vec::new(),
            selected: 0,
            puzzle: None,
            input: String::new(),
            last_cue: None,
            finished: false,
            should_quit: false,
        };
        app.restart();
        app
    }

    /// The underlying state machine.
    pub fn machine(&self) -> &StoryMachine {
        &self.machine
    }

    /// Start over from the entrance hall.
    pub fn restart(&mut self) {
        debug!("restarting from the front-end");
        self.blocks.clear();
        self.choices.clear();
        self.selected = 0;
        self.puzzle = None;
        self.input.clear();
        self.last_cue = None;
        self.finished = false;
        self.machine.start_game();
        self.absorb();
    }

    /// Let wall-clock time pass.
    pub fn tick(&mut self, dt: Duration) {
        self.typewriter.tick(dt);
        self.machine.advance(dt);
        self.absorb();
    }

    /// Whether the newest block is still being revealed.
    pub fn is_revealing(&self) -> bool {
        !self.typewriter.is_done()
    }

    /// Characters of the newest block currently visible.
    pub fn visible_chars(&self) -> usize {
        self.typewriter.visible()
    }

    fn absorb(&mut self) {
        for event in self.machine.drain_events() {
            self.apply(event);
        }
    }

    /// Apply one narrative event to the screen state.
    pub fn apply(&mut self, event: NarrativeEvent) {
        match event {
            NarrativeEvent::LocationChanged(location) => {
                self.header = location.title().to_string();
                self.blocks.clear();
                self.puzzle = None;
                self.input.clear();
            }
            NarrativeEvent::TitleChanged(title) => self.header = title,
            NarrativeEvent::StoryText {
                lines,
                instant,
                credits,
            } => {
                self.typewriter.skip();
                if credits {
                    self.blocks.clear();
                }
                let block = StoryBlock { lines, credits };
                self.typewriter.start(block.char_count(), instant);
                self.blocks.push(block);
            }
            NarrativeEvent::ChoicesAvailable { items, .. } => {
                self.choices = items;
                self.selected = 0;
            }
            NarrativeEvent::PuzzleStarted(puzzle) => {
                self.puzzle = Some(puzzle);
                self.input.clear();
            }
            NarrativeEvent::AudioCue(cue) => self.last_cue = Some(cue),
            NarrativeEvent::GameEnded { .. } => {
                self.finished = true;
                self.header = Location::Credits.title().to_string();
            }
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        if self.is_revealing() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.typewriter.skip();
            }
            return;
        }

        if self.puzzle.is_some() {
            self.handle_answer_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.choices.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter if !self.choices.is_empty() => self.choose(self.selected),
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10)
                    && n >= 1
                {
                    self.choose(n as usize - 1);
                }
            }
            _ => {}
        }
    }

    fn handle_answer_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let answer = std::mem::take(&mut self.input);
                if answer.trim().is_empty() {
                    return;
                }
                if self.machine.submit_answer(&answer) {
                    self.puzzle = None;
                }
                self.absorb();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn choose(&mut self, index: usize) {
        if self.machine.select_choice(index) {
            self.absorb();
        }
    }

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let stats = self.machine.progress().stats();
        let mut line = format!(
            "puzzles {}  wrong {}  visited {}  items {}",
            stats.puzzles_solved, stats.wrong_answers, stats.locations_visited, stats.items_collected
        );
        let secs = self.machine.now().as_secs();
        line.push_str(&format!("  time {}:{:02}", secs / 60, secs % 60));
        if let Some(cue) = self.last_cue {
            line.push_str(&format!("  \u{266a} {cue}"));
        }
        line
    }

    /// Key hints for the current input mode.
    pub fn key_hint(&self) -> &'static str {
        if self.finished {
            "r:play again  q:quit"
        } else if self.is_revealing() {
            "Enter/Space:skip  Esc:quit"
        } else if self.puzzle.is_some() {
            "type answer  Enter:submit  Esc:quit"
        } else {
            "1-9:choose  \u{2191}\u{2193}+Enter:select  r:restart  q:quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> PlayApp {
        PlayApp::new(StoryConfig::default(), TypewriterConfig::disabled())
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut PlayApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn starts_in_the_entrance_hall() {
        let app = app();
        assert_eq!(app.header, "Ground Floor Hall");
        assert_eq!(app.choices.len(), 3);
        assert_eq!(app.blocks.len(), 1);
        assert!(!app.is_revealing());
    }

    #[test]
    fn digit_keys_pick_choices() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.machine().location(), Location::Library);
        assert_eq!(app.header, "Library");
        assert_eq!(app.choices.len(), 6);
    }

    #[test]
    fn arrows_and_enter_pick_choices() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected, 5);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.puzzle, Some(Puzzle::MATH));
    }

    #[test]
    fn answering_the_math_puzzle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('6'));

        type_line(&mut app, "12");
        assert!(app.puzzle.is_some());
        assert_eq!(app.machine().progress().stats().wrong_answers, 1);

        type_line(&mut app, "521");
        assert!(app.puzzle.is_none());
        assert_eq!(app.last_cue, Some(AudioCue::KeyFound));
        assert_eq!(app.choices, vec!["Room 314", "Room 521", "The cafeteria"]);
    }

    #[test]
    fn enter_skips_the_reveal() {
        let mut app = PlayApp::new(StoryConfig::default(), TypewriterConfig::default());
        assert!(app.is_revealing());
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.machine().location(), Location::EntranceHall);

        press(&mut app, KeyCode::Enter);
        assert!(!app.is_revealing());
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.machine().location(), Location::Library);
    }

    #[test]
    fn ticking_reveals_and_fires_reverts() {
        let mut app = PlayApp::new(StoryConfig::default(), TypewriterConfig::default());
        app.tick(Duration::from_secs(60));
        assert!(!app.is_revealing());

        press(&mut app, KeyCode::Char('2'));
        assert!(app.choices.is_empty());
        app.tick(Duration::from_secs(7));
        app.tick(Duration::from_secs(60));
        assert_eq!(app.choices.len(), 3);
    }

    #[test]
    fn credits_replace_the_story_and_finish() {
        let mut app = PlayApp::new(StoryConfig::instant(), TypewriterConfig::disabled());
        app.machine.change_location(Location::Room605);
        app.absorb();
        for _ in 0..4 {
            press(&mut app, KeyCode::Char('1'));
        }
        assert!(app.finished);
        assert_eq!(app.blocks.len(), 1);
        assert!(app.blocks[0].credits);
        assert_eq!(app.key_hint(), "r:play again  q:quit");

        press(&mut app, KeyCode::Char('r'));
        assert!(!app.finished);
        assert_eq!(app.machine().location(), Location::EntranceHall);
    }

    #[test]
    fn q_types_into_the_answer_instead_of_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn status_line_shows_stats() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert!(app.status_line().starts_with("puzzles 0  wrong 0  visited 1  items 0"));
    }

    #[test]
    fn status_line_shows_the_story_clock() {
        let mut app = app();
        assert!(app.status_line().contains("time 0:00"));
        app.tick(Duration::from_secs(75));
        assert!(app.status_line().contains("time 1:15"));
    }
}
