//! The story state machine.
//!
//! [`StoryMachine`] owns the current location, the room 605 stage, the active
//! puzzle and the [`Progress`] record. Player input (`select_choice`,
//! `submit_answer`, `change_location`) and elapsed time (`advance`) are the
//! only ways in; [`NarrativeEvent`]s drained with `drain_events` are the only
//! way out.
//!
//! Every call runs to completion before returning and takes `&mut self`, so
//! there is never more than one transition in flight. Delayed beats (choice
//! reverts and the finale) are timers on a virtual clock. Each timer carries a
//! snapshot of epoch, location and stage taken when it was scheduled and is
//! dropped if the snapshot no longer matches when it fires.

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::config::StoryConfig;
use crate::content::{
    self, ChoiceEntry, ChoiceOutcome, FLAG_WOKE_UP, LIBRARY_AFTER_PUZZLE, ROOM_521_CLUE,
    ROOM_521_KEY, Scene, WRONG_ANSWER,
};
use crate::error::StoryResult;
use crate::event::{AudioCue, EventLog, NarrativeEvent};
use crate::location::{Location, Room605Stage};
use crate::progress::Progress;
use crate::puzzle::Puzzle;
use crate::scheduler::{Scheduler, Timer, TimerId};

const KEY_FOUND: &[&str] = &["Correct! The key to room 521 is now yours."];

/// Which choice list is currently on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Menu {
    /// Nothing selectable.
    Hidden,
    /// The choices of a scene.
    Scene(&'static Scene),
    /// The single action of a room 605 stage.
    Stage(Room605Stage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Guard {
    epoch: u64,
    location: Location,
    stage: Room605Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Show a scene again after a rejected choice.
    Revert(&'static Scene),
    /// Show the credits.
    FinaleText,
    /// End the game.
    FinaleEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    guard: Guard,
    deferred: Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePuzzle {
    puzzle: Puzzle,
    location: Location,
}

/// Drives the quest from player input to narrative events.
#[derive(Debug)]
pub struct StoryMachine {
    config: StoryConfig,
    location: Location,
    stage: Room605Stage,
    epoch: u64,
    menu: Menu,
    active_puzzle: Option<ActivePuzzle>,
    game_over: bool,
    finale_running: bool,
    progress: Progress,
    events: EventLog,
    scheduler: Scheduler<Pending>,
    revert_timer: Option<TimerId>,
}

impl Default for StoryMachine {
    fn default() -> Self {
        Self::new(StoryConfig::default())
    }
}

impl StoryMachine {
    /// Create a machine. Nothing happens until [`StoryMachine::start_game`].
    pub fn new(config: StoryConfig) -> Self {
        Self {
            config,
            location: Location::EntranceHall,
            stage: Room605Stage::default(),
            epoch: 0,
            menu: Menu::Hidden,
            active_puzzle: None,
            game_over: false,
            finale_running: false,
            progress: Progress::new(),
            events: EventLog::new(),
            scheduler: Scheduler::new(),
            revert_timer: None,
        }
    }

    /// Where the player is.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Room 605 sub-stage. Only meaningful while in room 605.
    pub fn stage(&self) -> Room605Stage {
        self.stage
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// The puzzle awaiting an answer, if any.
    pub fn active_puzzle(&self) -> Option<&Puzzle> {
        self.active_puzzle.as_ref().map(|a| &a.puzzle)
    }

    /// Labels of the choices that can be selected right now.
    pub fn offered_choices(&self) -> Vec<&'static str> {
        match self.menu {
            Menu::Hidden => Vec::new(),
            Menu::Scene(scene) => scene.labels(),
            Menu::Stage(stage) => vec![content::stage_beat(stage).action],
        }
    }

    /// The player's progress.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Mutable access to the progress record, e.g. to subscribe observers.
    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<NarrativeEvent> {
        self.events.drain()
    }

    /// Virtual time elapsed since the machine was created.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of delayed beats waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Encode the progress record as JSON.
    pub fn save_progress(&self) -> StoryResult<String> {
        self.progress.to_json()
    }

    /// Reset everything and enter the entrance hall. Always safe to call.
    ///
    /// The record stays fully reset: entering the hall here does not count
    /// as a visit.
    pub fn start_game(&mut self) {
        info!("starting new game");
        self.scheduler.cancel_all();
        self.revert_timer = None;
        self.progress.reset();
        self.stage = Room605Stage::default();
        self.game_over = false;
        self.finale_running = false;
        self.active_puzzle = None;
        self.menu = Menu::Hidden;
        self.arrive(Location::EntranceHall);
        self.run_due();
    }

    /// Move to a location and show its entry content. Ignored while the
    /// finale runs and once the game is over.
    pub fn change_location(&mut self, location: Location) {
        if self.locked() {
            trace!(%location, "story locked, location change ignored");
            return;
        }
        self.enter(location);
        self.run_due();
    }

    /// Pick the choice at `index` of the offered list. Returns `false` when
    /// the input was ignored: finale running, game over, nothing offered, or
    /// index out of range.
    pub fn select_choice(&mut self, index: usize) -> bool {
        if self.locked() {
            trace!(index, "story locked, choice ignored");
            return false;
        }
        let accepted = match self.menu {
            Menu::Hidden => false,
            Menu::Scene(scene) => match scene.choices.get(index) {
                Some(entry) => {
                    self.pick(scene, entry);
                    true
                }
                None => false,
            },
            Menu::Stage(stage) if index == 0 => {
                self.advance_stage(stage);
                true
            }
            Menu::Stage(_) => false,
        };
        if !accepted {
            trace!(index, location = %self.location, "choice ignored");
        }
        self.run_due();
        accepted
    }

    /// Answer the active puzzle. Returns `true` on a correct answer. Without
    /// an active puzzle (or once the finale started) nothing happens and
    /// `false` is returned.
    pub fn submit_answer(&mut self, text: &str) -> bool {
        if self.locked() {
            trace!("story locked, answer ignored");
            return false;
        }
        let Some(active) = self.active_puzzle else {
            trace!("no active puzzle, answer ignored");
            return false;
        };

        let correct = active.puzzle.accepts(text) && active.location == self.location;
        let solved = match self.location {
            Location::Library if correct => {
                self.solve_library_puzzle(active.puzzle);
                true
            }
            Location::Room521 if correct => {
                self.solve_room_521_puzzle(active.puzzle);
                true
            }
            _ => {
                debug!(kind = %active.puzzle.kind, "wrong answer");
                self.progress.increment_wrong_answers();
                self.emit(NarrativeEvent::story(WRONG_ANSWER));
                false
            }
        };
        self.run_due();
        solved
    }

    /// Move the virtual clock forward and fire whatever came due.
    pub fn advance(&mut self, dt: Duration) {
        self.scheduler.advance(dt);
        self.run_due();
    }

    /// No player input is taken once the finale has begun.
    fn locked(&self) -> bool {
        self.game_over || self.finale_running
    }

    fn emit(&mut self, event: NarrativeEvent) {
        self.events.push(event);
    }

    fn guard(&self) -> Guard {
        Guard {
            epoch: self.epoch,
            location: self.location,
            stage: self.stage,
        }
    }

    /// Switch location without any entry content. Invalidates every pending
    /// timer.
    fn set_location(&mut self, location: Location) {
        self.scheduler.cancel_all();
        self.revert_timer = None;
        self.epoch += 1;
        self.location = location;
    }

    fn enter(&mut self, location: Location) {
        self.progress.visit_location(location);
        self.arrive(location);
    }

    /// Show a location's entry content without counting a visit.
    fn arrive(&mut self, location: Location) {
        debug!(%location, "entering location");
        self.set_location(location);
        self.active_puzzle = None;
        self.menu = Menu::Hidden;
        self.emit(NarrativeEvent::LocationChanged(location));

        if let Some(scene) = content::entry_scene(location) {
            self.show_scene(scene);
        }
        if location == Location::Room605 {
            self.offer_stage(self.stage);
        }
    }

    fn show_scene(&mut self, scene: &'static Scene) {
        self.emit(NarrativeEvent::story(scene.description));
        if !scene.choices.is_empty() {
            self.offer_scene(scene);
        }
        if let Some(kind) = scene.puzzle {
            self.start_puzzle(Puzzle::of_kind(kind));
        }
    }

    fn offer_scene(&mut self, scene: &'static Scene) {
        self.menu = Menu::Scene(scene);
        self.emit(NarrativeEvent::choices(&scene.labels()));
    }

    fn offer_stage(&mut self, stage: Room605Stage) {
        self.menu = Menu::Stage(stage);
        self.emit(NarrativeEvent::choices(&[content::stage_beat(stage).action]));
    }

    fn hide_choices(&mut self) {
        self.menu = Menu::Hidden;
        self.emit(NarrativeEvent::no_choices());
    }

    fn start_puzzle(&mut self, puzzle: Puzzle) {
        debug!(kind = %puzzle.kind, location = %self.location, "puzzle started");
        self.active_puzzle = Some(ActivePuzzle {
            puzzle,
            location: self.location,
        });
        self.emit(NarrativeEvent::PuzzleStarted(puzzle));
    }

    fn pick(&mut self, scene: &'static Scene, entry: &'static ChoiceEntry) {
        debug!(choice = entry.text, location = %self.location, "choice picked");
        match entry.outcome {
            ChoiceOutcome::Transition { target, cue } => {
                self.emit(NarrativeEvent::story(entry.response));
                if let Some(cue) = cue {
                    self.emit(NarrativeEvent::AudioCue(cue));
                }
                self.enter(target);
            }
            ChoiceOutcome::Unlock { item, puzzle } => {
                self.progress.add_item(item);
                self.emit(NarrativeEvent::story(entry.response));
                self.start_puzzle(Puzzle::of_kind(puzzle));
            }
            ChoiceOutcome::Reject => self.reject(scene, entry),
        }
    }

    fn reject(&mut self, scene: &'static Scene, entry: &'static ChoiceEntry) {
        self.emit(NarrativeEvent::story(entry.response));
        match self.config.revert_delay(self.location) {
            Some(delay) => {
                self.hide_choices();
                if let Some(old) = self.revert_timer.take() {
                    self.scheduler.cancel(old);
                }
                let pending = Pending {
                    guard: self.guard(),
                    deferred: Deferred::Revert(scene),
                };
                self.revert_timer = Some(self.scheduler.schedule(delay, pending));
                debug!(?delay, location = %self.location, "revert scheduled");
            }
            None => self.offer_scene(scene),
        }
    }

    fn solve_library_puzzle(&mut self, puzzle: Puzzle) {
        info!("math puzzle solved");
        self.active_puzzle = None;
        self.progress.solve_puzzle(puzzle.kind.id());
        self.progress.add_item(ROOM_521_KEY);
        self.emit(NarrativeEvent::AudioCue(AudioCue::KeyFound));

        let lines: Vec<&str> = KEY_FOUND
            .iter()
            .chain(LIBRARY_AFTER_PUZZLE.description)
            .copied()
            .collect();
        self.emit(NarrativeEvent::story(&lines));
        self.offer_scene(&LIBRARY_AFTER_PUZZLE);
        self.set_location(Location::LibraryAfterPuzzle);
    }

    fn solve_room_521_puzzle(&mut self, puzzle: Puzzle) {
        info!("sequence puzzle solved");
        self.active_puzzle = None;
        self.progress.solve_puzzle(puzzle.kind.id());
        self.show_scene(&ROOM_521_CLUE);
    }

    fn advance_stage(&mut self, stage: Room605Stage) {
        let beat = content::stage_beat(stage);
        let Some(next) = stage.next() else {
            self.begin_finale();
            return;
        };

        debug!(?stage, ?next, "room 605 stage advanced");
        self.stage = next;
        self.offer_stage(next);
        if let Some(cue) = beat.cue {
            self.emit(NarrativeEvent::AudioCue(cue));
        }
        if let Some(title) = beat.title {
            self.emit(NarrativeEvent::TitleChanged(title.to_string()));
        }
        self.emit(NarrativeEvent::story(beat.response));
        if stage == Room605Stage::WakeUpReady {
            self.progress.set_flag(FLAG_WOKE_UP, true);
        }
    }

    fn begin_finale(&mut self) {
        info!("finale started");
        self.finale_running = true;
        self.hide_choices();
        self.emit(NarrativeEvent::AudioCue(AudioCue::Credits));
        let pending = Pending {
            guard: self.guard(),
            deferred: Deferred::FinaleText,
        };
        self.scheduler.schedule(self.config.finale_text_delay, pending);
    }

    fn run_due(&mut self) {
        while let Some(timer) = self.scheduler.pop_due() {
            if self.revert_timer == Some(timer.id) {
                self.revert_timer = None;
            }
            if self.game_over || timer.action.guard != self.guard() {
                debug!(deferred = ?timer.action.deferred, "stale timer discarded");
                continue;
            }
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: Timer<Pending>) {
        debug!(deferred = ?timer.action.deferred, due = ?timer.due, "timer fired");
        match timer.action.deferred {
            Deferred::Revert(scene) => self.show_scene(scene),
            Deferred::FinaleText => {
                let beat = content::stage_beat(Room605Stage::Final);
                self.emit(NarrativeEvent::credits(beat.response));
                let pending = Pending {
                    guard: timer.action.guard,
                    deferred: Deferred::FinaleEnd,
                };
                self.scheduler.schedule_at(
                    timer.due.saturating_add(self.config.finale_end_delay),
                    pending,
                );
            }
            Deferred::FinaleEnd => {
                info!("game over, victory");
                self.game_over = true;
                self.finale_running = false;
                self.location = Location::Credits;
                self.emit(NarrativeEvent::GameEnded { victory: true });
            }
        }
    }
}
