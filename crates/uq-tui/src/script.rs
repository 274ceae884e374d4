//! Headless line-oriented front-end.
//!
//! Reads one command per line and prints every narrative event as a tagged
//! line. Used for automation and end-to-end tests.
//!
//! ```text
//! start
//! choose 0        # zero-based index into the offered choices
//! answer 521
//! go room_605
//! wait 7.5
//! stats
//! save
//! ```

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use uq_story::{Location, NarrativeEvent, Stats, StoryConfig, StoryMachine};

/// Format one event as tagged output lines.
pub fn format_event(event: &NarrativeEvent) -> Vec<String> {
    match event {
        NarrativeEvent::LocationChanged(location) => vec![format!("[location] {location}")],
        NarrativeEvent::TitleChanged(title) => vec![format!("[title] {title}")],
        NarrativeEvent::StoryText { lines, .. } => lines
            .iter()
            .map(|l| format!("[story] {l}").trim_end().to_string())
            .collect(),
        NarrativeEvent::ChoicesAvailable { items, .. } if items.is_empty() => {
            vec!["[choices] (none)".to_string()]
        }
        NarrativeEvent::ChoicesAvailable { items, .. } => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("[choices] {i}) {item}"))
            .collect(),
        NarrativeEvent::PuzzleStarted(puzzle) => vec![
            format!("[puzzle] {}", puzzle.question),
            format!("[hint] {}", puzzle.hint),
        ],
        NarrativeEvent::AudioCue(cue) => vec![format!("[cue] {cue}")],
        NarrativeEvent::GameEnded { victory } => {
            let outcome = if *victory { "victory" } else { "defeat" };
            vec![format!("[end] {outcome}")]
        }
    }
}

fn format_stats(stats: &Stats) -> String {
    format!(
        "[stats] puzzles={} wrong={} visited={} items={}",
        stats.puzzles_solved, stats.wrong_answers, stats.locations_visited, stats.items_collected
    )
}

/// Runs script commands against a [`StoryMachine`].
pub struct ScriptRunner<W: Write> {
    machine: StoryMachine,
    out: W,
    feed: Option<Rc<RefCell<Vec<Stats>>>>,
}

impl<W: Write> ScriptRunner<W> {
    /// Create a runner writing to `out`.
    pub fn new(config: StoryConfig, out: W) -> Self {
        Self {
            machine: StoryMachine::new(config),
            out,
            feed: None,
        }
    }

    /// Also print a stats line after every counting change.
    pub fn with_stats_feed(mut self) -> Self {
        let feed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&feed);
        self.machine
            .progress_mut()
            .subscribe(move |stats: &Stats| sink.borrow_mut().push(*stats));
        self.feed = Some(feed);
        self
    }

    /// The machine being driven.
    pub fn machine(&self) -> &StoryMachine {
        &self.machine
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run every line of `input`.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), String> {
        for (i, line) in input.lines().enumerate() {
            let line = line.map_err(|e| format!("cannot read script: {e}"))?;
            self.run_line(&line)
                .map_err(|e| format!("line {}: {e}", i + 1))?;
        }
        self.out.flush().map_err(|e| format!("cannot write output: {e}"))
    }

    /// Run one command line. Blank lines and `#` comments do nothing.
    pub fn run_line(&mut self, line: &str) -> Result<(), String> {
        let line = match line.split_once('#') {
            Some((code, _)) => code.trim(),
            None => line.trim(),
        };
        if line.is_empty() {
            return Ok(());
        }
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        debug!(command, arg, "script command");

        match command {
            "start" => self.machine.start_game(),
            "choose" => {
                let index: usize = arg
                    .parse()
                    .map_err(|_| format!("choose expects a choice number, got '{arg}'"))?;
                if !self.machine.select_choice(index) {
                    self.write(&format!("[ignored] choose {index}"))?;
                }
            }
            "answer" => {
                if self.machine.active_puzzle().is_none() {
                    self.write("[ignored] answer")?;
                } else {
                    self.machine.submit_answer(arg);
                }
            }
            "go" => {
                let location: Location = arg.parse().map_err(|e| format!("{e}"))?;
                self.machine.change_location(location);
            }
            "wait" => {
                let secs: f64 = arg
                    .parse()
                    .map_err(|_| format!("wait expects seconds, got '{arg}'"))?;
                let dt = Duration::try_from_secs_f64(secs)
                    .map_err(|_| format!("wait expects non-negative seconds, got '{arg}'"))?;
                self.machine.advance(dt);
            }
            "stats" => {
                let stats = self.machine.progress().stats();
                self.write(&format_stats(&stats))?;
            }
            "save" => {
                let json = self.machine.save_progress().map_err(|e| e.to_string())?;
                self.write(&json)?;
            }
            other => return Err(format!("unknown command '{other}'")),
        }

        self.flush_events()
    }

    fn flush_events(&mut self) -> Result<(), String> {
        for event in self.machine.drain_events() {
            for line in format_event(&event) {
                self.write(&line)?;
            }
        }
        let changes = match &self.feed {
            Some(feed) => std::mem::take(&mut *feed.borrow_mut()),
            None => Vec::new(),
        };
        for stats in changes {
            self.write(&format_stats(&stats))?;
        }
        Ok(())
    }

    fn write(&mut self, line: &str) -> Result<(), String> {
        writeln!(self.out, "{line}").map_err(|e| format!("cannot write output: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALKTHROUGH: &str = "\
start
choose 0
choose 5
answer 521
choose 1
answer 9
choose 1
choose 0
choose 0
choose 0
choose 0
";

    fn run(config: StoryConfig, script: &str) -> String {
        let mut runner = ScriptRunner::new(config, Vec::new());
        runner.run(script.as_bytes()).unwrap();
        String::from_utf8(runner.into_inner()).unwrap()
    }

    #[test]
    fn walkthrough_ends_in_victory() {
        let out = run(StoryConfig::instant(), WALKTHROUGH);
        assert!(out.contains("[location] room_605"));
        assert!(out.contains("[title] 6:05"));
        assert!(out.contains("[cue] alarm"));
        assert!(out.trim_end().ends_with("[end] victory"));
    }

    #[test]
    fn finale_waits_for_the_clock() {
        let script = format!("{WALKTHROUGH}wait 2.9\n");
        let out = run(StoryConfig::default(), &script);
        assert!(out.contains("[cue] credits"));
        assert!(!out.contains("[end]"));

        let out = run(StoryConfig::default(), &format!("{WALKTHROUGH}wait 3\nwait 5\n"));
        assert!(out.contains("[story] SEE YOU AT 6:05"));
        assert!(out.contains("[end] victory"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let out = run(StoryConfig::default(), "# a comment\n\nstart  # begin\n");
        assert!(out.starts_with("[location] entrance_hall\n"));
    }

    #[test]
    fn puzzle_lines_include_the_hint() {
        let out = run(StoryConfig::default(), "start\nchoose 0\nchoose 5\n");
        assert!(out.contains("[puzzle] Solve: (10+1)×(5+2)+444=?"));
        assert!(out.contains("[hint] But something is wrong there."));
    }

    #[test]
    fn ignored_input_is_reported() {
        let out = run(StoryConfig::default(), "start\nchoose 9\nanswer 521\n");
        assert!(out.contains("[ignored] choose 9"));
        assert!(out.contains("[ignored] answer"));
    }

    #[test]
    fn hidden_choices_print_none() {
        let out = run(StoryConfig::default(), "start\nchoose 1\n");
        assert!(out.contains("[choices] (none)"));
    }

    #[test]
    fn unknown_command_fails_with_line_number() {
        let mut runner = ScriptRunner::new(StoryConfig::default(), Vec::new());
        let err = runner.run("start\ndance\n".as_bytes()).unwrap_err();
        assert_eq!(err, "line 2: unknown command 'dance'");
    }

    #[test]
    fn bad_arguments_fail() {
        let mut runner = ScriptRunner::new(StoryConfig::default(), Vec::new());
        assert!(runner.run_line("choose two").is_err());
        assert!(runner.run_line("wait -1").is_err());
        assert!(runner.run_line("go basement").unwrap_err().contains("basement"));
    }

    #[test]
    fn stats_feed_prints_changes() {
        let mut runner = ScriptRunner::new(StoryConfig::default(), Vec::new()).with_stats_feed();
        runner.run("start\nchoose 0\n".as_bytes()).unwrap();
        let out = String::from_utf8(runner.into_inner()).unwrap();
        assert_eq!(
            out.lines().filter(|l| l.starts_with("[stats]")).collect::<Vec<_>>(),
            vec!["[stats] puzzles=0 wrong=0 visited=1 items=0"]
        );
    }

    #[test]
    fn save_prints_json() {
        let out = run(StoryConfig::default(), "start\nchoose 0\nchoose 5\nsave\n");
        assert!(out.contains("\"library_key\""));
        assert!(out.contains("\"library\""));
    }

    #[test]
    fn enormous_waits_are_accepted() {
        let mut runner = ScriptRunner::new(StoryConfig::default(), Vec::new());
        runner.run_line("start").unwrap();
        runner.run_line("wait 1e19").unwrap();
        runner.run_line("wait 1e19").unwrap();
        assert_eq!(runner.machine().now(), Duration::MAX);
        runner.run_line("choose 0").unwrap();
        assert_eq!(runner.machine().location(), Location::Library);
    }
}
