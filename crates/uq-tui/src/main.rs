//! `uq` binary: play the quest in the terminal or drive it from a script.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uq_story::StoryConfig;
use uq_tui::app::PlayApp;
use uq_tui::script::ScriptRunner;
use uq_tui::typewriter::TypewriterConfig;

#[derive(Parser)]
#[command(
    name = "uq",
    about = "See You at 6:05 - a short university quest",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Milliseconds between revealed characters
        #[arg(long, default_value = "50")]
        typewriter_ms: u64,

        /// Show story text at once
        #[arg(long)]
        no_typewriter: bool,

        /// Fire every delayed beat immediately
        #[arg(long)]
        instant: bool,
    },

    /// Run commands from a file (or stdin) and print the events
    Script {
        /// Script file (default: stdin)
        file: Option<PathBuf>,

        /// Print a stats line after every change
        #[arg(long)]
        stats: bool,

        /// Fire every delayed beat immediately
        #[arg(long)]
        instant: bool,
    },
}

fn story_config(instant: bool) -> StoryConfig {
    if instant {
        StoryConfig::instant()
    } else {
        StoryConfig::default()
    }
}

fn play(typewriter_ms: u64, no_typewriter: bool, instant: bool) -> Result<(), String> {
    let mut typewriter =
        TypewriterConfig::default().with_char_interval(Duration::from_millis(typewriter_ms));
    typewriter.enabled = !no_typewriter;
    let app = PlayApp::new(story_config(instant), typewriter);
    uq_tui::terminal::run(app)
}

fn script(file: Option<PathBuf>, stats: bool, instant: bool) -> Result<(), String> {
    let stdout = io::stdout();
    let mut runner = ScriptRunner::new(story_config(instant), stdout.lock());
    if stats {
        runner = runner.with_stats_feed();
    }
    match file {
        Some(path) => {
            let file = File::open(&path)
                .map_err(|e| format!("cannot open '{}': {e}", path.display()))?;
            runner.run(BufReader::new(file))
        }
        None => runner.run(io::stdin().lock()),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            typewriter_ms,
            no_typewriter,
            instant,
        } => play(typewriter_ms, no_typewriter, instant),
        Commands::Script {
            file,
            stats,
            instant,
        } => script(file, stats, instant),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
