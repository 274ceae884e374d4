//! Front-ends for the "See You at 6:05" quest.
//!
//! An interactive ratatui interface with a typewriter reveal, and a headless
//! script runner that prints every narrative event as a tagged line.

pub mod app;
pub mod script;
pub mod terminal;
pub mod typewriter;
