//! Character-by-character text reveal.

use std::time::Duration;

/// Settings for the typewriter reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Time between two revealed characters.
    pub char_interval: Duration,
    /// When `false` every block is shown at once.
    pub enabled: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            char_interval: Duration::from_millis(50),
            enabled: true,
        }
    }
}

impl TypewriterConfig {
    /// A config that shows text immediately.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the per-character interval.
    pub fn with_char_interval(mut self, interval: Duration) -> Self {
        self.char_interval = interval;
        self
    }
}

/// Reveal progress through one block of text.
#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    total: usize,
    shown: usize,
    carry: Duration,
}

impl Typewriter {
    /// Create an idle typewriter.
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            total: 0,
            shown: 0,
            carry: Duration::ZERO,
        }
    }

    /// Begin revealing a block of `total` characters.
    pub fn start(&mut self, total: usize, instant: bool) {
        self.total = total;
        self.carry = Duration::ZERO;
        self.shown = if instant || !self.config.enabled || self.config.char_interval.is_zero() {
            total
        } else {
            0
        };
    }

    /// Let time pass.
    pub fn tick(&mut self, dt: Duration) {
        if self.is_done() {
            return;
        }
        self.carry += dt;
        let interval = self.config.char_interval;
        while self.carry >= interval && self.shown < self.total {
            self.carry -= interval;
            self.shown += 1;
        }
    }

    /// Show the whole block now.
    pub fn skip(&mut self) {
        self.shown = self.total;
        self.carry = Duration::ZERO;
    }

    /// Whether the block is fully visible.
    pub fn is_done(&self) -> bool {
        self.shown >= self.total
    }

    /// Number of characters currently visible.
    pub fn visible(&self) -> usize {
        self.shown
    }
}
