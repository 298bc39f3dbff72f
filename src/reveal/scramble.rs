//! Iteration-based text scramble.
//!
//! Unlike [`RevealEngine`](super::RevealEngine) there is no per-character
//! progress here: every interval re-rolls every visible character, and after
//! a fixed number of intervals the true text snaps in. Used when hydrating
//! precomputed art, where a short burst of noise is enough.

use std::time::Duration;

use rand::Rng;

use crate::ascii::SCRAMBLE_CHARSET;

/// Timing of a [`ScrambleText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrambleConfig {
    /// Time between re-rolls.
    pub interval: Duration,
    /// Re-rolls before the true text is shown.
    pub max_iterations: u32,
    /// Show nothing until the first re-roll instead of the true text.
    pub start_scrambled: bool,
}

impl ScrambleConfig {
    /// Faster, shorter burst used when precomputed art hydrates.
    pub const HYDRATION: ScrambleConfig = ScrambleConfig {
        interval: Duration::from_millis(16),
        max_iterations: 14,
        start_scrambled: true,
    };
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(24),
            max_iterations: 18,
            start_scrambled: false,
        }
    }
}

fn is_preserved(c: char) -> bool {
    matches!(c, '\n' | ' ' | '\t')
}

/// Scrambles a block of text for a fixed number of intervals.
#[derive(Debug)]
pub struct ScrambleText<R> {
    text: String,
    config: ScrambleConfig,
    charset: &'static [char],
    rng: R,
    display: String,
    iteration: u32,
    pending: Duration,
    complete: bool,
}

impl<R: Rng> ScrambleText<R> {
    pub fn new(text: impl Into<String>, config: ScrambleConfig, rng: R) -> Self {
        let text = text.into();
        let display = if config.start_scrambled {
            String::new()
        } else {
            text.clone()
        };
        Self {
            text,
            config,
            charset: SCRAMBLE_CHARSET,
            rng,
            display,
            iteration: 0,
            pending: Duration::ZERO,
            complete: false,
        }
    }

    /// Use a different noise alphabet. An empty alphabet is ignored.
    pub fn with_charset(mut self, charset: &'static [char]) -> Self {
        if !charset.is_empty() {
            self.charset = charset;
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// What should be on screen right now.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Advance by `delta`, running every interval that elapsed.
    ///
    /// Returns the new display when at least one interval ran, `None`
    /// otherwise or once complete.
    pub fn tick(&mut self, delta: Duration) -> Option<&str> {
        if self.complete {
            return None;
        }
        self.pending += delta;

        let mut stepped = false;
        while !self.complete && self.pending >= self.config.interval {
            self.pending -= self.config.interval;
            self.step();
            stepped = true;
            if self.config.interval.is_zero() {
                break;
            }
        }

        if stepped {
            Some(&self.display)
        } else {
            None
        }
    }

    /// Skip the remaining intervals.
    pub fn finish(&mut self) {
        if !self.complete {
            self.display = self.text.clone();
            self.complete = true;
        }
    }

    fn step(&mut self) {
        self.iteration += 1;
        if self.iteration >= self.config.max_iterations {
            log::debug!("Scramble finished after {} iterations", self.iteration);
            self.finish();
            return;
        }

        let pool = self.charset.len();
        self.display = self
            .text
            .chars()
            .map(|c| {
                if is_preserved(c) {
                    c
                } else {
                    self.charset[self.rng.random_range(0..pool)]
                }
            })
            .collect();
    }
}
