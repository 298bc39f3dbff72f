//! Reveal animation engine.
//!
//! Drives a glyph grid from noise to its true glyphs over a fixed duration.
//! The host calls [`RevealEngine::tick`] from whatever scheduler it has; every
//! call while running returns a freshly rendered frame.

use std::sync::Arc;

use rand::Rng;

use super::easing::CubicBezier;
use crate::ascii::SCRAMBLE_CHARSET;
use crate::grid::GlyphGrid;

/// Characters at or past this progress always show their true glyph.
pub const HARD_FLOOR: f32 = 0.99;

const TAIL_KNEE: f32 = 0.8;
const TAIL_GAIN: f32 = 4.0;
const JITTER_SPREAD: f32 = 0.2;
const JITTER_FREQUENCY: f32 = 0.1;
const MAX_STAGGER: f32 = 0.99;

/// Timing parameters of a reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Total duration in seconds.
    pub duration_secs: f32,
    /// Fraction of the duration spent on inter-row delay.
    pub stagger_factor: f32,
    /// The reveal completes once progress reaches `1 - epsilon`.
    pub epsilon: f32,
    /// Curve applied to each row's progress.
    pub easing: CubicBezier,
    /// Bias noise glyphs towards the front of the scramble alphabet as
    /// characters near their reveal.
    pub narrow_scramble_pool: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_secs: 4.0,
            stagger_factor: 0.4,
            epsilon: 0.01,
            easing: CubicBezier::REVEAL,
            narrow_scramble_pool: true,
        }
    }
}

/// Lifecycle of a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// No grid yet.
    Idle,
    Running,
    /// Every glyph shows its target.
    Complete,
    /// Torn down before completion; no further frames are emitted.
    Cancelled,
}

fn clamp_stagger(stagger_factor: f32) -> f32 {
    if stagger_factor.is_nan() {
        0.0
    } else {
        stagger_factor.clamp(0.0, MAX_STAGGER)
    }
}

/// Start offset of row `row` out of `rows`, as a fraction of the clock.
pub fn stagger_offset(row: usize, rows: usize, stagger_factor: f32) -> f32 {
    let span = rows.saturating_sub(1).max(1) as f32;
    row as f32 / span * clamp_stagger(stagger_factor)
}

/// Linear progress of one row at global `progress`, before easing.
///
/// Earlier rows are never behind later ones.
pub fn row_progress(progress: f32, row: usize, rows: usize, stagger_factor: f32) -> f32 {
    let sf = clamp_stagger(stagger_factor);
    ((progress - stagger_offset(row, rows, sf)) / (1.0 - sf)).clamp(0.0, 1.0)
}

/// Positional jitter in `[0, 1]`; the same index always yields the same value.
pub fn char_jitter(index: usize) -> f32 {
    ((index as f32 * JITTER_FREQUENCY).sin() + 1.0) / 2.0
}

/// Progress of character `index` given its row's eased progress.
pub fn char_progress(row_progress: f32, index: usize) -> f32 {
    row_progress * (1.0 + JITTER_SPREAD * char_jitter(index))
}

/// Probability-like threshold a random draw is compared against.
///
/// Identity below 0.8, then steepened so the tail converges quickly.
pub fn reveal_threshold(char_progress: f32) -> f32 {
    if char_progress < TAIL_KNEE {
        char_progress
    } else {
        char_progress + (char_progress - TAIL_KNEE) * TAIL_GAIN
    }
}

/// Whether a character shows its true glyph for a uniform `draw` in `[0, 1)`.
pub fn is_revealed(char_progress: f32, draw: f32) -> bool {
    char_progress >= HARD_FLOOR || draw < reveal_threshold(char_progress)
}

/// Index into a scramble pool of `pool` glyphs.
///
/// With `narrow` set the candidate range shrinks as `char_progress` grows.
pub fn scramble_index(draw: f32, pool: usize, char_progress: f32, narrow: bool) -> usize {
    if pool == 0 {
        return 0;
    }
    let scale = if narrow {
        (1.0 - char_progress).max(0.0)
    } else {
        1.0
    };
    let index = (draw * pool as f32 * scale).floor();
    if index.is_finite() && index > 0.0 {
        index as usize % pool
    } else {
        0
    }
}

/// Per-instance reveal animation.
///
/// Randomness comes from the injected `rng`, so a seeded generator gives a
/// reproducible sequence of frames. The source grid is shared, never copied
/// into or modified; frames are derived strings.
#[derive(Debug)]
pub struct RevealEngine<R> {
    config: RevealConfig,
    rng: R,
    scramble: &'static [char],
    phase: RevealPhase,
    progress: f32,
    target: Option<Arc<GlyphGrid>>,
    glyphs: Vec<Vec<char>>,
    frame: Vec<String>,
}

impl<R: Rng> RevealEngine<R> {
    pub fn new(config: RevealConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            scramble: SCRAMBLE_CHARSET,
            phase: RevealPhase::Idle,
            progress: 0.0,
            target: None,
            glyphs: Vec::new(),
            frame: Vec::new(),
        }
    }

    /// Use a different noise alphabet. An empty alphabet is ignored.
    pub fn with_scramble_charset(mut self, charset: &'static [char]) -> Self {
        if !charset.is_empty() {
            self.scramble = charset;
        }
        self
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Global clock in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.phase == RevealPhase::Running
    }

    pub fn target(&self) -> Option<&Arc<GlyphGrid>> {
        self.target.as_ref()
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    /// Begin revealing `grid` from progress 0, replacing any current run.
    ///
    /// Returns the first frame. A non-positive duration completes at once.
    pub fn start(&mut self, grid: Arc<GlyphGrid>) -> &[String] {
        log::debug!(
            "Starting reveal of {}x{} grid over {:.2}s",
            grid.width(),
            grid.height(),
            self.config.duration_secs
        );
        self.glyphs = grid.rows().iter().map(|row| row.chars().collect()).collect();
        self.target = Some(grid);
        self.progress = 0.0;
        self.phase = RevealPhase::Running;

        if self.config.duration_secs > 0.0 && self.config.duration_secs.is_finite() {
            self.advance_to(0.0);
        } else {
            self.complete();
        }
        &self.frame
    }

    /// Advance the clock by `delta_secs` and render.
    ///
    /// Returns `None` unless the engine is running. Negative or non-finite
    /// deltas do not move the clock. The tick that completes the reveal
    /// returns the target grid; later ticks return `None`.
    pub fn tick(&mut self, delta_secs: f32) -> Option<&[String]> {
        if self.phase != RevealPhase::Running {
            return None;
        }
        let step = if delta_secs.is_finite() && delta_secs > 0.0 {
            delta_secs / self.config.duration_secs
        } else {
            0.0
        };
        self.advance_to(self.progress + step)
    }

    /// Drive the clock directly. Progress never moves backwards.
    pub fn set_progress(&mut self, progress: f32) -> Option<&[String]> {
        if self.phase != RevealPhase::Running {
            return None;
        }
        let progress = if progress.is_nan() {
            self.progress
        } else {
            progress
        };
        self.advance_to(progress)
    }

    /// Jump straight to the end state.
    pub fn finish(&mut self) -> Option<&[String]> {
        if self.phase != RevealPhase::Running {
            return None;
        }
        self.complete();
        Some(&self.frame)
    }

    /// Stop without completing. The last frame is kept for display.
    pub fn cancel(&mut self) {
        if matches!(self.phase, RevealPhase::Idle | RevealPhase::Running) {
            log::debug!("Reveal cancelled at progress {:.3}", self.progress);
            self.phase = RevealPhase::Cancelled;
        }
    }

    /// Eased progress of `row` at the current clock.
    pub fn row_progress(&self, row: usize) -> f32 {
        let rows = self.glyphs.len();
        self.config
            .easing
            .ease(row_progress(self.progress, row, rows, self.config.stagger_factor))
    }

    fn advance_to(&mut self, progress: f32) -> Option<&[String]> {
        self.progress = progress.clamp(self.progress, 1.0);
        let epsilon = self.config.epsilon.clamp(0.0, 0.5);
        if self.progress + f32::EPSILON >= 1.0 - epsilon {
            self.complete();
        } else {
            self.render();
        }
        Some(&self.frame)
    }

    fn complete(&mut self) {
        self.progress = 1.0;
        self.phase = RevealPhase::Complete;
        self.frame = self
            .target
            .as_ref()
            .map(|grid| grid.rows().to_vec())
            .unwrap_or_default();
        log::debug!("Reveal complete");
    }

    fn render(&mut self) {
        let rows = self.glyphs.len();
        let pool = self.scramble.len();
        let mut frame = Vec::with_capacity(rows);

        for (r, row) in self.glyphs.iter().enumerate() {
            let eased = self
                .config
                .easing
                .ease(row_progress(self.progress, r, rows, self.config.stagger_factor));
            let mut line = String::with_capacity(row.len());
            for (i, &glyph) in row.iter().enumerate() {
                let cp = char_progress(eased, i);
                if is_revealed(cp, self.rng.random::<f32>()) {
                    line.push(glyph);
                } else {
                    let draw = self.rng.random::<f32>();
                    let index = scramble_index(draw, pool, cp, self.config.narrow_scramble_pool);
                    line.push(self.scramble[index]);
                }
            }
            frame.push(line);
        }

        self.frame = frame;
    }
}
