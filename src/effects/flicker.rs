//! Open-ended per-row flicker applied after a reveal completes.
//!
//! Each row rolls its style, delay and intensity once. Sampling is a pure
//! function of elapsed time, so the host can render at any frame rate.

use rand::Rng;

use crate::grid::GlyphGrid;
use crate::reveal::{interpolate_keyframes, CubicBezier, Easing};

/// Chance that a row uses the inverse overlay instead of jitter.
pub const INVERSE_PROBABILITY: f32 = 0.02;

/// Glyph repeated across a row by the inverse overlay.
pub const STATIC_GLYPH: char = '/';

const MIN_DELAY_SECS: f32 = 5.0;
const DELAY_SPREAD_SECS: f32 = 0.8;
const MIN_INTENSITY: f32 = 1.0;
const INTENSITY_SPREAD: f32 = 2.0;

const JITTER_CYCLE_PER_INTENSITY: f32 = 0.12;
const JITTER_OPACITY: [f32; 3] = [1.0, 0.9, 1.0];

const INVERSE_TEXT_CYCLE: f32 = 0.15;
const INVERSE_TEXT_OPACITY: [f32; 5] = [1.0, 0.0, 1.0, 0.0, 1.0];
const INVERSE_OVERLAY_CYCLE: f32 = 0.1;
const INVERSE_OVERLAY_LAG: f32 = 0.05;
const INVERSE_OVERLAY_OPACITY: [f32; 3] = [0.0, 1.0, 0.0];

/// How a row flickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickerStyle {
    /// Small opacity dip and horizontal shake.
    Jitter,
    /// Cross-fade between the row and a row of [`STATIC_GLYPH`].
    Inverse,
}

/// Visual state of one layer at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerState {
    pub opacity: f32,
    /// Horizontal offset in pixels.
    pub offset_px: f32,
}

/// Everything needed to draw one row at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerFrame {
    /// The row's own text.
    pub text: LayerState,
    /// The static overlay, present only for [`FlickerStyle::Inverse`].
    pub overlay: Option<LayerState>,
}

/// Flicker parameters of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlickerRow {
    pub style: FlickerStyle,
    /// Seconds before the row starts flickering.
    pub delay_secs: f32,
    /// Scales the shake distance and the jitter cycle length.
    pub intensity: f32,
}

fn cycle_position(elapsed: f32, cycle: f32) -> (u64, f32) {
    if cycle <= 0.0 || !cycle.is_finite() {
        return (0, 0.0);
    }
    let cycles = elapsed / cycle;
    (cycles.floor() as u64, cycles.fract())
}

impl FlickerRow {
    pub fn new(style: FlickerStyle, delay_secs: f32, intensity: f32) -> Self {
        Self {
            style,
            delay_secs,
            intensity,
        }
    }

    /// Roll a row's parameters.
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let style = if rng.random::<f32>() < INVERSE_PROBABILITY {
            FlickerStyle::Inverse
        } else {
            FlickerStyle::Jitter
        };
        let delay_secs = rng.random::<f32>() * DELAY_SPREAD_SECS + MIN_DELAY_SECS;
        let intensity = rng.random::<f32>() * INTENSITY_SPREAD + MIN_INTENSITY;
        Self::new(style, delay_secs, intensity)
    }

    /// Length of one jitter cycle in seconds.
    pub fn jitter_cycle_secs(&self) -> f32 {
        JITTER_CYCLE_PER_INTENSITY * self.intensity
    }

    /// State of the row `elapsed_secs` after mount.
    ///
    /// Before its delay a layer holds its first keyframe.
    pub fn sample(&self, elapsed_secs: f32) -> FlickerFrame {
        match self.style {
            FlickerStyle::Jitter => FlickerFrame {
                text: self.sample_jitter(elapsed_secs),
                overlay: None,
            },
            FlickerStyle::Inverse => FlickerFrame {
                text: self.sample_inverse_text(elapsed_secs),
                overlay: Some(self.sample_inverse_overlay(elapsed_secs)),
            },
        }
    }

    fn sample_jitter(&self, elapsed: f32) -> LayerState {
        let i = self.intensity;
        let offsets = [-0.5 * i, 0.0, 0.5 * i, 0.0];
        let local = elapsed - self.delay_secs;
        let t = if local <= 0.0 {
            0.0
        } else {
            // Mirrored repeat: odd cycles play backwards
            let (cycle, phase) = cycle_position(local, self.jitter_cycle_secs());
            if cycle % 2 == 1 {
                1.0 - phase
            } else {
                phase
            }
        };
        let easing = Easing::Bezier(CubicBezier::FLICKER);
        LayerState {
            opacity: interpolate_keyframes(&JITTER_OPACITY, t, easing),
            offset_px: interpolate_keyframes(&offsets, t, easing),
        }
    }

    fn sample_inverse_text(&self, elapsed: f32) -> LayerState {
        let local = elapsed - self.delay_secs;
        let t = if local <= 0.0 {
            0.0
        } else {
            cycle_position(local, INVERSE_TEXT_CYCLE).1
        };
        LayerState {
            opacity: interpolate_keyframes(&INVERSE_TEXT_OPACITY, t, Easing::Steps(2)),
            offset_px: 0.0,
        }
    }

    fn sample_inverse_overlay(&self, elapsed: f32) -> LayerState {
        let i = self.intensity;
        let offsets = [-i, 0.0, i];
        let local = elapsed - self.delay_secs - INVERSE_OVERLAY_LAG;
        let t = if local <= 0.0 {
            0.0
        } else {
            cycle_position(local, INVERSE_OVERLAY_CYCLE).1
        };
        LayerState {
            opacity: interpolate_keyframes(&INVERSE_OVERLAY_OPACITY, t, Easing::Linear),
            offset_px: interpolate_keyframes(&offsets, t, Easing::Linear),
        }
    }
}

/// The overlay text for a row: [`STATIC_GLYPH`] repeated to the row's length.
pub fn static_row(row: &str) -> String {
    std::iter::repeat(STATIC_GLYPH)
        .take(row.chars().count())
        .collect()
}

/// Flicker state for a whole grid.
///
/// Runs until [`stop`](Self::stop) is called; stopping is final.
#[derive(Debug, Clone)]
pub struct FlickerBoard {
    rows: Vec<FlickerRow>,
    elapsed_secs: f32,
    active: bool,
}

impl FlickerBoard {
    /// Roll parameters for every row of `grid`.
    pub fn new<R: Rng>(grid: &GlyphGrid, rng: &mut R) -> Self {
        let rows = (0..grid.height()).map(|_| FlickerRow::roll(&mut *rng)).collect();
        Self::from_rows(rows)
    }

    pub fn from_rows(rows: Vec<FlickerRow>) -> Self {
        Self {
            rows,
            elapsed_secs: 0.0,
            active: true,
        }
    }

    pub fn rows(&self) -> &[FlickerRow] {
        &self.rows
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance time and sample every row. `None` once stopped.
    pub fn tick(&mut self, delta_secs: f32) -> Option<Vec<FlickerFrame>> {
        if !self.active {
            return None;
        }
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.elapsed_secs += delta_secs;
        }
        Some(self.sample())
    }

    /// Sample every row at the current time.
    pub fn sample(&self) -> Vec<FlickerFrame> {
        self.rows
            .iter()
            .map(|row| row.sample(self.elapsed_secs))
            .collect()
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_roll_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let row = FlickerRow::roll(&mut rng);
            assert!((5.0..=5.8).contains(&row.delay_secs));
            assert!((1.0..=3.0).contains(&row.intensity));
        }
    }

    #[test]
    fn test_roll_mostly_jitter() {
        let mut rng = StdRng::seed_from_u64(2);
        let inverse = (0..10_000)
            .filter(|_| FlickerRow::roll(&mut rng).style == FlickerStyle::Inverse)
            .count();
        assert!(inverse > 50 && inverse < 500, "inverse rows: {}", inverse);
    }

    #[test]
    fn test_jitter_holds_first_keyframe_before_delay() {
        let row = FlickerRow::new(FlickerStyle::Jitter, 5.0, 2.0);
        let frame = row.sample(1.0);
        assert_eq!(frame.text.opacity, 1.0);
        assert_eq!(frame.text.offset_px, -1.0);
        assert!(frame.overlay.is_none());
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let row = FlickerRow::new(FlickerStyle::Jitter, 0.0, 2.0);
        for i in 0..200 {
            let frame = row.sample(i as f32 * 0.013);
            assert!(frame.text.opacity >= 0.9 - 1e-4 && frame.text.opacity <= 1.0 + 1e-4);
            assert!(frame.text.offset_px.abs() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_jitter_mirrors() {
        let row = FlickerRow::new(FlickerStyle::Jitter, 0.0, 1.0);
        let cycle = row.jitter_cycle_secs();
        let forward = row.sample(cycle * 0.3);
        let backward = row.sample(cycle * 1.7);
        assert!(close(forward.text.offset_px, backward.text.offset_px));
    }

    #[test]
    fn test_inverse_overlay_lags() {
        let row = FlickerRow::new(FlickerStyle::Inverse, 5.0, 1.5);
        let frame = row.sample(5.03);
        let overlay = frame.overlay.unwrap();
        assert_eq!(overlay.opacity, 0.0);
        assert_eq!(overlay.offset_px, -1.5);
    }

    #[test]
    fn test_inverse_overlay_peaks_mid_cycle() {
        let row = FlickerRow::new(FlickerStyle::Inverse, 0.0, 1.0);
        let overlay = row.sample(0.05 + 0.05).overlay.unwrap();
        assert!(close(overlay.opacity, 1.0));
        assert!(close(overlay.offset_px, 0.0));
    }

    #[test]
    fn test_inverse_text_steps_between_full_and_hidden() {
        let row = FlickerRow::new(FlickerStyle::Inverse, 0.0, 1.0);
        for i in 0..100 {
            let opacity = row.sample(i as f32 * 0.007).text.opacity;
            assert!(
                [0.0, 0.5, 1.0].iter().any(|v| close(opacity, *v)),
                "opacity {}",
                opacity
            );
        }
    }

    #[test]
    fn test_static_row_matches_length() {
        assert_eq!(static_row("ab░"), "///");
        assert_eq!(static_row(""), "");
    }

    #[test]
    fn test_board_rolls_one_row_per_grid_row() {
        let grid = GlyphGrid::from_text("ab\ncd\nef").unwrap();
        let mut board = FlickerBoard::new(&grid, &mut StdRng::seed_from_u64(3));
        assert_eq!(board.rows().len(), 3);
        assert_eq!(board.tick(0.5).unwrap().len(), 3);
        assert!(close(board.elapsed_secs(), 0.5));
    }

    #[test]
    fn test_board_stops() {
        let grid = GlyphGrid::from_text("ab").unwrap();
        let mut board = FlickerBoard::new(&grid, &mut StdRng::seed_from_u64(4));
        board.stop();
        assert!(!board.is_active());
        assert!(board.tick(0.1).is_none());
    }
}
