//! Procedural text reveal: easing curves, the staggered reveal engine and
//! the simpler interval scramble.

mod easing;
mod engine;
mod scramble;

pub use easing::{cubic_bezier, interpolate_keyframes, steps, CubicBezier, Easing};
pub use engine::{
    char_jitter, char_progress, is_revealed, reveal_threshold, row_progress, scramble_index,
    stagger_offset, RevealConfig, RevealEngine, RevealPhase, HARD_FLOOR,
};
pub use scramble::{ScrambleConfig, ScrambleText};
