//! CLI enum types for ramp, highlight color and reveal mode options.

use clap::ValueEnum;

use crate::ascii::GlyphRamp;
use crate::effects::HighlightColor;

/// Glyph ramp for sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RampArg {
    #[default]
    Portrait,
    Standard,
    Blocks,
    Minimal,
}

impl From<RampArg> for GlyphRamp {
    fn from(r: RampArg) -> Self {
        match r {
            RampArg::Portrait => GlyphRamp::Portrait,
            RampArg::Standard => GlyphRamp::Standard,
            RampArg::Blocks => GlyphRamp::Blocks,
            RampArg::Minimal => GlyphRamp::Minimal,
        }
    }
}

/// Highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorArg {
    Red,
    Green,
    #[default]
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl From<ColorArg> for HighlightColor {
    fn from(c: ColorArg) -> Self {
        match c {
            ColorArg::Red => HighlightColor::Red,
            ColorArg::Green => HighlightColor::Green,
            ColorArg::Yellow => HighlightColor::Yellow,
            ColorArg::Blue => HighlightColor::Blue,
            ColorArg::Magenta => HighlightColor::Magenta,
            ColorArg::Cyan => HighlightColor::Cyan,
            ColorArg::White => HighlightColor::White,
        }
    }
}

/// How the `reveal` command animates the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RevealMode {
    /// Staggered per-row decode
    #[default]
    Decode,
    /// Short whole-grid scramble burst
    Hydrate,
}
