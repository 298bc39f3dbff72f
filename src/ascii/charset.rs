//! Glyph ramps and the scramble alphabet.

use serde::{Deserialize, Serialize};

/// Portrait density ramp (15 levels).
/// Characters ordered from emptiest (space) to densest (@).
pub const PORTRAIT_RAMP: &[char] = &[
    ' ', '\'', '.', ',', ':', ';', '+', '=', '?', '*', '/', '#', '%', '$', '@',
];

/// Standard ASCII density ramp (10 levels).
pub const STANDARD_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Block character ramp (5 levels) using Unicode blocks.
pub const BLOCKS_RAMP: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Minimal ramp (4 levels) for a clean look.
pub const MINIMAL_RAMP: &[char] = &[' ', '.', ':', '#'];

/// Noise alphabet shown by unrevealed characters.
///
/// Contains every glyph of every ramp. As a character nears its reveal the
/// scramble draw narrows to a prefix of this alphabet, so the symbols at the
/// front dominate the last frames of noise.
pub const SCRAMBLE_CHARSET: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']', '{', '}', '|',
    ';', ':', ',', '.', '<', '>', '?', '/', '~', '`', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b',
    'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '\'', '░', '▒',
    '▓', '█', ' ',
];

/// Brightness-ordered glyph ramp used by the sampler.
///
/// Every ramp has at least two glyphs and starts with a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphRamp {
    /// 15-level ramp used for portraits and icons
    #[default]
    Portrait,
    /// 10-level ASCII ramp
    Standard,
    /// Unicode block ramp
    Blocks,
    /// 4-level ramp
    Minimal,
}

impl GlyphRamp {
    /// All ramps, in cycling order.
    pub const ALL: [GlyphRamp; 4] = [
        GlyphRamp::Portrait,
        GlyphRamp::Standard,
        GlyphRamp::Blocks,
        GlyphRamp::Minimal,
    ];

    /// Get the glyph slice for this ramp.
    pub fn glyphs(&self) -> &'static [char] {
        match self {
            GlyphRamp::Portrait => PORTRAIT_RAMP,
            GlyphRamp::Standard => STANDARD_RAMP,
            GlyphRamp::Blocks => BLOCKS_RAMP,
            GlyphRamp::Minimal => MINIMAL_RAMP,
        }
    }

    /// Number of brightness levels.
    pub fn len(&self) -> usize {
        self.glyphs().len()
    }

    /// Ramps are never empty; provided for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The glyph emitted for fully transparent cells.
    pub fn emptiest(&self) -> char {
        self.glyphs()[0]
    }

    /// The glyph emitted for full brightness.
    pub fn densest(&self) -> char {
        let glyphs = self.glyphs();
        glyphs[glyphs.len() - 1]
    }

    /// Get a human-readable name for the ramp.
    pub fn name(&self) -> &'static str {
        match self {
            GlyphRamp::Portrait => "portrait",
            GlyphRamp::Standard => "standard",
            GlyphRamp::Blocks => "blocks",
            GlyphRamp::Minimal => "minimal",
        }
    }

    /// Parse a ramp from its name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|ramp| ramp.name() == name)
    }
}

impl std::fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
