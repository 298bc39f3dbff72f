//! Brightness to glyph mapping.

use super::charset::GlyphRamp;
use super::grayscale::MAX_LUMINANCE_MILLI;

/// Ramp index for a brightness given in thousandths of a level.
///
/// Computes `floor((Y / 255) * (levels - 1))` in integer math, so full white
/// lands exactly on the last glyph. Values above white clamp to it.
#[inline]
pub fn glyph_index(brightness_milli: u32, levels: usize) -> usize {
    if levels < 2 {
        return 0;
    }
    let brightness = brightness_milli.min(MAX_LUMINANCE_MILLI) as u64;
    (brightness * (levels as u64 - 1) / MAX_LUMINANCE_MILLI as u64) as usize
}

/// Map one brightness value (thousandths) to a glyph of the ramp.
#[inline]
pub fn map_brightness(brightness_milli: u32, ramp: GlyphRamp) -> char {
    let glyphs = ramp.glyphs();
    glyphs[glyph_index(brightness_milli, glyphs.len())]
}

/// Map sampled cells to glyphs.
///
/// `None` marks a fully transparent cell and always maps to the ramp's
/// emptiest glyph, regardless of its underlying color.
///
/// # Example
/// ```ignore
/// let cells = vec![Some(0), None, Some(255_000)];
/// let glyphs = map_to_glyphs(&cells, GlyphRamp::Portrait);
/// assert_eq!(glyphs, vec![' ', ' ', '@']);
/// ```
pub fn map_to_glyphs(cells: &[Option<u32>], ramp: GlyphRamp) -> Vec<char> {
    cells
        .iter()
        .map(|cell| match cell {
            Some(brightness) => map_brightness(*brightness, ramp),
            None => ramp.emptiest(),
        })
        .collect()
}
