//! Luminance using the ITU-R BT.601 formula.

/// Luminance of full white, in thousandths.
pub const MAX_LUMINANCE_MILLI: u32 = 255_000;

/// Luminance of an RGB triple in thousandths of a level.
///
/// The formula is: Y = 0.299*R + 0.587*G + 0.114*B
///
/// Coefficients are scaled by 1000 (299 + 587 + 114 = 1000) so the result
/// stays exact integer math: black is 0 and white is exactly
/// [`MAX_LUMINANCE_MILLI`]. Keeping the fractional part avoids rounding
/// a cell into the wrong ramp bucket.
#[inline]
pub fn luminance_milli(r: u8, g: u8, b: u8) -> u32 {
    299 * r as u32 + 587 * g as u32 + 114 * b as u32
}

/// Luminance of an RGB triple truncated to 0-255.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (luminance_milli(r, g, b) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_primaries() {
        // 299 * 255 / 1000 = 76
        assert_eq!(luminance(255, 0, 0), 76);
        // 587 * 255 / 1000 = 149
        assert_eq!(luminance(0, 255, 0), 149);
        // 114 * 255 / 1000 = 29
        assert_eq!(luminance(0, 0, 255), 29);
    }

    #[test]
    fn test_luminance_extremes_are_exact() {
        assert_eq!(luminance_milli(0, 0, 0), 0);
        assert_eq!(luminance_milli(255, 255, 255), MAX_LUMINANCE_MILLI);
        assert_eq!(luminance(255, 255, 255), 255);
    }

    #[test]
    fn test_luminance_order_matches_perception() {
        let r = luminance_milli(255, 0, 0);
        let g = luminance_milli(0, 255, 0);
        let b = luminance_milli(0, 0, 255);
        assert!(g > r, "green ({}) should be brighter than red ({})", g, r);
        assert!(r > b, "red ({}) should be brighter than blue ({})", r, b);
    }
}
