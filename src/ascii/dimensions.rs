//! Grid dimension calculation with glyph aspect correction.

use crate::error::SampleError;

/// Default cell aspect factor.
/// Glyphs are visually taller than wide, so an image needs fewer rows
/// than columns to keep its proportions.
pub const DEFAULT_CELL_ASPECT: f64 = 0.4;

/// Default font size ratio relative to the rendered width (2px at width 240).
pub const DEFAULT_FONT_SIZE_RATIO: f64 = 0.0083;

/// Calculate the `(columns, rows)` of the glyph grid for an image.
///
/// Rows are `floor(width * (img_height / img_width) * cell_aspect)`, but
/// never fewer than one so very wide images still produce a grid.
///
/// # Arguments
/// * `img_width` - Width of the source image in pixels
/// * `img_height` - Height of the source image in pixels
/// * `width` - Requested grid width in characters
/// * `cell_aspect` - Cell aspect correction factor (typically ~0.4)
///
/// # Errors
/// * [`SampleError::InvalidImage`] for a zero-area image
/// * [`SampleError::InvalidDimensions`] for a zero width or a non-positive aspect
///
/// # Example
/// ```ignore
/// // A 100x100 image at 50 columns with the default aspect is 50x20
/// assert_eq!(grid_dimensions(100, 100, 50, 0.4)?, (50, 20));
/// ```
pub fn grid_dimensions(
    img_width: u32,
    img_height: u32,
    width: u32,
    cell_aspect: f64,
) -> Result<(u32, u32), SampleError> {
    if width < 1 {
        return Err(SampleError::InvalidDimensions(
            "grid width must be at least 1".to_string(),
        ));
    }
    if !cell_aspect.is_finite() || cell_aspect <= 0.0 {
        return Err(SampleError::InvalidDimensions(format!(
            "cell aspect must be a positive number, got {}",
            cell_aspect
        )));
    }
    if img_width == 0 || img_height == 0 {
        return Err(SampleError::InvalidImage(format!(
            "image has zero area ({}x{})",
            img_width, img_height
        )));
    }

    let rows = (width as f64 * (img_height as f64 / img_width as f64) * cell_aspect).floor();
    let rows = if rows >= u32::MAX as f64 {
        u32::MAX
    } else {
        (rows as u32).max(1)
    };

    Ok((width, rows))
}

/// Width actually sampled for a requested render width.
///
/// Some assets are drawn at a larger font size, so they are sampled at
/// `width / divisor` columns. A divisor of zero is treated as one.
/// A zero width stays zero so the sampler still rejects it.
pub fn effective_width(width: u32, divisor: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    (width / divisor.max(1)).max(1)
}

/// Font size in pixels for a render width, as `max(1, round(width * ratio))`.
pub fn font_size_px(width: u32, ratio: f64) -> u32 {
    let size = (width as f64 * ratio).round();
    if size.is_finite() && size > 1.0 {
        size as u32
    } else {
        1
    }
}
