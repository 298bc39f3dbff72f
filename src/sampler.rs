//! Luminance sampler: raster image to glyph grid.
//!
//! This is a pure function of the pixel buffer and [`SampleOptions`]. The
//! precompute pipeline and the runtime converter both call [`sample`], which
//! is what keeps their output byte-identical.

use serde::{Deserialize, Serialize};

use crate::ascii::{
    area_average, grid_dimensions, luminance_milli, map_to_glyphs, GlyphRamp,
    DEFAULT_CELL_ASPECT,
};
use crate::error::SampleError;
use crate::grid::GlyphGrid;
use crate::raster::RasterImage;

/// Parameters of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleOptions {
    /// Grid width in characters.
    pub width: u32,
    /// Cell aspect correction factor.
    pub cell_aspect: f64,
    /// Sub-cells per cell edge; 1 is a plain box filter.
    pub sample_factor: u32,
    /// Ramp used to map brightness to glyphs.
    pub ramp: GlyphRamp,
}

impl SampleOptions {
    /// Options for `width` columns with default aspect, factor and ramp.
    pub fn with_width(width: u32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            width: 100,
            cell_aspect: DEFAULT_CELL_ASPECT,
            sample_factor: 1,
            ramp: GlyphRamp::default(),
        }
    }
}

/// Per-cell brightness of an image sampled onto a fixed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceGrid {
    columns: u32,
    rows: u32,
    /// Brightness in thousandths of a level; `None` when fully transparent.
    cells: Vec<Option<u32>>,
}

impl LuminanceGrid {
    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cells(&self) -> &[Option<u32>] {
        &self.cells
    }

    /// Brightness of a cell, `None` if out of range or transparent.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        self.cells[(y * self.columns + x) as usize]
    }
}

/// Sample an image onto an exact `columns x rows` grid of brightness values.
///
/// The image is area-averaged onto `columns * sf` by `rows * sf` sub-cells.
/// A cell is transparent only when all of its sub-cells are; otherwise its
/// brightness is the summed luminance of the non-transparent sub-cells
/// divided by `sf * sf`.
///
/// Used directly for highlight masks, which must match the content grid's
/// dimensions regardless of the mask's own aspect ratio.
pub fn luminance_grid(
    image: &RasterImage,
    columns: u32,
    rows: u32,
    sample_factor: u32,
) -> Result<LuminanceGrid, SampleError> {
    if columns == 0 || rows == 0 {
        return Err(SampleError::InvalidDimensions(format!(
            "grid must be at least 1x1, got {}x{}",
            columns, rows
        )));
    }
    if sample_factor == 0 {
        return Err(SampleError::InvalidDimensions(
            "sample factor must be at least 1".to_string(),
        ));
    }
    let (sub_columns, sub_rows) = columns
        .checked_mul(sample_factor)
        .zip(rows.checked_mul(sample_factor))
        .ok_or_else(|| {
            SampleError::InvalidDimensions(format!(
                "{}x{} grid with sample factor {} is too large",
                columns, rows, sample_factor
            ))
        })?;

    let sub_cells = area_average(
        image.pixels(),
        image.width(),
        image.height(),
        sub_columns,
        sub_rows,
    );
    if sub_cells.is_empty() {
        return Err(SampleError::InvalidImage(format!(
            "cannot sample {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let sf = sample_factor as usize;
    let stride = sub_columns as usize;
    let samples = (sf * sf) as u64;
    let mut cells = Vec::with_capacity(columns as usize * rows as usize);

    for cy in 0..rows as usize {
        for cx in 0..columns as usize {
            let mut covered = false;
            let mut brightness = 0u64;
            for sy in 0..sf {
                let base = (cy * sf + sy) * stride + cx * sf;
                for cell in &sub_cells[base..base + sf] {
                    if !cell.is_transparent() {
                        covered = true;
                        brightness += luminance_milli(cell.r, cell.g, cell.b) as u64;
                    }
                }
            }
            cells.push(covered.then(|| (brightness / samples) as u32));
        }
    }

    Ok(LuminanceGrid {
        columns,
        rows,
        cells,
    })
}

/// Convert an image to a glyph grid.
///
/// The grid is `W` columns by `max(1, floor(W * (h / w) * k))` rows.
/// Fully transparent cells become the ramp's emptiest glyph; every other
/// cell maps its brightness onto the ramp.
///
/// # Errors
/// * [`SampleError::InvalidDimensions`] for `W < 1`, a bad aspect or factor,
///   checked before any pixel work
/// * [`SampleError::InvalidImage`] for a zero-area image
pub fn sample(image: &RasterImage, options: &SampleOptions) -> Result<GlyphGrid, SampleError> {
    let (columns, rows) = grid_dimensions(
        image.width(),
        image.height(),
        options.width,
        options.cell_aspect,
    )?;
    let luminance = luminance_grid(image, columns, rows, options.sample_factor)?;
    let glyphs = map_to_glyphs(luminance.cells(), options.ramp);

    GlyphGrid::from_glyphs(&glyphs, columns as usize)
        .map_err(|e| SampleError::InvalidDimensions(e.to_string()))
}
