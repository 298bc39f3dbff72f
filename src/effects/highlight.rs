//! Brightness-threshold highlight masks.

use serde::{Deserialize, Serialize};

use crate::error::SampleError;
use crate::grid::GlyphGrid;
use crate::raster::RasterImage;
use crate::sampler::luminance_grid;

/// Default brightness cutoff (0-255).
pub const DEFAULT_HIGHLIGHT_THRESHOLD: u8 = 128;

/// Named highlight colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Red,
    Green,
    #[default]
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl HighlightColor {
    /// ANSI foreground color code.
    pub fn ansi_code(&self) -> u8 {
        match self {
            HighlightColor::Red => 31,
            HighlightColor::Green => 32,
            HighlightColor::Yellow => 33,
            HighlightColor::Blue => 34,
            HighlightColor::Magenta => 35,
            HighlightColor::Cyan => 36,
            HighlightColor::White => 37,
        }
    }
}

/// How highlighted spans are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    /// When false every span renders plain.
    pub enabled: bool,
    pub color: HighlightColor,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: HighlightColor::default(),
        }
    }
}

/// Per-cell highlight flags with the same shape as a content grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightGrid {
    width: usize,
    rows: Vec<Vec<bool>>,
}

impl HighlightGrid {
    /// Build from rows of flags. Rows are not checked for equal length;
    /// [`highlight_spans`] falls back to a plain span on mismatch.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        Self { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[bool]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn is_highlighted(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Number of highlighted cells.
    pub fn count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&h| h).count())
            .sum()
    }
}

/// Sample `mask` onto the exact shape of `content` and threshold it.
///
/// The mask's own aspect ratio is ignored. Fully transparent mask cells count
/// as black.
pub fn highlight_grid(
    mask: &RasterImage,
    content: &GlyphGrid,
    threshold: u8,
    sample_factor: u32,
) -> Result<HighlightGrid, SampleError> {
    let to_u32 = |n: usize| {
        u32::try_from(n).map_err(|_| {
            SampleError::InvalidDimensions(format!("grid dimension {} is too large", n))
        })
    };
    let columns = to_u32(content.width())?;
    let rows = to_u32(content.height())?;
    let luminance = luminance_grid(mask, columns, rows, sample_factor)?;

    let cutoff = threshold as u32 * 1000;
    let flags: Vec<Vec<bool>> = luminance
        .cells()
        .chunks(content.width())
        .map(|row| {
            row.iter()
                .map(|cell| cell.unwrap_or(0) >= cutoff)
                .collect()
        })
        .collect();
    Ok(HighlightGrid::from_rows(flags))
}

/// A maximal run of characters sharing one highlight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

/// Split a row into runs of equal highlight state.
///
/// Concatenating the spans always reproduces `row`. A missing mask row, or
/// one whose length differs from the row, yields a single plain span.
pub fn highlight_spans<'a>(row: &'a str, mask: Option<&[bool]>) -> Vec<HighlightSpan<'a>> {
    if row.is_empty() {
        return Vec::new();
    }
    let plain = || {
        vec![HighlightSpan {
            text: row,
            highlighted: false,
        }]
    };
    let Some(mask) = mask else {
        return plain();
    };
    if mask.len() != row.chars().count() {
        return plain();
    }

    let mut spans = Vec::new();
    let mut start = 0;
    let mut current = mask[0];
    for ((offset, _), &flag) in row.char_indices().zip(mask) {
        if flag != current {
            spans.push(HighlightSpan {
                text: &row[start..offset],
                highlighted: current,
            });
            start = offset;
            current = flag;
        }
    }
    spans.push(HighlightSpan {
        text: &row[start..],
        highlighted: current,
    });
    spans
}
