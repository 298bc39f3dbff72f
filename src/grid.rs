//! Immutable rectangular grid of glyphs.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A rectangular grid of glyph rows.
///
/// Rows are never empty and all have the same number of characters.
/// A grid is never mutated once built; animations render derived copies.
/// Serializes as a plain array of row strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GlyphGrid {
    width: usize,
    rows: Vec<String>,
}

impl GlyphGrid {
    /// Build a grid from rows, checking that it is non-empty and rectangular.
    pub fn from_rows(rows: Vec<String>) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }
        for (i, row) in rows.iter().enumerate().skip(1) {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::Ragged {
                    row: i,
                    expected: width,
                    found,
                });
            }
        }
        Ok(Self { width, rows })
    }

    /// Build a grid from newline-separated text. A trailing newline is ignored.
    pub fn from_text(text: &str) -> Result<Self, GridError> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        Self::from_rows(text.split('\n').map(str::to_string).collect())
    }

    /// Build a grid from row-major glyphs. `glyphs.len()` must equal `width * height`.
    pub(crate) fn from_glyphs(glyphs: &[char], width: usize) -> Result<Self, GridError> {
        if width == 0 || glyphs.is_empty() {
            return Err(GridError::Empty);
        }
        if glyphs.len() % width != 0 {
            return Err(GridError::Ragged {
                row: glyphs.len() / width,
                expected: width,
                found: glyphs.len() % width,
            });
        }
        let rows = glyphs
            .chunks(width)
            .map(|row| row.iter().collect::<String>())
            .collect();
        Ok(Self { width, rows })
    }

    /// Characters per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// A single row.
    pub fn row(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(String::as_str)
    }

    /// The glyph at column `x` of row `y`.
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        self.rows.get(y).and_then(|row| row.chars().nth(x))
    }

    /// Rows joined with newlines, without a trailing newline.
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

impl TryFrom<Vec<String>> for GlyphGrid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<GlyphGrid> for Vec<String> {
    fn from(grid: GlyphGrid) -> Self {
        grid.rows
    }
}

impl std::fmt::Display for GlyphGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_rows_reports_shape() {
        let grid = GlyphGrid::from_rows(rows(&["ab ", "c@d"])).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.glyph(1, 1), Some('@'));
        assert_eq!(grid.glyph(3, 1), None);
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let grid = GlyphGrid::from_rows(rows(&["░▒", "▓█"])).unwrap();
        assert_eq!(grid.width(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = GlyphGrid::from_rows(rows(&["abc", "ab"])).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(GlyphGrid::from_rows(vec![]), Err(GridError::Empty));
        assert_eq!(GlyphGrid::from_rows(rows(&[""])), Err(GridError::Empty));
    }

    #[test]
    fn test_from_text_ignores_trailing_newline() {
        let grid = GlyphGrid::from_text(" .:\n#%@\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.to_text(), " .:\n#%@");
    }

    #[test]
    fn test_from_glyphs_chunks_rows() {
        let grid = GlyphGrid::from_glyphs(&['a', 'b', 'c', 'd'], 2).unwrap();
        assert_eq!(grid.rows(), &["ab".to_string(), "cd".to_string()]);
        assert!(GlyphGrid::from_glyphs(&['a', 'b', 'c'], 2).is_err());
    }

    #[test]
    fn test_serializes_as_row_array() {
        let grid = GlyphGrid::from_rows(rows(&[" @", "@ "])).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"[" @","@ "]"#);
        let back: GlyphGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_deserialize_rejects_ragged_rows() {
        let result: Result<GlyphGrid, _> = serde_json::from_str(r#"["ab","a"]"#);
        assert!(result.is_err());
    }
}
