//! Post-reveal effects: per-row flicker and mask-driven highlighting.

mod flicker;
mod highlight;

pub use flicker::{
    static_row, FlickerBoard, FlickerFrame, FlickerRow, FlickerStyle, LayerState,
    INVERSE_PROBABILITY, STATIC_GLYPH,
};
pub use highlight::{
    highlight_grid, highlight_spans, HighlightColor, HighlightGrid, HighlightSpan,
    HighlightStyle, DEFAULT_HIGHLIGHT_THRESHOLD,
};
