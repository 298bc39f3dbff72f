//! Building blocks for converting raster images to glyph grids.
//!
//! The sampler composes these steps:
//!
//! 1. **Dimensions** - grid size from the image aspect and a cell aspect factor
//! 2. **Downsampling** - area-average RGBA pixels onto the (sub)cell grid
//! 3. **Luminance** - BT.601 brightness per cell, in exact integer math
//! 4. **Mapping** - brightness to a glyph of a [`GlyphRamp`]

mod charset;
mod dimensions;
mod downsample;
mod grayscale;
mod mapping;

pub use charset::{
    GlyphRamp, BLOCKS_RAMP, MINIMAL_RAMP, PORTRAIT_RAMP, SCRAMBLE_CHARSET, STANDARD_RAMP,
};
pub use dimensions::{
    effective_width, font_size_px, grid_dimensions, DEFAULT_CELL_ASPECT,
    DEFAULT_FONT_SIZE_RATIO,
};
pub use downsample::{area_average, CellColor};
pub use grayscale::{luminance, luminance_milli, MAX_LUMINANCE_MILLI};
pub use mapping::{glyph_index, map_brightness, map_to_glyphs};
