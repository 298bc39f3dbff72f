//! Image-to-ASCII sampling, precomputed glyph catalogs and procedural
//! scramble-decode reveal animations.
//!
//! The pipeline is:
//!
//! 1. [`sampler`] turns a [`raster::RasterImage`] into a [`grid::GlyphGrid`]
//! 2. [`precompute`] runs the sampler offline into a [`catalog::PrecomputedCatalog`]
//! 3. [`converter`] answers lookups from the catalog or converts at runtime
//! 4. [`reveal`] animates a grid from noise into place, [`effects`] adds
//!    flicker and highlighting, and [`view`] ties a load to an animation

pub mod ascii;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod converter;
pub mod effects;
pub mod error;
pub mod grid;
pub mod precompute;
pub mod raster;
pub mod renderer;
pub mod reveal;
pub mod sampler;
pub mod view;
