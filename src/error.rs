//! Error types shared across the sampler, grid and catalog layers.

use std::path::PathBuf;

/// Errors that fail a single image-to-grid conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    /// The source could not be decoded or has zero area.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    /// The requested grid size or sampling parameters are unusable.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Errors that reject a set of rows as a glyph grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid needs at least one non-empty row.
    #[error("glyph grid has no rows")]
    Empty,
    /// Every row must have the same number of characters.
    #[error("row {row} has {found} characters, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors reading or writing the precomputed catalog artifact.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to access catalog '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors resolving an `(asset, width)` pair to a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Neither the catalog nor the registry knows the asset.
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),
    /// The runtime conversion failed.
    #[error(transparent)]
    Sample(#[from] SampleError),
}
