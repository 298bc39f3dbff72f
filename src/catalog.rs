//! Precomputed catalog: glyph grids keyed by asset and requested width.
//!
//! The on-disk artifact is JSON shaped as
//! `assetId -> { imagePath, cellAspect, ..., widths: { width -> { rows, effectiveWidth } } }`.
//! It is loaded without decoding any image.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ascii::{
    effective_width, font_size_px, GlyphRamp, DEFAULT_CELL_ASPECT, DEFAULT_FONT_SIZE_RATIO,
};
use crate::error::CatalogError;
use crate::grid::GlyphGrid;
use crate::sampler::SampleOptions;

/// A source image registered under a stable identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    /// Stable identifier, e.g. `hero` or `LightSabreIcon`.
    pub id: String,
    /// Image path relative to the asset root. A leading `/` is ignored.
    pub image_path: String,
    /// Requested widths are divided by this before sampling.
    pub width_divisor: u32,
    pub cell_aspect: f64,
    pub sample_factor: u32,
    pub ramp: GlyphRamp,
    /// Widths to precompute; `None` uses the pipeline's global list.
    pub widths: Option<Vec<u32>>,
    /// Display font size per requested column; `None` uses the default ratio.
    pub font_size_ratio: Option<f64>,
}

impl AssetSpec {
    /// Create a spec with default sampling parameters.
    pub fn new(id: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_path: image_path.into(),
            width_divisor: 1,
            cell_aspect: DEFAULT_CELL_ASPECT,
            sample_factor: 1,
            ramp: GlyphRamp::default(),
            widths: None,
            font_size_ratio: None,
        }
    }

    pub fn with_width_divisor(mut self, divisor: u32) -> Self {
        self.width_divisor = divisor;
        self
    }

    pub fn with_cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    pub fn with_sample_factor(mut self, sample_factor: u32) -> Self {
        self.sample_factor = sample_factor;
        self
    }

    pub fn with_ramp(mut self, ramp: GlyphRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_widths(mut self, widths: Vec<u32>) -> Self {
        self.widths = Some(widths);
        self
    }

    pub fn with_font_size_ratio(mut self, ratio: f64) -> Self {
        self.font_size_ratio = Some(ratio);
        self
    }

    /// Absolute location of the source image under `root`.
    ///
    /// `/images/a.jpg` and `images/a.jpg` resolve to the same file.
    pub fn resolve_path(&self, root: &Path) -> PathBuf {
        root.join(self.image_path.trim_start_matches('/'))
    }

    /// Width actually sampled for a requested width.
    pub fn effective_width(&self, width: u32) -> u32 {
        effective_width(width, self.width_divisor)
    }

    /// Display font size in pixels for a requested width.
    ///
    /// Display only: grids never depend on it.
    pub fn font_size_px(&self, width: u32) -> u32 {
        font_size_px(width, self.font_size_ratio.unwrap_or(DEFAULT_FONT_SIZE_RATIO))
    }

    /// Sampler options for a requested width.
    pub fn sample_options(&self, width: u32) -> SampleOptions {
        SampleOptions {
            width: self.effective_width(width),
            cell_aspect: self.cell_aspect,
            sample_factor: self.sample_factor,
            ramp: self.ramp,
        }
    }

    /// The asset's own width list, or `default` when it has none.
    pub fn widths_or<'a>(&'a self, default: &'a [u32]) -> &'a [u32] {
        self.widths.as_deref().unwrap_or(default)
    }
}

/// One precomputed grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub rows: GlyphGrid,
    pub effective_width: u32,
}

/// Everything precomputed for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAsset {
    pub image_path: String,
    pub cell_aspect: f64,
    #[serde(default = "default_sample_factor")]
    pub sample_factor: u32,
    #[serde(default)]
    pub ramp: GlyphRamp,
    #[serde(default = "default_width_divisor")]
    pub width_divisor: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_ratio: Option<f64>,
    /// Digest of the source file the grids were generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,
    #[serde(default)]
    pub widths: BTreeMap<u32, CatalogEntry>,
}

fn default_sample_factor() -> u32 {
    1
}

fn default_width_divisor() -> u32 {
    1
}

impl CatalogAsset {
    /// An asset record with no grids yet.
    pub fn from_spec(spec: &AssetSpec, source_digest: Option<String>) -> Self {
        Self {
            image_path: spec.image_path.clone(),
            cell_aspect: spec.cell_aspect,
            sample_factor: spec.sample_factor,
            ramp: spec.ramp,
            width_divisor: spec.width_divisor,
            font_size_ratio: spec.font_size_ratio,
            source_digest,
            widths: BTreeMap::new(),
        }
    }

    /// Rebuild the spec this asset was generated from.
    pub fn to_spec(&self, id: &str) -> AssetSpec {
        AssetSpec {
            id: id.to_string(),
            image_path: self.image_path.clone(),
            width_divisor: self.width_divisor,
            cell_aspect: self.cell_aspect,
            sample_factor: self.sample_factor,
            ramp: self.ramp,
            widths: None,
            font_size_ratio: self.font_size_ratio,
        }
    }

    /// Whether grids in this record were sampled with the spec's parameters.
    pub fn matches_spec(&self, spec: &AssetSpec) -> bool {
        self.image_path == spec.image_path
            && self.cell_aspect == spec.cell_aspect
            && self.sample_factor == spec.sample_factor
            && self.ramp == spec.ramp
            && self.width_divisor == spec.width_divisor
    }
}

/// Read-only lookup of precomputed grids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecomputedCatalog {
    assets: BTreeMap<String, CatalogAsset>,
}

impl PrecomputedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grid for `(asset_id, width)`, if precomputed.
    pub fn get(&self, asset_id: &str, width: u32) -> Option<&CatalogEntry> {
        self.assets.get(asset_id)?.widths.get(&width)
    }

    pub fn asset(&self, asset_id: &str) -> Option<&CatalogAsset> {
        self.assets.get(asset_id)
    }

    pub fn insert(&mut self, asset_id: impl Into<String>, asset: CatalogAsset) {
        self.assets.insert(asset_id.into(), asset);
    }

    pub fn remove(&mut self, asset_id: &str) -> Option<CatalogAsset> {
        self.assets.remove(asset_id)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&str, &CatalogAsset)> {
        self.assets.iter().map(|(id, asset)| (id.as_str(), asset))
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Total number of precomputed grids across all assets.
    pub fn entry_count(&self) -> usize {
        self.assets.values().map(|a| a.widths.len()).sum()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Load a catalog artifact from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the catalog artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = self.to_json().map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)
    }
}

/// Deterministic digest of source bytes.
/// Returns a 32-character hex string (first 16 bytes of SHA-256).
pub fn source_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    hex::encode(&result[..16])
}
