//! Runtime converter and grid resolver.
//!
//! When the precomputed catalog has no entry for an `(asset, width)` pair the
//! grid is sampled on demand with the same code path the pipeline uses, and
//! memoized for the lifetime of the converter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ascii::GlyphRamp;
use crate::catalog::{AssetSpec, PrecomputedCatalog};
use crate::error::{ResolveError, SampleError};
use crate::grid::GlyphGrid;
use crate::precompute::render_entry;
use crate::raster::RasterImage;

/// Memoization key for runtime conversions.
///
/// Holds every input that affects the sampled rows, so a spec with changed
/// parameters never hits a grid sampled under the old ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub asset_id: String,
    pub image_path: String,
    /// Requested width.
    pub width: u32,
    /// Width actually sampled after the asset's divisor.
    pub effective_width: u32,
    /// `f64::to_bits` of the cell aspect.
    pub cell_aspect_bits: u64,
    pub sample_factor: u32,
    pub ramp: GlyphRamp,
}

impl CacheKey {
    pub fn new(spec: &AssetSpec, width: u32) -> Self {
        Self {
            asset_id: spec.id.clone(),
            image_path: spec.image_path.clone(),
            width,
            effective_width: spec.effective_width(width),
            cell_aspect_bits: spec.cell_aspect.to_bits(),
            sample_factor: spec.sample_factor,
            ramp: spec.ramp,
        }
    }
}

/// Just-in-time sampler with a per-process cache.
///
/// The cache is advisory: clearing it only costs a re-sample.
#[derive(Debug)]
pub struct RuntimeConverter {
    asset_root: PathBuf,
    cache: HashMap<CacheKey, Arc<GlyphGrid>>,
}

impl RuntimeConverter {
    /// Create a converter reading images relative to `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Grid for `spec` at a requested width, sampling it on a cache miss.
    ///
    /// Failures are returned to the caller and never cached.
    pub fn convert(&mut self, spec: &AssetSpec, width: u32) -> Result<Arc<GlyphGrid>, SampleError> {
        let key = CacheKey::new(spec, width);
        if let Some(grid) = self.cache.get(&key) {
            return Ok(Arc::clone(grid));
        }

        // Fail fast before touching the file
        if width == 0 {
            return Err(SampleError::InvalidDimensions(
                "width must be at least 1".to_string(),
            ));
        }
        let image = RasterImage::open(&spec.resolve_path(&self.asset_root))?;
        self.convert_image(spec, &image, width)
    }

    /// Grid for an already decoded image, memoized under `spec`'s key.
    pub fn convert_image(
        &mut self,
        spec: &AssetSpec,
        image: &RasterImage,
        width: u32,
    ) -> Result<Arc<GlyphGrid>, SampleError> {
        let key = CacheKey::new(spec, width);
        if let Some(grid) = self.cache.get(&key) {
            return Ok(Arc::clone(grid));
        }

        let entry = render_entry(image, spec, width)?;
        log::debug!(
            "Converted {} width={} at runtime ({}x{})",
            spec.id,
            width,
            entry.rows.width(),
            entry.rows.height()
        );
        let grid = Arc::new(entry.rows);
        self.cache.insert(key, Arc::clone(&grid));
        Ok(grid)
    }

    /// Whether a grid is memoized for `spec` at `width`.
    pub fn is_cached(&self, spec: &AssetSpec, width: u32) -> bool {
        self.cache.contains_key(&CacheKey::new(spec, width))
    }

    /// Drop every cached grid for an asset. Returns how many were removed.
    pub fn invalidate(&mut self, asset_id: &str) -> usize {
        let before = self.cache.len();
        self.cache.retain(|key, _| key.asset_id != asset_id);
        before - self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// Where a resolved grid came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOrigin {
    Precomputed,
    Runtime,
}

/// A grid ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGrid {
    pub grid: Arc<GlyphGrid>,
    pub origin: GridOrigin,
    pub effective_width: u32,
}

/// Answers `(asset, width)` from the catalog, falling back to the converter.
#[derive(Debug)]
pub struct GridResolver {
    catalog: PrecomputedCatalog,
    specs: HashMap<String, AssetSpec>,
    converter: RuntimeConverter,
}

impl GridResolver {
    pub fn new(catalog: PrecomputedCatalog, converter: RuntimeConverter) -> Self {
        Self {
            catalog,
            specs: HashMap::new(),
            converter,
        }
    }

    /// Register (or replace) an asset.
    ///
    /// Replacing an asset with different parameters drops its cached grids.
    pub fn register(&mut self, spec: AssetSpec) {
        if let Some(previous) = self.specs.get(&spec.id) {
            if *previous != spec {
                let dropped = self.converter.invalidate(&spec.id);
                log::debug!(
                    "Asset {} changed, dropped {} cached grids",
                    spec.id,
                    dropped
                );
            }
        }
        self.specs.insert(spec.id.clone(), spec);
    }

    pub fn spec(&self, asset_id: &str) -> Option<&AssetSpec> {
        self.specs.get(asset_id)
    }

    pub fn catalog(&self) -> &PrecomputedCatalog {
        &self.catalog
    }

    pub fn converter(&self) -> &RuntimeConverter {
        &self.converter
    }

    /// Resolve a grid. A missing catalog entry is not an error.
    ///
    /// The runtime path uses the registered spec, or the catalog asset's own
    /// metadata when the asset was never registered.
    pub fn resolve(&mut self, asset_id: &str, width: u32) -> Result<ResolvedGrid, ResolveError> {
        if let Some(entry) = self.catalog.get(asset_id, width) {
            return Ok(ResolvedGrid {
                grid: Arc::new(entry.rows.clone()),
                origin: GridOrigin::Precomputed,
                effective_width: entry.effective_width,
            });
        }
        log::debug!("Catalog miss for {} width={}", asset_id, width);

        let spec = match self.specs.get(asset_id) {
            Some(spec) => spec.clone(),
            None => self
                .catalog
                .asset(asset_id)
                .map(|asset| asset.to_spec(asset_id))
                .ok_or_else(|| ResolveError::UnknownAsset(asset_id.to_string()))?,
        };
        let grid = self.converter.convert(&spec, width)?;
        Ok(ResolvedGrid {
            grid,
            origin: GridOrigin::Runtime,
            effective_width: spec.effective_width(width),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogAsset, CatalogEntry};

    fn write_png(dir: &Path, name: &str) {
        let img = image::RgbaImage::from_fn(20, 10, |x, _| {
            let v = (x * 12) as u8;
            image::Rgba([v, v, v, 255])
        });
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_convert_memoizes() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let mut converter = RuntimeConverter::new(dir.path());
        let spec = AssetSpec::new("a", "a.png");

        let first = converter.convert(&spec, 10).unwrap();
        assert!(converter.is_cached(&spec, 10));
        std::fs::remove_file(dir.path().join("a.png")).unwrap();
        let second = converter.convert(&spec, 10).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_key_includes_sample_factor() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let mut converter = RuntimeConverter::new(dir.path());
        let spec = AssetSpec::new("a", "a.png");

        converter.convert(&spec, 10).unwrap();
        converter.convert(&spec.clone().with_sample_factor(2), 10).unwrap();
        assert_eq!(converter.cached_len(), 2);
        assert_eq!(converter.invalidate("a"), 2);
        assert_eq!(converter.cached_len(), 0);
    }

    #[test]
    fn test_changed_cell_aspect_is_a_cache_miss() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let mut converter = RuntimeConverter::new(dir.path());
        let spec = AssetSpec::new("a", "a.png");

        let narrow = converter.convert(&spec, 10).unwrap();
        let square_spec = spec.clone().with_cell_aspect(1.0);
        let square = converter.convert(&square_spec, 10).unwrap();

        let image = RasterImage::open(&dir.path().join("a.png")).unwrap();
        let expected = crate::sampler::sample(&image, &square_spec.sample_options(10)).unwrap();
        assert_eq!(*square, expected);
        assert_ne!(narrow.height(), square.height());
        assert!(!converter.is_cached(&spec.clone().with_ramp(GlyphRamp::Blocks), 10));
    }

    #[test]
    fn test_changed_divisor_and_ramp_resample() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let mut converter = RuntimeConverter::new(dir.path());
        let spec = AssetSpec::new("a", "a.png");

        let full = converter.convert(&spec, 10).unwrap();
        let halved = converter.convert(&spec.clone().with_width_divisor(2), 10).unwrap();
        let blocks = converter.convert(&spec.clone().with_ramp(GlyphRamp::Blocks), 10).unwrap();
        assert_eq!(full.width(), 10);
        assert_eq!(halved.width(), 5);
        assert!(!Arc::ptr_eq(&full, &blocks));
        assert_eq!(converter.cached_len(), 3);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut converter = RuntimeConverter::new(dir.path());
        let spec = AssetSpec::new("missing", "missing.png");

        assert!(matches!(
            converter.convert(&spec, 10),
            Err(SampleError::InvalidImage(_))
        ));
        assert!(matches!(
            converter.convert(&spec, 0),
            Err(SampleError::InvalidDimensions(_))
        ));
        assert_eq!(converter.cached_len(), 0);
    }

    #[test]
    fn test_resolver_prefers_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("hero", "hero.png");
        let mut asset = CatalogAsset::from_spec(&spec, None);
        asset.widths.insert(
            140,
            CatalogEntry {
                rows: GlyphGrid::from_text("@@").unwrap(),
                effective_width: 140,
            },
        );
        let mut catalog = PrecomputedCatalog::new();
        catalog.insert("hero", asset);

        let mut resolver = GridResolver::new(catalog, RuntimeConverter::new(dir.path()));
        let resolved = resolver.resolve("hero", 140).unwrap();
        assert_eq!(resolved.origin, GridOrigin::Precomputed);
        assert_eq!(resolved.grid.to_text(), "@@");
    }

    #[test]
    fn test_resolver_falls_back_to_catalog_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "hero.png");
        let spec = AssetSpec::new("hero", "/hero.png");
        let mut catalog = PrecomputedCatalog::new();
        catalog.insert("hero", CatalogAsset::from_spec(&spec, None));

        let mut resolver = GridResolver::new(catalog, RuntimeConverter::new(dir.path()));
        let resolved = resolver.resolve("hero", 12).unwrap();
        assert_eq!(resolved.origin, GridOrigin::Runtime);
        assert_eq!(resolved.grid.width(), 12);
    }

    #[test]
    fn test_resolver_unknown_asset() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver =
            GridResolver::new(PrecomputedCatalog::new(), RuntimeConverter::new(dir.path()));
        assert_eq!(
            resolver.resolve("ghost", 10),
            Err(ResolveError::UnknownAsset("ghost".to_string()))
        );
    }

    #[test]
    fn test_reregister_with_changes_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        let mut resolver =
            GridResolver::new(PrecomputedCatalog::new(), RuntimeConverter::new(dir.path()));
        resolver.register(AssetSpec::new("a", "a.png"));
        let before = resolver.resolve("a", 10).unwrap();

        resolver.register(AssetSpec::new("a", "a.png"));
        assert_eq!(resolver.converter().cached_len(), 1);

        resolver.register(AssetSpec::new("a", "a.png").with_cell_aspect(1.0));
        assert_eq!(resolver.converter().cached_len(), 0);
        let after = resolver.resolve("a", 10).unwrap();
        assert_ne!(before.grid.height(), after.grid.height());
    }
}
