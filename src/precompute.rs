//! Grid precompute pipeline.
//!
//! Runs the sampler once per asset and width and collects the grids into a
//! [`PrecomputedCatalog`]. A failing entry is logged and skipped; every other
//! entry is still generated.

use std::path::Path;

use crate::catalog::{source_digest, AssetSpec, CatalogAsset, CatalogEntry, PrecomputedCatalog};
use crate::error::{CatalogError, SampleError};
use crate::raster::RasterImage;
use crate::sampler::sample;

/// One skipped entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputeFailure {
    pub asset_id: String,
    /// `None` when the whole asset failed (unreadable or undecodable source).
    pub width: Option<u32>,
    pub error: SampleError,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputeReport {
    /// Grids sampled in this run.
    pub generated: usize,
    /// Grids carried over from a previous artifact.
    pub reused: usize,
    pub failures: Vec<PrecomputeFailure>,
}

impl PrecomputeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sample one catalog entry.
///
/// This is the single code path shared by the pipeline and the runtime
/// converter, so both produce identical rows.
pub fn render_entry(
    image: &RasterImage,
    spec: &AssetSpec,
    width: u32,
) -> Result<CatalogEntry, SampleError> {
    let rows = sample(image, &spec.sample_options(width))?;
    Ok(CatalogEntry {
        rows,
        effective_width: spec.effective_width(width),
    })
}

/// Generate every `(asset, width)` entry from scratch.
///
/// # Arguments
/// * `specs` - Assets to generate
/// * `widths` - Requested widths for assets without their own list
/// * `asset_root` - Directory asset image paths are relative to
pub fn generate(
    specs: &[AssetSpec],
    widths: &[u32],
    asset_root: &Path,
) -> (PrecomputedCatalog, PrecomputeReport) {
    generate_incremental(specs, widths, asset_root, None)
}

/// Generate entries, reusing grids from `previous` where possible.
///
/// An entry is reused when the previous artifact has it for the same width,
/// the asset's sampling parameters are unchanged and the source file digest
/// matches. Reused entries skip decoding entirely.
pub fn generate_incremental(
    specs: &[AssetSpec],
    widths: &[u32],
    asset_root: &Path,
    previous: Option<&PrecomputedCatalog>,
) -> (PrecomputedCatalog, PrecomputeReport) {
    let mut catalog = PrecomputedCatalog::new();
    let mut report = PrecomputeReport::default();

    for spec in specs {
        if catalog.remove(&spec.id).is_some() {
            log::warn!("[ascii] duplicate asset id {}, later entry wins", spec.id);
        }
        if let Some(asset) = generate_asset(spec, widths, asset_root, previous, &mut report) {
            catalog.insert(spec.id.clone(), asset);
        }
    }

    log::info!(
        "[ascii] {} grids generated, {} reused, {} failed",
        report.generated,
        report.reused,
        report.failures.len()
    );
    (catalog, report)
}

fn generate_asset(
    spec: &AssetSpec,
    widths: &[u32],
    asset_root: &Path,
    previous: Option<&PrecomputedCatalog>,
    report: &mut PrecomputeReport,
) -> Option<CatalogAsset> {
    let path = spec.resolve_path(asset_root);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let error =
                SampleError::InvalidImage(format!("failed to read {}: {}", path.display(), e));
            record_failure(report, spec, None, error);
            return None;
        }
    };

    let digest = source_digest(&bytes);
    let reusable = previous
        .and_then(|catalog| catalog.asset(&spec.id))
        .filter(|asset| {
            asset.matches_spec(spec) && asset.source_digest.as_deref() == Some(digest.as_str())
        });

    let mut asset = CatalogAsset::from_spec(spec, Some(digest));
    let mut image: Option<RasterImage> = None;

    for &width in spec.widths_or(widths) {
        if let Some(entry) = reusable.and_then(|a| a.widths.get(&width)) {
            log::debug!("[ascii] reusing {} width={}", spec.id, width);
            asset.widths.insert(width, entry.clone());
            report.reused += 1;
            continue;
        }

        if image.is_none() {
            match RasterImage::decode(&bytes) {
                Ok(decoded) => image = Some(decoded),
                Err(error) => {
                    record_failure(report, spec, None, error);
                    break;
                }
            }
        }
        let Some(image) = image.as_ref() else { break };

        match render_entry(image, spec, width) {
            Ok(entry) => {
                log::info!(
                    "[ascii] generated {} width={} ({}x{}, font {}px)",
                    spec.id,
                    entry.effective_width,
                    entry.rows.width(),
                    entry.rows.height(),
                    spec.font_size_px(width)
                );
                asset.widths.insert(width, entry);
                report.generated += 1;
            }
            Err(error) => record_failure(report, spec, Some(width), error),
        }
    }

    if asset.widths.is_empty() {
        None
    } else {
        Some(asset)
    }
}

fn record_failure(
    report: &mut PrecomputeReport,
    spec: &AssetSpec,
    width: Option<u32>,
    error: SampleError,
) {
    match width {
        Some(width) => log::error!(
            "[ascii] failed to generate {} width={}: {}",
            spec.id,
            width,
            error
        ),
        None => log::error!("[ascii] failed to generate {}: {}", spec.id, error),
    }
    report.failures.push(PrecomputeFailure {
        asset_id: spec.id.clone(),
        width,
        error,
    });
}

/// Write the artifact consumed at runtime.
pub fn write_artifact(catalog: &PrecomputedCatalog, path: &Path) -> Result<(), CatalogError> {
    catalog.save(path)?;
    log::info!(
        "[ascii] wrote {} ({} assets, {} grids)",
        path.display(),
        catalog.len(),
        catalog.entry_count()
    );
    Ok(())
}
