//! Integration tests for sampling, the precomputed catalog and the runtime
//! converter.
//!
//! These cover the cross-module guarantees:
//! - Determinism and grid shape of the sampler
//! - Precompute and runtime conversion producing identical rows
//! - Catalog artifacts surviving a write/load cycle

use std::path::Path;
use std::sync::Arc;

use ascii_reveal::ascii::{glyph_index, GlyphRamp, MAX_LUMINANCE_MILLI};
use ascii_reveal::catalog::{AssetSpec, PrecomputedCatalog};
use ascii_reveal::converter::{GridOrigin, GridResolver, RuntimeConverter};
use ascii_reveal::precompute::{generate, write_artifact};
use ascii_reveal::raster::RasterImage;
use ascii_reveal::sampler::{sample, SampleOptions};

fn gradient_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 7 + y * 13) % 256) as u8;
        let alpha = if (x + y) % 11 == 0 { 0 } else { 255 };
        image::Rgba([v, 255 - v, v / 2, alpha])
    });
    img.save(path).unwrap();
}

// ==================== Sampler Tests ====================

#[test]
fn test_concrete_black_white_pair() {
    let image = RasterImage::from_rgba(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
    let options = SampleOptions {
        width: 2,
        cell_aspect: 1.0,
        ..SampleOptions::default()
    };
    let grid = sample(&image, &options).unwrap();
    let ramp = GlyphRamp::Portrait;
    assert_eq!(grid.height(), 1);
    assert_eq!(grid.glyph(0, 0), Some(ramp.emptiest()));
    assert_eq!(grid.glyph(1, 0), Some(ramp.densest()));
}

#[test]
fn test_transparent_image_is_blank_at_any_width() {
    let mut pixels = Vec::new();
    for i in 0..16u8 {
        pixels.extend_from_slice(&[i * 10, 200, 50, 0]);
    }
    let image = RasterImage::from_rgba(4, 4, pixels).unwrap();
    for width in [1, 3, 4, 9] {
        let grid = sample(&image, &SampleOptions::with_width(width)).unwrap();
        assert!(grid.rows().iter().all(|row| row.chars().all(|c| c == ' ')));
    }
}

#[test]
fn test_grid_shape_across_widths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.png");
    gradient_png(&path, 120, 80);
    let image = RasterImage::open(&path).unwrap();

    for width in [1, 10, 37, 120, 300] {
        let grid = sample(&image, &SampleOptions::with_width(width)).unwrap();
        let expected_rows = ((width as f64 * 80.0 / 120.0 * 0.4).floor() as usize).max(1);
        assert_eq!(grid.height(), expected_rows, "width {}", width);
        assert!(grid.rows().iter().all(|row| row.chars().count() == width as usize));
    }
}

#[test]
fn test_wide_short_image_keeps_one_row() {
    let image = RasterImage::from_rgba(100, 1, vec![128; 400]).unwrap();
    let grid = sample(&image, &SampleOptions::with_width(10)).unwrap();
    assert_eq!(grid.height(), 1);
}

#[test]
fn test_sampler_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.png");
    gradient_png(&path, 64, 64);
    let image = RasterImage::open(&path).unwrap();
    let options = SampleOptions {
        width: 30,
        sample_factor: 3,
        ..SampleOptions::default()
    };
    let first = sample(&image, &options).unwrap();
    let second = sample(&image, &options).unwrap();
    assert_eq!(first.to_text(), second.to_text());
}

#[test]
fn test_ramp_monotonic_over_brightness() {
    for ramp in GlyphRamp::ALL {
        let mut previous = 0;
        for milli in (0..=MAX_LUMINANCE_MILLI).step_by(997) {
            let index = glyph_index(milli, ramp.len());
            assert!(index >= previous);
            assert!(index < ramp.len());
            previous = index;
        }
    }
}

// ==================== Precompute / Runtime Tests ====================

#[test]
fn test_precompute_matches_runtime() {
    let dir = tempfile::tempdir().unwrap();
    gradient_png(&dir.path().join("hero.png"), 90, 60);
    gradient_png(&dir.path().join("icon.png"), 16, 16);

    let specs = vec![
        AssetSpec::new("hero", "/hero.png").with_widths(vec![140, 200, 300]),
        AssetSpec::new("icon", "icon.png")
            .with_width_divisor(2)
            .with_sample_factor(2)
            .with_ramp(GlyphRamp::Blocks),
    ];
    let (catalog, report) = generate(&specs, &[48, 96], dir.path());
    assert!(report.is_clean());
    assert_eq!(report.generated, 5);

    let mut converter = RuntimeConverter::new(dir.path());
    for spec in &specs {
        for width in spec.widths_or(&[48, 96]) {
            let entry = catalog.get(&spec.id, *width).unwrap();
            let runtime = converter.convert(spec, *width).unwrap();
            assert_eq!(entry.rows, *runtime, "{} width={}", spec.id, width);
            assert_eq!(entry.effective_width, spec.effective_width(*width));
        }
    }
}

#[test]
fn test_artifact_feeds_resolver() {
    let dir = tempfile::tempdir().unwrap();
    gradient_png(&dir.path().join("icon.png"), 24, 24);
    let spec = AssetSpec::new("icon", "icon.png");
    let (catalog, _) = generate(&[spec.clone()], &[20], dir.path());

    let artifact = dir.path().join("generated/ascii-assets.json");
    write_artifact(&catalog, &artifact).unwrap();
    let loaded = PrecomputedCatalog::load(&artifact).unwrap();
    assert_eq!(loaded, catalog);

    let mut resolver = GridResolver::new(loaded, RuntimeConverter::new(dir.path()));
    let hit = resolver.resolve("icon", 20).unwrap();
    assert_eq!(hit.origin, GridOrigin::Precomputed);

    let miss = resolver.resolve("icon", 12).unwrap();
    assert_eq!(miss.origin, GridOrigin::Runtime);
    assert_eq!(miss.grid.width(), 12);

    let again = resolver.resolve("icon", 12).unwrap();
    assert!(Arc::ptr_eq(&miss.grid, &again.grid));
}

#[test]
fn test_broken_asset_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    gradient_png(&dir.path().join("good.png"), 10, 10);
    std::fs::write(dir.path().join("bad.png"), b"not an image").unwrap();

    let specs = vec![
        AssetSpec::new("bad", "bad.png"),
        AssetSpec::new("good", "good.png"),
    ];
    let (catalog, report) = generate(&specs, &[8], dir.path());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].asset_id, "bad");
    assert!(catalog.asset("bad").is_none());
    assert!(catalog.get("good", 8).is_some());
}
