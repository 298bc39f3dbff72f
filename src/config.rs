//! Configuration file handling for ascii-reveal.
//!
//! Loads configuration from `~/.config/ascii-reveal/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ascii::{GlyphRamp, DEFAULT_CELL_ASPECT};
use crate::catalog::AssetSpec;
use crate::effects::{HighlightColor, HighlightStyle, DEFAULT_HIGHLIGHT_THRESHOLD};
use crate::reveal::RevealConfig;

/// Configuration file structure for ascii-reveal.
/// Loaded from ~/.config/ascii-reveal/config.toml (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub reveal: RevealSection,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub precompute: PrecomputeConfig,
    #[serde(default, rename = "asset", skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetConfig>,
}

/// Sampling defaults applied to assets that don't override them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub cell_aspect: f64,
    pub sample_factor: u32,
    pub ramp: GlyphRamp,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cell_aspect: DEFAULT_CELL_ASPECT,
            sample_factor: 1,
            ramp: GlyphRamp::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSection {
    pub duration_secs: f32,
    pub stagger_factor: f32,
    pub epsilon: f32,
}

impl Default for RevealSection {
    fn default() -> Self {
        let defaults = RevealConfig::default();
        Self {
            duration_secs: defaults.duration_secs,
            stagger_factor: defaults.stagger_factor,
            epsilon: defaults.epsilon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub color: HighlightColor,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: HighlightColor::default(),
            threshold: DEFAULT_HIGHLIGHT_THRESHOLD,
        }
    }
}

impl HighlightConfig {
    pub fn style(&self) -> HighlightStyle {
        HighlightStyle {
            enabled: self.enabled,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecomputeConfig {
    /// Widths generated for assets without their own list.
    pub widths: Vec<u32>,
    /// Directory image paths are resolved against.
    pub asset_root: PathBuf,
    /// Where the catalog artifact is written.
    pub output: PathBuf,
}

impl Default for PrecomputeConfig {
    fn default() -> Self {
        Self {
            widths: vec![220],
            asset_root: PathBuf::from("public"),
            output: PathBuf::from("generated/ascii-assets.json"),
        }
    }
}

/// One `[[asset]]` table. Unset fields fall back to `[sampler]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub id: String,
    pub image_path: String,
    #[serde(default = "default_divisor")]
    pub width_divisor: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_aspect: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_factor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp: Option<GlyphRamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_ratio: Option<f64>,
}

impl AssetConfig {
    pub fn to_spec(&self, sampler: &SamplerConfig) -> AssetSpec {
        let mut spec = AssetSpec::new(&self.id, &self.image_path)
            .with_width_divisor(self.width_divisor)
            .with_cell_aspect(self.cell_aspect.unwrap_or(sampler.cell_aspect))
            .with_sample_factor(self.sample_factor.unwrap_or(sampler.sample_factor))
            .with_ramp(self.ramp.unwrap_or(sampler.ramp));
        if let Some(widths) = &self.widths {
            spec = spec.with_widths(widths.clone());
        }
        if let Some(ratio) = self.font_size_ratio {
            spec = spec.with_font_size_ratio(ratio);
        }
        spec
    }
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> u8 {
    DEFAULT_HIGHLIGHT_THRESHOLD
}

fn default_divisor() -> u32 {
    1
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            duration_secs: self.reveal.duration_secs,
            stagger_factor: self.reveal.stagger_factor,
            epsilon: self.reveal.epsilon,
            ..RevealConfig::default()
        }
    }

    /// Asset specs for every `[[asset]]` table, in file order.
    pub fn asset_specs(&self) -> Vec<AssetSpec> {
        self.assets
            .iter()
            .map(|asset| asset.to_spec(&self.sampler))
            .collect()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-reveal").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-reveal/config.toml")
        })
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# ascii-reveal configuration

[sampler]
# Terminal cell width/height ratio used to correct the row count
cell_aspect = 0.4
# Sub-cells per cell edge (1 = plain box filter)
sample_factor = 1
# Ramp: portrait, standard, blocks, minimal
ramp = "portrait"

[reveal]
# Total reveal time in seconds
duration_secs = 4.0
# Fraction of the reveal spent staggering rows
stagger_factor = 0.4
# Completion tolerance
epsilon = 0.01

[highlight]
enabled = true
# Color: red, green, yellow, blue, magenta, cyan, white
color = "yellow"
# Brightness cutoff (0-255)
threshold = 128

[precompute]
widths = [220]
asset_root = "public"
output = "generated/ascii-assets.json"

# [[asset]]
# id = "hero"
# image_path = "/images/hero.png"
# width_divisor = 1
# widths = [140, 200, 300]
# font_size_ratio = 0.0083
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.precompute.widths, vec![220]);
        assert!(config.highlight.enabled);
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
[reveal]
duration_secs = 1.5

[highlight]
color = "cyan"
"#,
        )
        .unwrap();
        assert_eq!(config.reveal.duration_secs, 1.5);
        assert_eq!(config.reveal.stagger_factor, 0.4);
        assert_eq!(config.highlight.color, HighlightColor::Cyan);
        assert_eq!(config.highlight.threshold, 128);
        assert_eq!(config.reveal_config().duration_secs, 1.5);
    }

    #[test]
    fn test_assets_inherit_sampler_defaults() {
        let config = Config::parse(
            r#"
[sampler]
sample_factor = 2

[[asset]]
id = "hero"
image_path = "/hero.png"
widths = [140, 200]

[[asset]]
id = "icon"
image_path = "icon.png"
width_divisor = 2
ramp = "blocks"
sample_factor = 1
font_size_ratio = 0.0166
"#,
        )
        .unwrap();
        let specs = config.asset_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].sample_factor, 2);
        assert_eq!(specs[0].widths, Some(vec![140, 200]));
        assert_eq!(specs[0].width_divisor, 1);
        assert_eq!(specs[1].sample_factor, 1);
        assert_eq!(specs[1].ramp, GlyphRamp::Blocks);
        assert_eq!(specs[1].width_divisor, 2);
        assert_eq!(specs[0].font_size_ratio, None);
        assert_eq!(specs[0].font_size_px(240), 2);
        assert_eq!(specs[1].font_size_ratio, Some(0.0166));
        assert_eq!(specs[1].font_size_px(220), 4);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[reveal]\nduration_secs = \"slow\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_show_output_round_trips() {
        let config = Config::parse(
            "[[asset]]\nid = \"a\"\nimage_path = \"a.png\"\n",
        )
        .unwrap();
        let rendered = config.to_toml().unwrap();
        assert_eq!(Config::parse(&rendered).unwrap(), config);
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        let path = default_path();
        assert!(path.ends_with("ascii-reveal/config.toml"));
    }
}
