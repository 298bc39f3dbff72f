//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{ColorArg, RampArg, RevealMode};

/// Parse and validate a stagger factor (0.0-0.99)
fn parse_stagger(s: &str) -> Result<f32, String> {
    let stagger: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=0.99).contains(&stagger) {
        return Err(format!(
            "Stagger must be between 0.0 and 0.99, got {}",
            stagger
        ));
    }
    Ok(stagger)
}

/// Parse and validate framerate (1-120 fps)
fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid framerate", s))?;
    if !(1..=120).contains(&fps) {
        return Err(format!("Framerate must be between 1 and 120 fps, got {}", fps));
    }
    Ok(fps)
}

/// Parse a non-negative duration in seconds
fn parse_seconds(s: &str) -> Result<f32, String> {
    let secs: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("Duration must be a non-negative number, got {}", s));
    }
    Ok(secs)
}

/// Convert images to ASCII glyph grids and play scramble-decode reveals
#[derive(Parser, Debug)]
#[command(name = "ascii-reveal")]
#[command(version, about = "Image to ASCII sampling with reveal animations", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Precompute glyph grids for the configured assets
    Generate(GenerateArgs),
    /// Print an image as a glyph grid
    Render(RenderArgs),
    /// Play the reveal animation for an image or asset
    Reveal(RevealArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Artifact path (default: [precompute].output)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Directory asset image paths are resolved against
    #[arg(long)]
    pub asset_root: Option<PathBuf>,

    /// Width to generate; repeat for several (default: [precompute].widths)
    #[arg(long = "width", short)]
    pub widths: Vec<u32>,

    /// Reuse unchanged entries from the existing artifact
    #[arg(long)]
    pub incremental: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Image to convert
    pub image: PathBuf,

    /// Grid width in characters
    #[arg(long, short, default_value = "100")]
    pub width: u32,

    /// Cell aspect correction (default: [sampler].cell_aspect)
    #[arg(long)]
    pub cell_aspect: Option<f64>,

    /// Sub-cells per cell edge (default: [sampler].sample_factor)
    #[arg(long)]
    pub sample_factor: Option<u32>,

    /// Glyph ramp (default: [sampler].ramp)
    #[arg(long)]
    pub ramp: Option<RampArg>,

    /// Mask image whose bright cells are highlighted
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Highlight brightness cutoff, 0-255 (default: [highlight].threshold)
    #[arg(long, requires = "mask")]
    pub threshold: Option<u8>,

    /// Highlight color (default: [highlight].color)
    #[arg(long, requires = "mask")]
    pub color: Option<ColorArg>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RevealArgs {
    /// Image to reveal
    #[arg(conflicts_with = "asset", required_unless_present = "asset")]
    pub image: Option<PathBuf>,

    /// Configured or precomputed asset id
    #[arg(long)]
    pub asset: Option<String>,

    /// Precomputed catalog (default: [precompute].output)
    #[arg(long, requires = "asset")]
    pub catalog: Option<PathBuf>,

    /// Grid width in characters
    #[arg(long, short, default_value = "100")]
    pub width: u32,

    /// Reveal duration in seconds (default: [reveal].duration_secs)
    #[arg(long, value_parser = parse_seconds)]
    pub duration: Option<f32>,

    /// Fraction of the reveal spent staggering rows (default: [reveal].stagger_factor)
    #[arg(long, value_parser = parse_stagger)]
    pub stagger: Option<f32>,

    /// Frames per second (1-120)
    #[arg(long, default_value = "30", value_parser = parse_fps)]
    pub fps: u32,

    /// Seed for the scramble noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Animation style
    #[arg(long, default_value = "decode")]
    pub mode: RevealMode,

    /// Keep flickering for this many seconds after the reveal
    #[arg(long, value_parser = parse_seconds)]
    pub flicker: Option<f32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
