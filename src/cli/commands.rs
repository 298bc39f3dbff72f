//! Subcommand handlers for generate, render, reveal and config actions.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::args::{Args, Command, ConfigAction, GenerateArgs, RenderArgs, RevealArgs};
use super::enums::RevealMode;
use crate::catalog::PrecomputedCatalog;
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG_TOML};
use crate::converter::{GridResolver, RuntimeConverter};
use crate::effects::{highlight_grid, FlickerBoard, HighlightStyle};
use crate::error::{CatalogError, ResolveError, SampleError};
use crate::grid::GlyphGrid;
use crate::precompute::{generate_incremental, write_artifact};
use crate::raster::RasterImage;
use crate::renderer;
use crate::reveal::{ScrambleConfig, ScrambleText};
use crate::sampler::{sample, SampleOptions};
use crate::view::{AsciiView, ViewMode};

/// Global flag for Ctrl+C handling
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C was received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once, before the first animation frame.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

/// Errors surfaced by a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("No assets configured. Add [[asset]] tables to {}", .0.display())]
    NoAssets(PathBuf),
    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to render config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to install Ctrl+C handler: {0}")]
    Ctrlc(#[from] ctrlc::Error),
    #[error("Terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the config and run the selected subcommand.
pub fn run(args: &Args) -> Result<(), CommandError> {
    let config = Config::load(args.config.as_deref())?;
    match &args.command {
        Command::Generate(generate) => run_generate(&config, args.config.as_deref(), generate),
        Command::Render(render) => run_render(&config, render),
        Command::Reveal(reveal) => run_reveal(&config, reveal),
        Command::Config { action } => handle_config_action(&config, args.config.as_deref(), action),
    }
}

/// Precompute every configured asset and write the artifact.
pub fn run_generate(
    config: &Config,
    config_path: Option<&Path>,
    args: &GenerateArgs,
) -> Result<(), CommandError> {
    let specs = config.asset_specs();
    if specs.is_empty() {
        let path = config_path.map(PathBuf::from).unwrap_or_else(default_path);
        return Err(CommandError::NoAssets(path));
    }

    let widths = if args.widths.is_empty() {
        config.precompute.widths.clone()
    } else {
        args.widths.clone()
    };
    let asset_root = args
        .asset_root
        .clone()
        .unwrap_or_else(|| config.precompute.asset_root.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.precompute.output.clone());

    let previous = if args.incremental && output.exists() {
        match PrecomputedCatalog::load(&output) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                log::warn!("Ignoring previous artifact: {}", e);
                None
            }
        }
    } else {
        None
    };

    let (catalog, report) = generate_incremental(&specs, &widths, &asset_root, previous.as_ref());
    write_artifact(&catalog, &output)?;

    println!(
        "Generated {} grids, reused {}, skipped {}",
        report.generated,
        report.reused,
        report.failures.len()
    );
    Ok(())
}

/// Print an image as a glyph grid, optionally highlighted by a mask.
pub fn run_render(config: &Config, args: &RenderArgs) -> Result<(), CommandError> {
    let options = SampleOptions {
        width: args.width,
        cell_aspect: args.cell_aspect.unwrap_or(config.sampler.cell_aspect),
        sample_factor: args.sample_factor.unwrap_or(config.sampler.sample_factor),
        ramp: args.ramp.map(Into::into).unwrap_or(config.sampler.ramp),
    };
    let image = RasterImage::open(&args.image)?;
    let grid = sample(&image, &options)?;

    let highlight = match &args.mask {
        Some(mask_path) => {
            let mask = RasterImage::open(mask_path)?;
            let threshold = args.threshold.unwrap_or(config.highlight.threshold);
            Some(highlight_grid(
                &mask,
                &grid,
                threshold,
                options.sample_factor,
            )?)
        }
        None => None,
    };
    let style = HighlightStyle {
        enabled: config.highlight.enabled,
        color: args.color.map(Into::into).unwrap_or(config.highlight.color),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    renderer::print_grid(&mut out, grid.rows(), highlight.as_ref(), style)?;
    Ok(())
}

/// Load the grid a `reveal` invocation asks for.
fn load_reveal_grid(config: &Config, args: &RevealArgs) -> Result<Arc<GlyphGrid>, ResolveError> {
    if let Some(image_path) = &args.image {
        let image = RasterImage::open(image_path)?;
        let options = SampleOptions {
            width: args.width,
            cell_aspect: config.sampler.cell_aspect,
            sample_factor: config.sampler.sample_factor,
            ramp: config.sampler.ramp,
        };
        return Ok(Arc::new(sample(&image, &options)?));
    }

    let asset_id = args.asset.as_deref().unwrap_or_default();
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(|| config.precompute.output.clone());
    let catalog = if catalog_path.exists() {
        PrecomputedCatalog::load(&catalog_path).unwrap_or_else(|e| {
            log::warn!("Ignoring catalog: {}", e);
            PrecomputedCatalog::new()
        })
    } else {
        log::debug!("No catalog at {}", catalog_path.display());
        PrecomputedCatalog::new()
    };

    let converter = RuntimeConverter::new(config.precompute.asset_root.clone());
    let mut resolver = GridResolver::new(catalog, converter);
    for spec in config.asset_specs() {
        resolver.register(spec);
    }
    let resolved = resolver.resolve(asset_id, args.width)?;
    log::debug!(
        "Resolved {} width={} from {:?} (effective width {})",
        asset_id,
        args.width,
        resolved.origin,
        resolved.effective_width
    );
    Ok(resolved.grid)
}

/// Play a reveal in the terminal.
pub fn run_reveal(config: &Config, args: &RevealArgs) -> Result<(), CommandError> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut reveal_config = config.reveal_config();
    if let Some(duration) = args.duration {
        reveal_config.duration_secs = duration;
    }
    if let Some(stagger) = args.stagger {
        reveal_config.stagger_factor = stagger;
    }

    let mode = match args.mode {
        RevealMode::Decode => ViewMode::Reveal,
        RevealMode::Hydrate => ViewMode::Static,
    };
    let mut view = AsciiView::new(reveal_config, StdRng::from_rng(&mut rng)).with_mode(mode);
    let ticket = view.request();
    let grid = load_reveal_grid(config, args)?;
    view.resolve::<ResolveError>(ticket, Ok(Arc::clone(&grid)));

    setup_ctrlc_handler()?;
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    renderer::clear_screen(&mut out)?;

    let completed = match args.mode {
        RevealMode::Decode => play_decode(&mut view, &mut out, frame_time)?,
        RevealMode::Hydrate => play_hydrate(&grid, &mut rng, &mut out, frame_time)?,
    };
    if completed {
        if let Some(secs) = args.flicker.filter(|s| *s > 0.0) {
            play_flicker(&grid, secs, &mut rng, &mut out, frame_time)?;
        }
    }

    view.teardown();
    renderer::finish(&mut out)?;
    Ok(())
}

/// Seconds since `last`, resetting it to now.
fn frame_delta(last: &mut Instant) -> f32 {
    let now = Instant::now();
    let delta = now.duration_since(*last).as_secs_f32();
    *last = now;
    delta
}

/// Returns false when interrupted.
fn play_decode<R: Rng, W: Write>(
    view: &mut AsciiView<R>,
    out: &mut W,
    frame_time: Duration,
) -> Result<bool, CommandError> {
    renderer::render_lines(out, view.rows())?;
    let mut last = Instant::now();
    loop {
        if ctrlc_received() {
            view.teardown();
            return Ok(false);
        }
        thread::sleep(frame_time);
        let delta = frame_delta(&mut last);
        match view.tick(delta) {
            Some(rows) => renderer::render_lines(out, rows)?,
            None => break,
        }
    }
    renderer::render_lines(out, view.rows())?;
    Ok(true)
}

fn play_hydrate<W: Write>(
    grid: &GlyphGrid,
    rng: &mut StdRng,
    out: &mut W,
    frame_time: Duration,
) -> Result<bool, CommandError> {
    let mut scramble = ScrambleText::new(grid.to_text(), ScrambleConfig::HYDRATION, &mut *rng);
    let mut last = Instant::now();
    while !scramble.is_complete() {
        if ctrlc_received() {
            return Ok(false);
        }
        thread::sleep(frame_time);
        let delta = Duration::from_secs_f32(frame_delta(&mut last));
        if let Some(display) = scramble.tick(delta) {
            let lines: Vec<&str> = display.lines().collect();
            renderer::render_lines(out, &lines)?;
        }
    }
    Ok(true)
}

fn play_flicker<W: Write>(
    grid: &GlyphGrid,
    secs: f32,
    rng: &mut StdRng,
    out: &mut W,
    frame_time: Duration,
) -> Result<(), CommandError> {
    let mut board = FlickerBoard::new(grid, rng);
    let mut last = Instant::now();
    while board.elapsed_secs() < secs && !ctrlc_received() {
        thread::sleep(frame_time);
        let delta = frame_delta(&mut last);
        let Some(frames) = board.tick(delta) else {
            break;
        };
        let lines: Vec<String> = grid
            .rows()
            .iter()
            .zip(&frames)
            .map(|(row, frame)| renderer::paint_flicker_row(row, frame))
            .collect();
        renderer::render_lines(out, &lines)?;
    }
    board.stop();
    renderer::render_lines(out, grid.rows())?;
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    config: &Config,
    config_path: Option<&Path>,
    action: &ConfigAction,
) -> Result<(), CommandError> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(CommandError::ConfigExists(path));
            }
            write_default_config(&path)?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}

fn write_default_config(path: &Path) -> Result<(), CommandError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CommandError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(|e| CommandError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
