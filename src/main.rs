//! MargaNav - steer toward free space from a camera stream
//!
//! Usage:
//!   marga-nav --config configs/marga.toml
//!   marga-nav --images recordings/hallway --snapshot out/hallway.png
//!   marga-nav --synthetic --max-frames 200 --no-keyboard
//!   marga-nav --config configs/marga.toml --source images
//!
//! Enable per-frame decision logging:
//!   RUST_LOG=debug marga-nav --synthetic

use std::path::PathBuf;

use clap::Parser;

use marga_nav::config::{Config, OverlayStyleName, SourceKind};
use marga_nav::control::{SignalControl, setup_ctrl_c_handler};
use marga_nav::error::{Error, Result};
use marga_nav::sink::LogSink;
use marga_nav::{Command, Runner, create_source};

/// Camera free-space scanner and direction controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame source kind: synthetic (mock) or images (sequence)
    #[arg(long)]
    source: Option<SourceKind>,

    /// Read frames from this directory of images
    #[arg(long, conflicts_with = "synthetic")]
    images: Option<PathBuf>,

    /// Use the synthetic camera
    #[arg(long)]
    synthetic: bool,

    /// Stop after this many frames (0 = unlimited)
    #[arg(long)]
    max_frames: Option<u64>,

    /// Snapshot output file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Overlay style: path_planning or obstacle_avoidance
    #[arg(long, value_parser = parse_style)]
    style: Option<OverlayStyleName>,

    /// Ignore keyboard commands on stdin
    #[arg(long)]
    no_keyboard: bool,
}

fn parse_style(s: &str) -> std::result::Result<OverlayStyleName, String> {
    match s {
        "path_planning" | "path-planning" => Ok(OverlayStyleName::PathPlanning),
        "obstacle_avoidance" | "obstacle-avoidance" => Ok(OverlayStyleName::ObstacleAvoidance),
        other => Err(format!("unknown overlay style '{}'", other)),
    }
}

/// Merge command line overrides into the loaded configuration.
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(kind) = args.source {
        config.source.kind = kind;
    }
    if let Some(dir) = &args.images {
        config.source.kind = SourceKind::Images;
        config.source.path = dir.clone();
    }
    if args.synthetic {
        config.source.kind = SourceKind::Synthetic;
    }
    if let Some(max_frames) = args.max_frames {
        config.control.max_frames = max_frames;
    }
    if let Some(path) = &args.snapshot {
        config.snapshot.path = Some(path.clone());
    }
    if let Some(style) = args.style {
        config.overlay.style = style;
    }
    if args.no_keyboard {
        config.control.keyboard = false;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    apply_args(&mut config, &args);
    config.validate()?;

    // Initialize logger
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("MargaNav v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => log::info!("Using config: {}", path.display()),
        None => log::info!("No config file given, using defaults"),
    }
    log::info!(
        "Scanner: {} slices, threshold {}, blur {}, {:?} pixels count as free",
        config.scanner.num_slices,
        config.scanner.threshold,
        config.scanner.blur_kernel,
        config.scanner.free_criterion
    );

    let mut runner = Runner::new(&config)?;

    let running = setup_ctrl_c_handler()?;
    let mut control = SignalControl::new(running);
    if config.control.keyboard {
        control = control.with_keyboard()?;
        println!("Press 'q' then Enter to quit.");
        println!(
            "Press 's' then Enter to save a snapshot to {}.",
            runner.snapshot_path().display()
        );
    }

    let source = create_source(&config.source).map_err(|e| match e {
        Error::DeviceUnavailable(reason) => {
            log::error!("Cannot open frame source: {}", reason);
            Error::DeviceUnavailable(reason)
        }
        other => other,
    })?;

    let mut sink = LogSink::new();
    let summary = runner.run(source, &mut sink, &mut control)?;

    log::info!(
        "Processed {} frames (left {}, forward {}, right {}), {} snapshots, stopped: {}",
        summary.frames_processed,
        summary.count(Command::Left),
        summary.count(Command::Forward),
        summary.count(Command::Right),
        summary.snapshots_saved,
        summary.stop_reason
    );
    log::info!("MargaNav stopped");
    Ok(())
}
