//! Flick CLI
//!
//! Replay recorded mouse and touch input through the gesture handler and
//! spring animator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flick_animation::SpringCallbacks;
use flick_app::{FlickConfig, GestureSession, Trace};
use flick_core::Vec2;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "flick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gesture-driven spring animation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input trace
    Replay {
        /// Trace file (JSON)
        trace: PathBuf,

        /// Frames to keep running after the trace ends, until the spring rests
        #[arg(long, default_value = "600")]
        settle_frames: usize,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => FlickConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FlickConfig::default(),
    };

    match cli.command {
        Commands::Replay {
            trace,
            settle_frames,
        } => cmd_replay(&config, &trace, settle_frames),
        Commands::Config => cmd_config(&config),
    }
}

fn cmd_replay(config: &FlickConfig, path: &Path, settle_frames: usize) -> Result<()> {
    let trace =
        Trace::load(path).with_context(|| format!("Failed to load trace {}", path.display()))?;
    info!("Replaying {} steps from {}", trace.steps.len(), path.display());

    let callbacks = SpringCallbacks::new()
        .on_start(|| info!("fling started"))
        .on_update(|motion| debug!(motion, "motion value"))
        .on_complete(|| info!("spring at rest"));
    let mut session = GestureSession::new(config, callbacks, |offset: Vec2| {
        debug!("translate {offset}")
    })?;

    let summary = trace.replay(&mut session).context("Replay failed")?;
    let settled = session
        .run_until_idle(settle_frames)
        .context("Spring failed while settling")?;

    let spring = session.spring();
    let spring = spring.borrow();
    info!(
        events = summary.events,
        ignored = summary.ignored,
        frames = summary.frames + settled,
        "Replay finished at {}",
        spring.current()
    );
    if session.is_active() {
        info!("Still animating after {settled} extra frames");
    }
    Ok(())
}

fn cmd_config(config: &FlickConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{text}");
    Ok(())
}
