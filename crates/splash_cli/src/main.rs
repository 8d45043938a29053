//! Splash CLI
//!
//! Run the cursor trail and the preloader against an off-screen surface
//! and inspect effect configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod preload;
mod simulate;

use simulate::{PointerPath, SimulateOptions};
use splash_cursor::SplashConfig;

#[derive(Parser)]
#[command(name = "splash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pointer-trail particle effects, run headless", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the cursor effect along a scripted pointer path
    Simulate {
        /// Effect config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frames to render
        #[arg(short, long, default_value = "300")]
        frames: u64,

        /// Frame rate of the simulated display
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Frames during which the pointer moves
        #[arg(long, default_value = "120")]
        move_frames: u64,

        /// Pointer path shape
        #[arg(short, long, value_enum, default_value = "circle")]
        path: PointerPath,

        /// Canvas width in logical pixels
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Canvas height in logical pixels
        #[arg(long, default_value = "720")]
        height: f32,

        /// Device pixel ratio
        #[arg(long, default_value = "2")]
        scale: f32,

        /// Largest backing-store dimension the host allows
        #[arg(long)]
        max_texture: Option<u32>,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the loading screen until it completes
    Preload {
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds between progress steps
        #[arg(long, default_value = "50")]
        tick_ms: f64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effect configuration as TOML
    Config {
        /// Config file to validate and print (defaults if omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            fps,
            move_frames,
            path,
            width,
            height,
            scale,
            max_texture,
            seed,
            json,
        } => {
            let options = SimulateOptions {
                config: load_config(config.as_deref())?,
                frames,
                fps,
                move_frames,
                path,
                width,
                height,
                scale,
                max_texture,
                seed,
            };
            cmd_simulate(options, json)
        }

        Commands::Preload {
            seed,
            tick_ms,
            json,
        } => cmd_preload(seed, tick_ms, json),

        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SplashConfig> {
    match path {
        Some(path) => SplashConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SplashConfig::default()),
    }
}

fn cmd_simulate(options: SimulateOptions, json: bool) -> Result<()> {
    info!(
        "Simulating {} frames at {} fps on a {}x{} canvas",
        options.frames, options.fps, options.width, options.height
    );
    let report = simulate::run(options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn cmd_preload(seed: Option<u64>, tick_ms: f64, json: bool) -> Result<()> {
    preload::check_tick_ms(tick_ms)?;
    let report = preload::run(seed, tick_ms);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn cmd_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let text = config
        .to_toml_string()
        .context("Failed to render config as TOML")?;
    print!("{}", text);
    Ok(())
}
