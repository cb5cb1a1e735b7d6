//! blink-favicon - render the animated eye favicon from the command line.
//!
//! Writes each frame to a PNG file and/or prints its data URI, until a frame
//! limit is reached or Ctrl-C is pressed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blink_favicon::animator::FaviconAnimator;
use blink_favicon::config::Config;
use blink_favicon::frame_loop::{FrameLoop, Shutdown};
use blink_favicon::sink::{PngFileSink, UriWriter};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// blink-favicon: animated blinking-eye favicon renderer
#[derive(Parser, Debug)]
#[command(name = "blink-favicon")]
#[command(version)]
#[command(about = "Render the blinking-eye favicon as PNG frames or data URIs", long_about = None)]
struct Cli {
    /// Config file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Write every frame to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print every frame's data URI on stdout
    #[arg(long)]
    print_uri: bool,

    /// Seed for reproducible blink timing
    #[arg(long)]
    seed: Option<u64>,

    /// Frame period in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Log phase transitions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "blink_favicon=debug"
    } else {
        "blink_favicon=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(frame_ms) = cli.frame_ms {
        config.frame_ms = frame_ms;
    }

    let mut animator = FaviconAnimator::from_config(&config).context("invalid configuration")?;

    let mut frame_loop = FrameLoop::from_config(&config);
    if let Some(frames) = cli.frames {
        frame_loop = frame_loop.with_max_frames(frames);
    }

    let shutdown = Shutdown::new();
    let on_ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.trigger();
        }
    });

    let mut sink = (
        cli.output.clone().map(PngFileSink::new),
        cli.print_uri.then(|| UriWriter::new(std::io::stdout())),
    );

    let stats = frame_loop.run(&mut animator, &mut sink, &shutdown).await?;

    eprintln!(
        "{} frames ({} failed), {} blinks in {:.1}s",
        stats.rendered,
        stats.failed,
        animator.blinks(),
        stats.elapsed.as_secs_f64()
    );

    Ok(())
}
