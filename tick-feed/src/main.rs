//! Command-line front end of the synthetic tick feed.
//!
//! Generates the configured run and writes it to stdout as JSON lines, one
//! `TickRow` per line, in emission order.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::Write;
use std::path::PathBuf;
use tick_feed::{FeedConfig, TickGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON feed configuration (defaults to the built-in universe)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the random source, for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated seconds to generate
    #[arg(long)]
    duration: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FeedConfig::load(path)?,
        None => FeedConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(duration) = args.duration {
        config = config.with_duration(duration);
    }

    info!(
        "Generating {} seconds for {} instruments",
        config.duration_secs,
        config.instrument_count()
    );

    let rows = TickGenerator::from_config(&config).run();

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    for row in &rows {
        serde_json::to_writer(&mut out, row).context("Failed to serialize row")?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!("Wrote {} rows", rows.len());
    Ok(())
}
