//! Command-line arguments of the table server.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tick_feed::FeedConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port to listen on for HTTP and websocket clients
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Directory of the client application, served for every unrouted path
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Name of the hosted tick table
    #[arg(long, default_value = "report")]
    pub table: String,

    /// Path to a JSON feed configuration (defaults to the built-in universe)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed of the random source; overrides the configuration file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of simulated seconds; overrides the configuration file
    #[arg(long)]
    pub duration: Option<u32>,

    /// Milliseconds between streamed seconds. 0 loads the whole run as one batch.
    #[arg(long, default_value_t = 0)]
    pub interval_ms: u64,
}

impl Args {
    /// Resolves the feed configuration: file (or defaults), then CLI overrides.
    pub fn feed_config(&self) -> Result<FeedConfig> {
        let mut config = match &self.config {
            Some(path) => FeedConfig::load(path)?,
            None => FeedConfig::default(),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(duration) = self.duration {
            config = config.with_duration(duration);
        }
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["table-server"]);
        assert_eq!(args.port, 8080);
        assert_eq!(args.table, "report");
        assert!(args.interval().is_zero());

        let config = args.feed_config().unwrap();
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "table-server",
            "--port",
            "9000",
            "--seed",
            "3",
            "--duration",
            "10",
            "--interval-ms",
            "250",
        ]);
        assert_eq!(args.port, 9000);
        assert_eq!(args.interval(), Duration::from_millis(250));

        let config = args.feed_config().unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.duration_secs, 10);
    }
}
