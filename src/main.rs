//! # GCS Telemetry
//!
//! Headless telemetry feed for the ground-control dashboard.
//!
//! Runs the simulated telemetry engine at a fixed tick rate and writes every
//! frame to stdout as one JSON line, for a dashboard front end to consume.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use gcs_telemetry::config::Config;
use gcs_telemetry::driver::TelemetryDriver;
use gcs_telemetry::telemetry::generator::RandomWalk;
use gcs_telemetry::telemetry::store::Store;

/// Main entry point for the telemetry feed
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber (stderr)
///    - Load configuration from the path given as the first argument, or
///      use the built-in dashboard defaults
///    - Build the store with every window pre-filled to its baseline and
///      every composite given its starting value
///
/// 2. **Main Loop**
///    - Tick all channels every `tick_interval_ms` (250ms by default)
///    - Write each frame as a JSON line to stdout
///    - Log channel status every `status_interval_ticks` ticks
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop the tick loop
///    - Flush the feed and log the total tick count
///
/// # Errors
///
/// Returns error if the configuration cannot be loaded or is invalid.
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml > frames.jsonl
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("GCS Telemetry v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref())?;

    if let Some(seed) = config.telemetry.seed {
        info!("Using fixed seed {}", seed);
    }
    let mut source = RandomWalk::new(config.telemetry.seed);

    let store = Store::new(config.channel_specs(), config.composite_specs(), &mut source)
        .context("failed to initialize telemetry store")?;
    info!(
        "Initialized {} channels ({} windowed, {} composite)",
        store.len(),
        store.windowed().count(),
        store.composites().count()
    );

    let driver = TelemetryDriver::new(store, Box::new(source), config.tick_interval())
        .context("failed to start telemetry driver")?
        .with_status_interval(config.telemetry.status_interval_ticks);
    let mut frames = driver.subscribe();

    // Frame feed: ends when the driver drops its sender
    let feed = tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            let mut out = std::io::stdout().lock();
            let written = serde_json::to_writer(&mut out, &frame)
                .map_err(std::io::Error::from)
                .and_then(|()| writeln!(out));

            if let Err(e) = written {
                warn!("Frame feed closed: {}", e);
                break;
            }
            debug!("Wrote frame {}", frame.tick);
        }
    });

    info!("Press Ctrl+C to exit");

    let ticks = driver
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    feed.await.context("frame feed task failed")?;
    info!("Stopped after {} ticks", ticks);

    Ok(())
}

/// Loads the configuration file at `path`, or the defaults when absent.
fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(path).with_context(|| format!("failed to load configuration from {}", path))
        }
        None => {
            info!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let err = load_config(Some("/nonexistent/gcs.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gcs.toml"));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_tick_period() {
        // 250ms ticks = 4 frames per second
        let config = Config::default();
        assert_eq!(config.tick_interval().as_millis(), 250);
        assert_eq!(1000 / config.telemetry.tick_interval_ms, 4);
    }
}
