//! Moodmap engine binary.
//!
//! Wires the clustering core to its collaborators: a JSON snapshot file
//! polled on an interval, a live feed of observations and zoom changes on
//! stdin, and cluster sets written to stdout as JSON lines. Logs go to
//! stderr so stdout stays machine-readable.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `moodmap-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the live merge controller from the zoom and viewport config
//! 4. Register listeners (cluster hub, summary logger)
//! 5. Start the cluster output task
//! 6. Start the snapshot poller and the live feed
//! 7. Run the merge loop until input ends or Ctrl-C
//! 8. Log the result

mod error;
mod feed;
mod publisher;
mod snapshot;

use std::path::Path;
use std::time::Duration;

use moodmap_core::config::{LogFormat, LoggingConfig, MoodmapConfig};
use moodmap_core::live::LiveMergeController;
use moodmap_core::runner;
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::publisher::{ClusterHub, SummaryLogger};
use crate::snapshot::JsonFileSnapshotSource;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration or logging setup fails, or if a
/// background task panics.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so this is reported
    //    after step 2.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("moodmap-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        district_threshold = config.zoom.district_threshold,
        neighborhood_threshold = config.zoom.neighborhood_threshold,
        initial_zoom = config.viewport.initial_zoom,
        snapshot_path = %config.snapshot.path.display(),
        poll_interval_secs = config.snapshot.poll_interval_secs,
        channel_capacity = config.live.channel_capacity,
        "Configuration loaded"
    );

    // 3. Create the controller.
    let mut controller = LiveMergeController::from_config(&config).map_err(EngineError::from)?;
    info!(granularity = %controller.granularity(), "Merge controller initialized");

    // 4. Register listeners.
    let hub = ClusterHub::new();
    let output_rx = hub.subscribe();
    controller.add_listener(Box::new(hub));
    controller.add_listener(Box::new(SummaryLogger));

    // 5. Cluster output. Ends when the controller, and with it the hub,
    //    is dropped.
    let output_handle = tokio::spawn(publisher::emit_json_lines(output_rx, tokio::io::stdout()));

    // 6. Producers.
    let (events_tx, events_rx) = mpsc::channel(config.live.channel_capacity);

    let source = JsonFileSnapshotSource::new(config.snapshot.path.clone());
    let interval = Duration::from_secs(config.snapshot.poll_interval_secs);
    info!(path = %source.path().display(), "Snapshot poller starting");
    let poller_handle = tokio::spawn(snapshot::poll_snapshots(source, interval, events_tx.clone()));

    let feed_handle = tokio::spawn(feed::read_feed(
        BufReader::new(tokio::io::stdin()),
        events_tx,
    ));
    info!("Live feed started on stdin");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
        let _ = shutdown_tx.send(true);
    });

    // 7. Run the merge loop. The poller holds a sender forever, so in
    //    practice this returns on shutdown.
    let result = runner::run_merge_loop(&mut controller, events_rx, shutdown_rx).await;

    // 8. Log results and stop producers.
    runner::log_loop_end(&result);
    poller_handle.abort();
    feed_handle.abort();
    drop(controller);
    output_handle.await.map_err(EngineError::from)?;

    info!(
        end_reason = ?result.end_reason,
        total_events = result.total_events,
        "moodmap-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `moodmap-config.yaml` in the working directory.
///
/// Returns the config and whether it came from the file.
fn load_config() -> Result<(MoodmapConfig, bool), EngineError> {
    let config_path = Path::new("moodmap-config.yaml");
    if config_path.exists() {
        let config = MoodmapConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = MoodmapConfig::default();
        config.snapshot.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
