//! JSON-file snapshot source and the polling task that drives it.
//!
//! The snapshot file holds a JSON array of observations. It is re-read
//! from disk on every poll so an upstream exporter can overwrite it in
//! place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use moodmap_core::runner::MergeEvent;
use moodmap_core::source::{SnapshotSource, SourceError};
use moodmap_types::Observation;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Loads observation snapshots from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotSource {
    path: PathBuf,
}

impl JsonFileSnapshotSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonFileSnapshotSource {
    async fn load_snapshot(&mut self) -> Result<Vec<Observation>, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// Pull a snapshot every `interval` and forward it as a Replace.
///
/// The first pull happens immediately. A failed pull is logged and
/// skipped, which leaves the controller's working set untouched. Returns
/// once the merge loop has hung up.
pub async fn poll_snapshots<S>(mut source: S, interval: Duration, events: mpsc::Sender<MergeEvent>)
where
    S: SnapshotSource + Send,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let snapshot = match source.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Snapshot load failed, keeping last working set");
                continue;
            }
        };

        debug!(observations = snapshot.len(), "Snapshot loaded");
        if events.send(MergeEvent::Replace(snapshot)).await.is_err() {
            info!("Merge loop closed, snapshot poller stopping");
            return;
        }
    }
}
