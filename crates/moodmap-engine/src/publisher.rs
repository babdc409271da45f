//! Fan-out of freshly built cluster sets.
//!
//! [`ClusterHub`] is registered on the controller as a listener. Each
//! published [`ClusterSet`] goes out on a broadcast channel for streaming
//! consumers and replaces the value in a watch channel for readers that
//! only want the latest map. Both carry the same `Arc`, so nothing is
//! copied per subscriber.

use std::sync::Arc;

use moodmap_core::live::ClusterListener;
use moodmap_types::ClusterSet;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Capacity of the broadcast channel for cluster sets.
///
/// A subscriber that falls further behind skips to the newest set.
const BROADCAST_CAPACITY: usize = 256;

/// Broadcast and latest-value channels for cluster sets.
#[derive(Debug, Clone)]
pub struct ClusterHub {
    tx: broadcast::Sender<Arc<ClusterSet>>,
    latest: watch::Sender<Option<Arc<ClusterSet>>>,
}

impl ClusterHub {
    /// Create a hub with no subscribers and no published set.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (latest, _) = watch::channel(None);
        Self { tx, latest }
    }

    /// Subscribe to every future cluster set.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ClusterSet>> {
        self.tx.subscribe()
    }

    /// Watch the most recent cluster set.
    pub fn watch(&self) -> watch::Receiver<Option<Arc<ClusterSet>>> {
        self.latest.subscribe()
    }

    /// The most recent cluster set, if one has been published.
    pub fn latest(&self) -> Option<Arc<ClusterSet>> {
        self.latest.borrow().clone()
    }

    /// Publish a cluster set to all subscribers.
    ///
    /// Returns the number of broadcast receivers reached. Zero is normal
    /// when nobody is streaming.
    pub fn publish(&self, clusters: &Arc<ClusterSet>) -> usize {
        self.latest.send_replace(Some(Arc::clone(clusters)));
        // send only fails when there are no receivers.
        self.tx.send(Arc::clone(clusters)).unwrap_or(0)
    }
}

impl Default for ClusterHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterListener for ClusterHub {
    fn on_clusters(&mut self, clusters: &Arc<ClusterSet>) {
        let receivers = self.publish(clusters);
        debug!(revision = clusters.revision, receivers, "Cluster set published");
    }
}

/// Logs a one-line summary of every cluster set.
#[derive(Debug, Default)]
pub struct SummaryLogger;

impl ClusterListener for SummaryLogger {
    fn on_clusters(&mut self, clusters: &Arc<ClusterSet>) {
        let largest = clusters.clusters.iter().max_by_key(|c| c.size());
        info!(
            revision = clusters.revision,
            trigger = ?clusters.trigger,
            granularity = %clusters.granularity,
            observations = clusters.observation_count,
            clusters = clusters.clusters.len(),
            largest = largest.map(|c| c.display_name.as_str()),
            largest_mood = largest.map(|c| c.dominant_emotion.label_en()),
            "Map updated"
        );
    }
}

/// Write each broadcast cluster set to `out` as one JSON line.
///
/// Returns when the hub is dropped or the writer fails.
pub async fn emit_json_lines<W>(mut rx: broadcast::Receiver<Arc<ClusterSet>>, mut out: W)
where
    W: AsyncWrite + Unpin,
{
    loop {
        let clusters = match rx.recv().await {
            Ok(clusters) => clusters,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Cluster output lagged, skipping to newest");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };

        let mut line = match serde_json::to_vec(clusters.as_ref()) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, revision = clusters.revision, "Failed to encode cluster set");
                continue;
            }
        };
        line.push(b'\n');

        if let Err(e) = out.write_all(&line).await {
            warn!(error = %e, "Cluster output closed, stopping");
            return;
        }
        if let Err(e) = out.flush().await {
            warn!(error = %e, "Cluster output flush failed, stopping");
            return;
        }
    }
}
