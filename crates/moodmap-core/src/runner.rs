//! Merge loop runner.
//!
//! This module provides [`run_merge_loop`], the async function that owns
//! the [`LiveMergeController`] for the lifetime of the process. Producers
//! (snapshot poller, live feed, viewport) never touch the controller
//! directly; they send [`MergeEvent`]s over a bounded channel and the loop
//! applies them one at a time, so no two rebuilds ever interleave.
//!
//! The loop ends when every sender has been dropped or when shutdown is
//! signalled.

use std::sync::Arc;

use moodmap_types::{ClusterSet, Observation};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::live::LiveMergeController;

/// A state transition request for the controller.
#[derive(Debug, Clone)]
pub enum MergeEvent {
    /// Replace the whole working set with a fresh snapshot.
    Replace(Vec<Observation>),
    /// Append one live observation.
    Append(Observation),
    /// The viewport zoom changed.
    Zoom(f64),
}

impl MergeEvent {
    /// Short name for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Replace(_) => "replace",
            Self::Append(_) => "append",
            Self::Zoom(_) => "zoom",
        }
    }
}

/// Why the merge loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEndReason {
    /// Every event sender was dropped.
    ChannelClosed,
    /// Shutdown was signalled.
    Shutdown,
}

/// Result of a merge loop run.
#[derive(Debug)]
pub struct MergeLoopResult {
    /// Why the loop stopped.
    pub end_reason: LoopEndReason,
    /// Total events received.
    pub total_events: u64,
    /// Events that produced a new cluster set.
    pub recomputations: u64,
    /// The last published cluster set, if any.
    pub final_clusters: Option<Arc<ClusterSet>>,
}

/// Apply a single event to the controller.
///
/// Returns the new cluster set, or `None` for a zoom change that stayed
/// within the current granularity.
pub fn apply(controller: &mut LiveMergeController, event: MergeEvent) -> Option<Arc<ClusterSet>> {
    match event {
        MergeEvent::Replace(snapshot) => Some(controller.replace(snapshot)),
        MergeEvent::Append(observation) => Some(controller.append(observation)),
        MergeEvent::Zoom(zoom) => controller.set_zoom(zoom),
    }
}

/// Drain `events` into `controller` until the channel closes or
/// `shutdown` flips to `true`.
///
/// Events already queued when shutdown is signalled are discarded.
pub async fn run_merge_loop(
    controller: &mut LiveMergeController,
    mut events: mpsc::Receiver<MergeEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> MergeLoopResult {
    let mut total_events: u64 = 0;
    let mut recomputations: u64 = 0;

    info!(
        granularity = %controller.granularity(),
        zoom = controller.zoom(),
        "Merge loop starting"
    );

    let end_reason = loop {
        if *shutdown.borrow() {
            break LoopEndReason::Shutdown;
        }

        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() {
                    // Shutdown sender gone; keep draining events.
                    warn!("Shutdown signal dropped, running until the event channel closes");
                    break drain(controller, &mut events, &mut total_events, &mut recomputations).await;
                }
            }

            event = events.recv() => {
                let Some(event) = event else {
                    break LoopEndReason::ChannelClosed;
                };
                total_events = total_events.saturating_add(1);
                if apply(controller, event).is_some() {
                    recomputations = recomputations.saturating_add(1);
                }
            }
        }
    };

    MergeLoopResult {
        end_reason,
        total_events,
        recomputations,
        final_clusters: controller.latest(),
    }
}

/// Apply events until the channel closes, ignoring shutdown.
async fn drain(
    controller: &mut LiveMergeController,
    events: &mut mpsc::Receiver<MergeEvent>,
    total_events: &mut u64,
    recomputations: &mut u64,
) -> LoopEndReason {
    while let Some(event) = events.recv().await {
        *total_events = total_events.saturating_add(1);
        if apply(controller, event).is_some() {
            *recomputations = recomputations.saturating_add(1);
        }
    }
    LoopEndReason::ChannelClosed
}

/// Log the end of a merge loop run.
pub fn log_loop_end(result: &MergeLoopResult) {
    info!(
        reason = ?result.end_reason,
        total_events = result.total_events,
        recomputations = result.recomputations,
        final_revision = result.final_clusters.as_ref().map(|s| s.revision),
        final_clusters = result.final_clusters.as_ref().map(|s| s.clusters.len()),
        "Merge loop ended"
    );
    if result.final_clusters.is_none() {
        warn!("Merge loop ended before any clusters were built");
    }
}
