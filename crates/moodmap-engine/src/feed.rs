//! Line-delimited JSON live feed.
//!
//! Each line is one message, tagged by `kind`:
//!
//! ```text
//! {"kind":"observation","user_id":"...","emotion":"joy","intensity":5,"address":"서울 강남구","observed_at":"..."}
//! {"kind":"zoom","zoom":11.5}
//! ```
//!
//! Observations become Append events and zoom messages become viewport
//! changes. Blank lines are ignored; malformed lines are logged and
//! skipped without stopping the feed.

use moodmap_core::runner::MergeEvent;
use moodmap_types::Observation;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One message on the live feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedMessage {
    /// A new observation to append.
    Observation(Observation),
    /// The viewport zoom changed.
    Zoom {
        /// New zoom level.
        zoom: f64,
    },
}

impl From<FeedMessage> for MergeEvent {
    fn from(message: FeedMessage) -> Self {
        match message {
            FeedMessage::Observation(observation) => Self::Append(observation),
            FeedMessage::Zoom { zoom } => Self::Zoom(zoom),
        }
    }
}

/// Parse one feed line. `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<FeedMessage>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Counters for a finished feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Lines forwarded as events.
    pub forwarded: u64,
    /// Lines that failed to parse.
    pub skipped: u64,
}

/// Read `reader` line by line and forward each message as a merge event.
///
/// Returns at end of input, on a read error, or once the merge loop has
/// hung up.
pub async fn read_feed<R>(reader: R, events: mpsc::Sender<MergeEvent>) -> FeedStats
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = FeedStats::default();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!(
                    forwarded = stats.forwarded,
                    skipped = stats.skipped,
                    "Live feed reached end of input"
                );
                return stats;
            }
            Err(e) => {
                warn!(error = %e, "Live feed read failed, stopping");
                return stats;
            }
        };

        let message = match parse_line(&line) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(e) => {
                stats.skipped = stats.skipped.saturating_add(1);
                warn!(error = %e, "Skipping malformed feed line");
                continue;
            }
        };

        let event = MergeEvent::from(message);
        debug!(kind = event.kind(), "Feed message received");
        if events.send(event).await.is_err() {
            info!("Merge loop closed, live feed stopping");
            return stats;
        }
        stats.forwarded = stats.forwarded.saturating_add(1);
    }
}
