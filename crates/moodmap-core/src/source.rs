//! Snapshot source trait and a fixed in-memory implementation.
//!
//! The merge loop periodically asks a [`SnapshotSource`] for the full
//! current observation set and feeds it in as a Replace. Where the data
//! comes from (a file, a database export, a test fixture) is up to the
//! implementation. A failed load never empties the map: the caller logs
//! the error and keeps the last working set.

use std::future::Future;
use std::path::PathBuf;

use moodmap_types::Observation;

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The snapshot could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        /// Where the snapshot was read from.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot was read but could not be decoded.
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        /// Where the snapshot was read from.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// A source of full observation snapshots.
pub trait SnapshotSource {
    /// Load every observation currently known upstream.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the snapshot cannot be read or decoded.
    fn load_snapshot(&mut self) -> impl Future<Output = Result<Vec<Observation>, SourceError>> + Send;
}

/// A snapshot source that always returns the same observations.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotSource {
    observations: Vec<Observation>,
}

impl StaticSnapshotSource {
    /// Create a source that returns `observations` on every load.
    pub const fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl SnapshotSource for StaticSnapshotSource {
    async fn load_snapshot(&mut self) -> Result<Vec<Observation>, SourceError> {
        Ok(self.observations.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use moodmap_types::{EmotionCategory, Intensity, UserId};

    use super::*;

    #[tokio::test]
    async fn static_source_repeats_its_snapshot() {
        let record = Observation {
            user_id: UserId::new(),
            emotion: EmotionCategory::Gratitude,
            intensity: Intensity::new(7).unwrap(),
            address: "세종".to_owned(),
            observed_at: Utc::now(),
        };
        let mut source = StaticSnapshotSource::new(vec![record]);
        for _ in 0..2 {
            let snapshot = source.load_snapshot().await.unwrap();
            assert_eq!(snapshot.len(), 1);
        }
    }

    #[tokio::test]
    async fn empty_source_is_valid() {
        let mut source = StaticSnapshotSource::default();
        assert!(source.load_snapshot().await.unwrap().is_empty());
    }

    #[test]
    fn errors_name_the_path() {
        let err = SourceError::Io {
            path: PathBuf::from("data/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("data/missing.json"));
    }
}
