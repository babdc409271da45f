//! The single owner of the working observation set.
//!
//! [`LiveMergeController`] folds three kinds of event into one state:
//!
//! - **Replace**: a fresh snapshot swaps out the whole working set.
//! - **Append**: one live observation is pushed onto the end.
//! - **Regranularity**: the zoom crosses a threshold.
//!
//! Every transition that changes what the map should show triggers a full
//! rebuild of the cluster list from the entire working set. The result is
//! published as an immutable [`Arc<ClusterSet>`] so readers never observe a
//! half-built list. There is no incremental path and no diffing: listeners
//! are notified after every rebuild, even when nothing visibly changed.

use std::sync::Arc;

use moodmap_types::{ClusterSet, Granularity, Observation, RecomputeTrigger};
use tracing::debug;

use crate::cluster::ClusterBuilder;
use crate::config::MoodmapConfig;
use crate::zoom::{ZoomError, ZoomGranularityResolver};

/// Callback invoked after each recomputation.
///
/// Implementations forward the cluster set to whatever renders it.
pub trait ClusterListener: Send {
    /// Called with every freshly built cluster set.
    fn on_clusters(&mut self, clusters: &Arc<ClusterSet>);
}

/// A no-op listener for testing.
pub struct NoOpListener;

impl ClusterListener for NoOpListener {
    fn on_clusters(&mut self, _clusters: &Arc<ClusterSet>) {}
}

/// Owns the working set and the current viewport granularity.
pub struct LiveMergeController {
    builder: ClusterBuilder,
    resolver: ZoomGranularityResolver,
    working_set: Vec<Observation>,
    zoom: f64,
    granularity: Granularity,
    revision: u64,
    latest: Option<Arc<ClusterSet>>,
    listeners: Vec<Box<dyn ClusterListener>>,
}

impl LiveMergeController {
    /// Create a controller with an empty working set.
    pub fn new(resolver: ZoomGranularityResolver, initial_zoom: f64) -> Self {
        Self {
            builder: ClusterBuilder::new(),
            resolver,
            working_set: Vec::new(),
            zoom: initial_zoom,
            granularity: resolver.resolve(initial_zoom),
            revision: 0,
            latest: None,
            listeners: Vec::new(),
        }
    }

    /// Create a controller from the `zoom` and `viewport` config sections.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError`] if the configured thresholds are invalid.
    pub fn from_config(config: &MoodmapConfig) -> Result<Self, ZoomError> {
        let resolver = ZoomGranularityResolver::from_config(&config.zoom)?;
        Ok(Self::new(resolver, config.viewport.initial_zoom))
    }

    /// Register a listener to be notified after every recomputation.
    pub fn add_listener(&mut self, listener: Box<dyn ClusterListener>) {
        self.listeners.push(listener);
    }

    /// Swap the whole working set for `snapshot` and rebuild.
    pub fn replace(&mut self, snapshot: Vec<Observation>) -> Arc<ClusterSet> {
        debug!(
            previous = self.working_set.len(),
            incoming = snapshot.len(),
            "Replacing working set"
        );
        self.working_set = snapshot;
        self.recompute(RecomputeTrigger::Replace)
    }

    /// Append one live observation and rebuild.
    ///
    /// Observations are not deduplicated; a re-delivered record counts
    /// again.
    pub fn append(&mut self, observation: Observation) -> Arc<ClusterSet> {
        self.working_set.push(observation);
        self.recompute(RecomputeTrigger::Append)
    }

    /// Record a new zoom value.
    ///
    /// Rebuilds only if the zoom crossed into a different granularity;
    /// returns `None` otherwise.
    pub fn set_zoom(&mut self, zoom: f64) -> Option<Arc<ClusterSet>> {
        self.zoom = zoom;
        let granularity = self.resolver.resolve(zoom);
        if granularity == self.granularity {
            return None;
        }
        debug!(
            zoom,
            from = %self.granularity,
            to = %granularity,
            "Granularity changed"
        );
        self.granularity = granularity;
        Some(self.recompute(RecomputeTrigger::Regranularity))
    }

    /// Rebuild all clusters from the working set and notify listeners.
    fn recompute(&mut self, trigger: RecomputeTrigger) -> Arc<ClusterSet> {
        let clusters = self.builder.build(&self.working_set, self.granularity);
        self.revision = self.revision.saturating_add(1);

        let set = Arc::new(ClusterSet {
            revision: self.revision,
            granularity: self.granularity,
            trigger,
            observation_count: u64::try_from(self.working_set.len()).unwrap_or(u64::MAX),
            clusters,
        });

        debug!(
            revision = set.revision,
            ?trigger,
            granularity = %set.granularity,
            observations = set.observation_count,
            clusters = set.clusters.len(),
            "Clusters recomputed"
        );

        for listener in &mut self.listeners {
            listener.on_clusters(&set);
        }
        self.latest = Some(Arc::clone(&set));
        set
    }

    /// The working set in arrival order.
    pub fn working_set(&self) -> &[Observation] {
        &self.working_set
    }

    /// The granularity clusters are currently built at.
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The most recent zoom value received.
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Number of recomputations performed so far.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The last published cluster set, if any rebuild has happened.
    pub fn latest(&self) -> Option<Arc<ClusterSet>> {
        self.latest.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use moodmap_types::{EmotionCategory, Intensity, UserId};

    use super::*;

    fn obs(address: &str, emotion: EmotionCategory, intensity: u8) -> Observation {
        Observation {
            user_id: UserId::new(),
            emotion,
            intensity: Intensity::new(intensity).unwrap(),
            address: address.to_owned(),
            observed_at: Utc::now(),
        }
    }

    fn controller(initial_zoom: f64) -> LiveMergeController {
        LiveMergeController::new(ZoomGranularityResolver::default(), initial_zoom)
    }

    /// Records the revisions it was handed.
    struct Recorder(Arc<Mutex<Vec<u64>>>);

    impl ClusterListener for Recorder {
        fn on_clusters(&mut self, clusters: &Arc<ClusterSet>) {
            self.0.lock().unwrap().push(clusters.revision);
        }
    }

    #[test]
    fn starts_empty_at_initial_granularity() {
        let c = controller(10.0);
        assert!(c.working_set().is_empty());
        assert_eq!(c.granularity(), Granularity::District);
        assert_eq!(c.revision(), 0);
        assert!(c.latest().is_none());
    }

    #[test]
    fn replace_swaps_the_whole_set() {
        let mut c = controller(5.0);
        c.replace(vec![obs("서울", EmotionCategory::Joy, 3)]);
        let set = c.replace(vec![
            obs("부산", EmotionCategory::Anger, 4),
            obs("대구", EmotionCategory::Calm, 2),
        ]);
        assert_eq!(c.working_set().len(), 2);
        assert_eq!(set.trigger, RecomputeTrigger::Replace);
        assert_eq!(set.clusters.len(), 2);
        assert_eq!(set.clusters[0].key, "부산");
        assert_eq!(set.revision, 2);
    }

    #[test]
    fn append_preserves_arrival_order() {
        let mut c = controller(5.0);
        c.replace(vec![obs("서울", EmotionCategory::Joy, 3)]);
        c.append(obs("광주", EmotionCategory::Fear, 6));
        let set = c.append(obs("서울", EmotionCategory::Joy, 9));
        assert_eq!(set.trigger, RecomputeTrigger::Append);
        assert_eq!(set.observation_count, 3);
        assert_eq!(c.working_set()[1].address, "광주");
        assert_eq!(set.clusters[0].key, "서울");
        assert_eq!(set.clusters[0].size(), 2);
    }

    #[test]
    fn duplicates_are_counted_twice() {
        let mut c = controller(5.0);
        let record = obs("서울", EmotionCategory::Joy, 3);
        c.replace(vec![record.clone()]);
        let set = c.append(record);
        assert_eq!(set.clusters[0].size(), 2);
        assert_eq!(set.clusters[0].dominant_count, 2);
    }

    #[test]
    fn zoom_within_band_does_not_rebuild() {
        let mut c = controller(5.0);
        c.replace(vec![obs("서울 강남구", EmotionCategory::Joy, 3)]);
        assert!(c.set_zoom(6.0).is_none());
        assert!(c.set_zoom(8.9).is_none());
        assert_eq!(c.revision(), 1);
        assert!((c.zoom() - 8.9).abs() < f64::EPSILON);
    }

    #[test]
    fn zoom_across_threshold_rebuilds_existing_set() {
        let mut c = controller(5.0);
        c.replace(vec![
            obs("서울 강남구", EmotionCategory::Joy, 3),
            obs("서울 마포구", EmotionCategory::Calm, 3),
        ]);
        let set = c.set_zoom(10.0).unwrap();
        assert_eq!(set.trigger, RecomputeTrigger::Regranularity);
        assert_eq!(set.granularity, Granularity::District);
        assert_eq!(set.clusters.len(), 2);

        let back = c.set_zoom(3.0).unwrap();
        assert_eq!(back.granularity, Granularity::Region);
        assert_eq!(back.clusters.len(), 1);
    }

    #[test]
    fn listeners_fire_on_every_rebuild() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut c = controller(5.0);
        c.add_listener(Box::new(Recorder(Arc::clone(&seen))));
        c.add_listener(Box::new(NoOpListener));

        let record = obs("서울", EmotionCategory::Joy, 3);
        c.replace(vec![record.clone()]);
        // Identical result, still published.
        c.replace(vec![record]);
        c.set_zoom(5.5);
        c.set_zoom(13.0);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(c.latest().unwrap().revision, 3);
    }

    #[test]
    fn from_config_applies_viewport() {
        let mut config = MoodmapConfig::default();
        config.viewport.initial_zoom = 15.0;
        let c = LiveMergeController::from_config(&config).unwrap();
        assert_eq!(c.granularity(), Granularity::Neighborhood);
    }
}
