//! Grouping observations into placed, coloured map clusters.
//!
//! [`ClusterBuilder::build`] is a pure function of its inputs: the same
//! observations at the same granularity always produce the same keys,
//! labels, colours, and bit-identical coordinates. It never fails. An
//! address that names no known region simply contributes no cluster.

use std::collections::HashMap;

use moodmap_types::{Cluster, GeoPoint, Granularity, Observation};
use tracing::debug;

use crate::address;
use crate::aggregate;
use crate::region::RegionLocator;

/// Joins address levels into a composite cluster key.
pub const KEY_SEPARATOR: &str = "|";

/// Number of buckets each jitter axis is quantised into.
const JITTER_BUCKETS: u64 = 100;

/// Full width of the longitude jitter band, in degrees.
///
/// Sub-region pins land within +/- half of this around the region base.
pub const LNG_JITTER_SPAN_DEG: f64 = 0.30;

/// Full width of the latitude jitter band, in degrees.
pub const LAT_JITTER_SPAN_DEG: f64 = 0.20;

/// Additive character-code hash of a cluster key.
pub fn key_hash(key: &str) -> u64 {
    key.chars()
        .map(|c| u64::from(u32::from(c)))
        .fold(0, u64::wrapping_add)
}

/// Map a bucket index in `0..JITTER_BUCKETS` onto `[-span/2, span/2)`.
fn spread(bucket: u64, span: f64) -> f64 {
    let index = u32::try_from(bucket % JITTER_BUCKETS).unwrap_or(0);
    let buckets = u32::try_from(JITTER_BUCKETS).unwrap_or(1);
    (f64::from(index) / f64::from(buckets) - 0.5) * span
}

/// Deterministic pin position for a cluster.
///
/// Region-level pins sit exactly on the region base. Finer pins are
/// nudged by a key-derived offset so sibling districts of one region do
/// not stack on the same point.
pub fn placement(base: GeoPoint, key: &str, granularity: Granularity) -> GeoPoint {
    if granularity == Granularity::Region {
        return base;
    }
    let hash = key_hash(key);
    let lng = base.lng + spread(hash, LNG_JITTER_SPAN_DEG);
    let lat = base.lat + spread(hash / JITTER_BUCKETS, LAT_JITTER_SPAN_DEG);
    GeoPoint::new(lng, lat)
}

/// An in-progress group of observations sharing a key.
struct Group {
    key: String,
    display_name: String,
    region_key: String,
    members: Vec<Observation>,
}

/// Groups observations by address prefix and derives map clusters.
#[derive(Debug, Clone, Default)]
pub struct ClusterBuilder {
    locator: RegionLocator,
}

impl ClusterBuilder {
    /// Create a builder over the standard region table.
    pub fn new() -> Self {
        Self {
            locator: RegionLocator::new(),
        }
    }

    /// The region locator used for normalisation and placement.
    pub const fn locator(&self) -> &RegionLocator {
        &self.locator
    }

    /// Build the full cluster list for `observations` at `granularity`.
    ///
    /// Clusters come back in order of first appearance of their key.
    /// Region-level labels use the canonical short key (`서울`), not the
    /// spelling the user typed (`서울특별시`).
    pub fn build(&self, observations: &[Observation], granularity: Granularity) -> Vec<Cluster> {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for obs in observations {
            let parsed = address::parse(&obs.address);
            let region_key = self.locator.normalize(&parsed.level1);
            let levels = [region_key, parsed.level2.as_str(), parsed.level3.as_str()];
            let depth = granularity.depth();

            let key = levels
                .iter()
                .take(depth)
                .copied()
                .collect::<Vec<_>>()
                .join(KEY_SEPARATOR);

            if let Some(group) = index.get(&key).and_then(|&i| groups.get_mut(i)) {
                group.members.push(obs.clone());
                continue;
            }

            // Finest non-empty level at or above the granularity.
            let display_name = levels
                .iter()
                .take(depth)
                .rev()
                .find(|level| !level.is_empty())
                .copied()
                .unwrap_or(region_key)
                .to_owned();

            index.insert(key.clone(), groups.len());
            groups.push(Group {
                key,
                display_name,
                region_key: region_key.to_owned(),
                members: vec![obs.clone()],
            });
        }

        let group_count = groups.len();
        let clusters: Vec<Cluster> = groups
            .into_iter()
            .filter_map(|group| self.finish(group, granularity))
            .collect();

        debug!(
            observations = observations.len(),
            %granularity,
            groups = group_count,
            clusters = clusters.len(),
            dropped = group_count.saturating_sub(clusters.len()),
            "Clusters built"
        );

        clusters
    }

    /// Place and aggregate one group. `None` if its region is unknown.
    fn finish(&self, group: Group, granularity: Granularity) -> Option<Cluster> {
        let base = self.locator.coordinates_of(&group.region_key)?;
        let summary = aggregate::summarize(&group.members)?;
        let coordinates = placement(base, &group.key, granularity);
        Some(Cluster {
            key: group.key,
            display_name: group.display_name,
            granularity,
            observations: group.members,
            dominant_emotion: summary.dominant.emotion,
            dominant_count: summary.dominant.count,
            dominant_total_intensity: summary.dominant.total_intensity,
            average_intensity: summary.average_intensity,
            emotion_breakdown: summary.breakdown,
            coordinates,
        })
    }
}
