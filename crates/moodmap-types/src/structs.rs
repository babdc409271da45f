//! Core record types for the Moodmap emotional weather map.
//!
//! [`Observation`] is the only externally supplied record. Everything else
//! here is derived by the clustering engine and rebuilt from scratch on
//! every recomputation: [`ParsedAddress`] per observation, [`Cluster`] per
//! address group, and [`ClusterSet`] per published pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EmotionCategory, Granularity, RecomputeTrigger};
use crate::ids::UserId;

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

/// How strongly an emotion is felt, on a closed `1..=10` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u8", into = "u8")]
#[ts(export, export_to = "bindings/")]
pub struct Intensity(u8);

impl Intensity {
    /// Weakest reportable intensity.
    pub const MIN: Self = Self(1);
    /// Strongest reportable intensity.
    pub const MAX: Self = Self(10);

    /// Validate and wrap a raw intensity.
    ///
    /// # Errors
    ///
    /// Returns [`IntensityError`] if `value` is outside `1..=10`.
    pub const fn new(value: u8) -> Result<Self, IntensityError> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(IntensityError(value))
        }
    }

    /// The raw `1..=10` value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// An intensity outside `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("intensity must be between 1 and 10 (got {0})")]
pub struct IntensityError(pub u8);

impl TryFrom<u8> for Intensity {
    type Error = IntensityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One emotional weather reading broadcast by a user.
///
/// Observations are immutable once received. The engine never edits or
/// removes one; it only appends to, or wholesale replaces, its working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Observation {
    /// Who broadcast the reading.
    pub user_id: UserId,
    /// The reported emotion.
    pub emotion: EmotionCategory,
    /// How strongly it is felt.
    pub intensity: Intensity,
    /// Free-text address, most significant level first, space-delimited
    /// (e.g. `"서울 강남구 역삼동"`).
    pub address: String,
    /// When the user broadcast the reading.
    pub observed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Parsed address
// ---------------------------------------------------------------------------

/// An address split into its three administrative levels.
///
/// `level1` is never empty. `level2` and `level3` are empty strings when the
/// raw address had fewer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ParsedAddress {
    /// Top-level region (시/도), as written by the user.
    pub level1: String,
    /// District (시/군/구).
    pub level2: String,
    /// Neighbourhood (읍/면/동).
    pub level3: String,
    /// The unmodified input.
    pub raw: String,
}

impl ParsedAddress {
    /// The levels in order, most significant first.
    pub fn levels(&self) -> [&str; 3] {
        [&self.level1, &self.level2, &self.level3]
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Longitude in degrees east.
    pub lng: f64,
    /// Latitude in degrees north.
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude.
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Whether both components are bit-for-bit equal to `other`'s.
    pub const fn bitwise_eq(&self, other: &Self) -> bool {
        self.lng.to_bits() == other.lng.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

// ---------------------------------------------------------------------------
// Clusters
// ---------------------------------------------------------------------------

/// Accumulated count and summed intensity for one emotion within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmotionTally {
    /// The emotion being tallied.
    pub emotion: EmotionCategory,
    /// How many observations reported it.
    pub count: u32,
    /// Sum of their intensities.
    pub total_intensity: u32,
}

/// A group of observations sharing an address prefix, placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cluster {
    /// Composite grouping key (normalised region plus finer levels).
    pub key: String,
    /// Label shown on the pin.
    pub display_name: String,
    /// Granularity the cluster was built at.
    pub granularity: Granularity,
    /// Member observations in arrival order. Never empty.
    pub observations: Vec<Observation>,
    /// The winning emotion under the count-then-intensity rule.
    pub dominant_emotion: EmotionCategory,
    /// Number of members reporting the dominant emotion.
    pub dominant_count: u32,
    /// Summed intensity of the dominant emotion.
    pub dominant_total_intensity: u32,
    /// Mean intensity of all members, rounded half-up.
    pub average_intensity: u8,
    /// Per-emotion tallies in first-seen order.
    pub emotion_breakdown: Vec<EmotionTally>,
    /// Where the pin is drawn.
    pub coordinates: GeoPoint,
}

impl Cluster {
    /// Number of member observations.
    pub fn size(&self) -> usize {
        self.observations.len()
    }
}

/// One published recomputation: the full cluster list plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClusterSet {
    /// Monotonic counter, incremented on every recomputation.
    pub revision: u64,
    /// Granularity every cluster in the set was built at.
    pub granularity: Granularity,
    /// The transition that produced this set.
    pub trigger: RecomputeTrigger,
    /// Size of the working set the clusters were built from.
    pub observation_count: u64,
    /// Clusters in first-seen key order.
    pub clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Whether the map has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn intensity_bounds() {
        assert!(Intensity::new(0).is_err());
        assert_eq!(Intensity::new(1).unwrap(), Intensity::MIN);
        assert_eq!(Intensity::new(10).unwrap(), Intensity::MAX);
        assert_eq!(Intensity::new(11), Err(IntensityError(11)));
    }

    #[test]
    fn out_of_range_intensity_fails_to_deserialize() {
        let ok: Result<Intensity, _> = serde_json::from_str("7");
        assert_eq!(ok.unwrap().get(), 7);
        let too_big: Result<Intensity, _> = serde_json::from_str("42");
        assert!(too_big.is_err());
    }

    #[test]
    fn observation_json_shape() {
        let json = r#"{
            "user_id": "0192d8f6-6a2b-7cc0-8a3e-2b5f6c1d9e01",
            "emotion": "sadness",
            "intensity": 4,
            "address": "부산 해운대구",
            "observed_at": "2026-10-01T09:30:00Z"
        }"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.emotion, EmotionCategory::Sadness);
        assert_eq!(obs.intensity.get(), 4);
        assert_eq!(obs.address, "부산 해운대구");
    }

    #[test]
    fn geo_point_bitwise_eq() {
        let a = GeoPoint::new(126.978, 37.5665);
        let b = GeoPoint::new(126.978, 37.5665);
        let c = GeoPoint::new(126.978, 37.5666);
        assert!(a.bitwise_eq(&b));
        assert!(!a.bitwise_eq(&c));
    }

    #[test]
    fn parsed_address_levels() {
        let parsed = ParsedAddress {
            level1: "경기".to_owned(),
            level2: "수원시".to_owned(),
            level3: String::new(),
            raw: "경기 수원시".to_owned(),
        };
        assert_eq!(parsed.levels(), ["경기", "수원시", ""]);
    }
}
