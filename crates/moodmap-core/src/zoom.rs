//! Zoom level to cluster granularity mapping.
//!
//! The map's zoom is a continuous value; clustering needs one of three
//! discrete depths. [`ZoomGranularityResolver::resolve`] is a step function
//! over two thresholds and is total over `f64`, including NaN and the
//! infinities.

use moodmap_types::Granularity;

use crate::config::ZoomConfig;

/// Default zoom at which region pins split into districts.
///
/// Web-map zoom levels: 7-8 shows the whole peninsula, 9 a single 도.
pub const DEFAULT_DISTRICT_ZOOM: f64 = 9.0;

/// Default zoom at which district pins split into neighbourhoods.
pub const DEFAULT_NEIGHBORHOOD_ZOOM: f64 = 12.0;

/// Threshold pair rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ZoomError {
    /// A threshold is NaN or infinite.
    #[error("zoom threshold `{name}` must be finite (got {value})")]
    NonFinite {
        /// Which threshold.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The district threshold is not strictly below the neighbourhood one.
    #[error(
        "district threshold ({district}) must be below neighborhood threshold ({neighborhood})"
    )]
    OutOfOrder {
        /// Configured district threshold.
        district: f64,
        /// Configured neighbourhood threshold.
        neighborhood: f64,
    },
}

/// Maps a zoom value to a [`Granularity`] using two fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomGranularityResolver {
    district_threshold: f64,
    neighborhood_threshold: f64,
}

impl ZoomGranularityResolver {
    /// Build a resolver from explicit thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError`] unless both thresholds are finite and
    /// `district < neighborhood`.
    pub fn new(district: f64, neighborhood: f64) -> Result<Self, ZoomError> {
        if !district.is_finite() {
            return Err(ZoomError::NonFinite {
                name: "district_threshold",
                value: district,
            });
        }
        if !neighborhood.is_finite() {
            return Err(ZoomError::NonFinite {
                name: "neighborhood_threshold",
                value: neighborhood,
            });
        }
        if district >= neighborhood {
            return Err(ZoomError::OutOfOrder {
                district,
                neighborhood,
            });
        }
        Ok(Self {
            district_threshold: district,
            neighborhood_threshold: neighborhood,
        })
    }

    /// Build a resolver from the `zoom` config section.
    ///
    /// # Errors
    ///
    /// See [`ZoomGranularityResolver::new`].
    pub fn from_config(config: &ZoomConfig) -> Result<Self, ZoomError> {
        Self::new(config.district_threshold, config.neighborhood_threshold)
    }

    /// Resolve a zoom value to a granularity.
    ///
    /// `zoom < T1` is region, `T1 <= zoom < T2` district, `zoom >= T2`
    /// neighbourhood. NaN resolves to region.
    pub fn resolve(&self, zoom: f64) -> Granularity {
        if zoom.is_nan() || zoom < self.district_threshold {
            Granularity::Region
        } else if zoom < self.neighborhood_threshold {
            Granularity::District
        } else {
            Granularity::Neighborhood
        }
    }

    /// Zoom at which districts appear.
    pub const fn district_threshold(&self) -> f64 {
        self.district_threshold
    }

    /// Zoom at which neighbourhoods appear.
    pub const fn neighborhood_threshold(&self) -> f64 {
        self.neighborhood_threshold
    }
}

impl Default for ZoomGranularityResolver {
    fn default() -> Self {
        Self {
            district_threshold: DEFAULT_DISTRICT_ZOOM,
            neighborhood_threshold: DEFAULT_NEIGHBORHOOD_ZOOM,
        }
    }
}
