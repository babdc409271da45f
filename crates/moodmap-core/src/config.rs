//! Configuration loading and typed config structures for Moodmap.
//!
//! The canonical configuration lives in `moodmap-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::zoom::{
    DEFAULT_DISTRICT_ZOOM, DEFAULT_NEIGHBORHOOD_ZOOM, ZoomError, ZoomGranularityResolver,
};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Zoom thresholds are out of order or not finite.
    #[error("invalid zoom configuration: {source}")]
    Zoom {
        /// The underlying threshold error.
        #[from]
        source: ZoomError,
    },

    /// Any other semantically invalid value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Moodmap configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MoodmapConfig {
    /// Zoom thresholds for granularity selection.
    #[serde(default)]
    pub zoom: ZoomConfig,

    /// Initial viewport state.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Snapshot source and polling cadence.
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Live channel sizing.
    #[serde(default)]
    pub live: LiveConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MoodmapConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `MOODMAP_SNAPSHOT_PATH` overrides `snapshot.path` so deployments can
    /// point at a different export without editing the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error if values are out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.snapshot.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error if values are out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ZoomGranularityResolver::from_config(&self.zoom)?;
        if !self.viewport.initial_zoom.is_finite() {
            return Err(ConfigError::Invalid {
                reason: "viewport.initial_zoom must be finite".to_owned(),
            });
        }
        if self.snapshot.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "snapshot.poll_interval_secs must be at least 1".to_owned(),
            });
        }
        if self.live.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "live.channel_capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Zoom levels at which the map switches granularity.
///
/// Units are web-map zoom levels (larger is closer to the ground).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoomConfig {
    /// Zoom at or above which clusters split into districts.
    #[serde(default = "default_district_threshold")]
    pub district_threshold: f64,

    /// Zoom at or above which clusters split into neighbourhoods.
    #[serde(default = "default_neighborhood_threshold")]
    pub neighborhood_threshold: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            district_threshold: default_district_threshold(),
            neighborhood_threshold: default_neighborhood_threshold(),
        }
    }
}

/// Initial viewport state before the first zoom event arrives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    /// Zoom level the map opens at.
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_zoom: default_initial_zoom(),
        }
    }
}

/// Where snapshots come from and how often they are re-pulled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotConfig {
    /// JSON file holding an array of observations.
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,

    /// Seconds between snapshot pulls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl SnapshotConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MOODMAP_SNAPSHOT_PATH") {
            self.path = PathBuf::from(val);
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

/// Live event channel sizing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveConfig {
    /// Capacity of the bounded merge-event channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_district_threshold() -> f64 {
    DEFAULT_DISTRICT_ZOOM
}

const fn default_neighborhood_threshold() -> f64 {
    DEFAULT_NEIGHBORHOOD_ZOOM
}

const fn default_initial_zoom() -> f64 {
    7.0
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/observations.json")
}

const fn default_poll_interval_secs() -> u64 {
    30
}

const fn default_channel_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MoodmapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.snapshot.poll_interval_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
zoom:
  district_threshold: 8.5
  neighborhood_threshold: 11.0

viewport:
  initial_zoom: 10.0

snapshot:
  path: "/var/lib/moodmap/export.json"
  poll_interval_secs: 15

live:
  channel_capacity: 64

logging:
  level: "debug"
  format: json
"#;
        let config = MoodmapConfig::parse(yaml).unwrap();
        assert!((config.zoom.district_threshold - 8.5).abs() < f64::EPSILON);
        assert!((config.viewport.initial_zoom - 10.0).abs() < f64::EPSILON);
        assert_eq!(
            config.snapshot.path,
            PathBuf::from("/var/lib/moodmap/export.json")
        );
        assert_eq!(config.snapshot.poll_interval_secs, 15);
        assert_eq!(config.live.channel_capacity, 64);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = MoodmapConfig::parse("snapshot:\n  poll_interval_secs: 5\n").unwrap();

        // Overridden
        assert_eq!(config.snapshot.poll_interval_secs, 5);
        // Everything else uses defaults
        assert_eq!(config.zoom, ZoomConfig::default());
        assert_eq!(config.live.channel_capacity, 1024);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(MoodmapConfig::parse("").is_ok());
    }

    #[test]
    fn reject_inverted_thresholds() {
        let yaml = "zoom:\n  district_threshold: 12.0\n  neighborhood_threshold: 9.0\n";
        let result = MoodmapConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Zoom { .. })));
    }

    #[test]
    fn reject_zero_poll_interval() {
        let result = MoodmapConfig::parse("snapshot:\n  poll_interval_secs: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn reject_bad_yaml() {
        let result = MoodmapConfig::parse("zoom: [not, a, mapping");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("moodmap-config.yaml");
        if path.exists() {
            let config = MoodmapConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
