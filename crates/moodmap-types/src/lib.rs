//! Shared type definitions for the Moodmap emotional weather map.
//!
//! This crate is the single source of truth for the records that flow
//! between the clustering engine and its collaborators. Types defined here
//! flow downstream to `TypeScript` via `ts-rs` for the map frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers
//! - [`enums`] -- Emotion categories, granularities, recompute triggers
//! - [`structs`] -- Observations, parsed addresses, clusters

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    EmotionCategory, EmotionCodeError, Granularity, GranularityLevelError, RecomputeTrigger,
};
pub use ids::UserId;
pub use structs::{
    Cluster, ClusterSet, EmotionTally, GeoPoint, Intensity, IntensityError, Observation,
    ParsedAddress,
};
