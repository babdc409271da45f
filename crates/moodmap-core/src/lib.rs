//! Geospatial emotion clustering for the Moodmap emotional weather map.
//!
//! This crate turns a stream of user-reported emotion observations into
//! zoom-aware map clusters, each coloured by its dominant emotion and
//! pinned at a deterministic position.
//!
//! # Modules
//!
//! - [`address`] -- Total parsing of free-text addresses into three levels.
//! - [`region`] -- Region spelling normalisation and base coordinates.
//! - [`zoom`] -- Zoom to granularity resolution.
//! - [`aggregate`] -- Dominant emotion and average intensity per group.
//! - [`cluster`] -- Grouping, aggregation, and placement.
//! - [`live`] -- [`LiveMergeController`], the owner of the working set.
//! - [`runner`] -- Async merge loop over [`MergeEvent`]s.
//! - [`source`] -- [`SnapshotSource`] trait and a static implementation.
//! - [`config`] -- Configuration loading from `moodmap-config.yaml`.
//!
//! [`LiveMergeController`]: live::LiveMergeController
//! [`MergeEvent`]: runner::MergeEvent
//! [`SnapshotSource`]: source::SnapshotSource

pub mod address;
pub mod aggregate;
pub mod cluster;
pub mod config;
pub mod live;
pub mod region;
pub mod runner;
pub mod source;
pub mod zoom;
