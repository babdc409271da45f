//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: moodmap_core::config::ConfigError,
    },

    /// The zoom thresholds could not build a resolver.
    #[error("zoom error: {source}")]
    Zoom {
        /// The underlying threshold error.
        #[from]
        source: moodmap_core::zoom::ZoomError,
    },

    /// Logging could not be initialised.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// A background task panicked or was cancelled.
    #[error("task error: {source}")]
    Task {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
