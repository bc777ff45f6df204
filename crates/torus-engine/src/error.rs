//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

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
        source: torus_core::config::ConfigError,
    },

    /// `$TORUS_CONFIG` names a file that does not exist.
    #[error("config file {} named by TORUS_CONFIG does not exist", path.display())]
    ConfigNotFound {
        /// The path that was named.
        path: std::path::PathBuf,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: torus_core::runner::RunnerError,
    },

    /// The global tracing subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// The final state snapshot could not be serialized.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
