//! Error types for the invasion engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the run itself.

use std::path::PathBuf;

/// Top-level error for the invasion engine binary.
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
        source: invasion_core::config::ConfigError,
    },

    /// The map could not be parsed or a graph operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: invasion_world::WorldError,
    },

    /// The orchestrator could not be built.
    #[error("orchestrator error: {source}")]
    Orchestrator {
        /// The underlying orchestrator error.
        #[from]
        source: invasion_core::OrchestratorError,
    },

    /// Reading or writing a file failed.
    #[error("failed to access {}: {source}", path.display())]
    File {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Terminal I/O failed in interactive mode.
    #[error("terminal I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
