//! Error types for the `invasion-core` crate.

use invasion_world::WorldError;

use crate::alien::AlienId;

/// Errors raised while building an orchestrator or moving an alien.
///
/// `InvalidGraph` and `InvalidSink` abort construction; no partial
/// orchestrator is returned. `StaleReference` refuses a single move and
/// leaves every index untouched.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// No world was supplied, it has no cities, or a placement names a
    /// city that does not exist.
    #[error("invalid world: {reason}")]
    InvalidGraph {
        /// What is wrong with the world.
        reason: String,
    },

    /// No event sink was supplied.
    #[error("invalid event sink: none supplied")]
    InvalidSink,

    /// A move targeted a city that no longer exists.
    #[error("alien {alien} cannot reach {city:?}: city no longer exists")]
    StaleReference {
        /// The alien whose move was refused.
        alien: AlienId,
        /// The missing city.
        city: String,
    },

    /// A world-graph operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
