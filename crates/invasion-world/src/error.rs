//! Error types for the `invasion-world` crate.
//!
//! [`ParseError`] covers the map grammar. [`WorldError`] covers graph
//! operations and wraps parse and JSON failures for callers that load a map
//! in one step.

use crate::direction::Direction;

/// Errors produced while validating a city record or parsing a map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line was empty or contained only whitespace.
    #[error("invalid input: empty line")]
    EmptyLine,

    /// The line had more segments than a name plus one road per direction.
    #[error("invalid number of segments: {0}")]
    TooManySegments(usize),

    /// A record declared more roads than there are directions.
    #[error("city {city:?} declares {count} roads")]
    TooManyRoads {
        /// The offending city.
        city: String,
        /// Number of roads declared.
        count: usize,
    },

    /// A road token was not a single `direction=city` pair.
    #[error("invalid road definition: {0:?}")]
    InvalidRoad(String),

    /// A direction token is not one of the four compass points.
    #[error("cannot convert {0:?} to a direction")]
    UnknownDirection(String),

    /// The same direction was used twice within one record.
    #[error("city {city:?} declares direction {direction} twice")]
    DuplicateDirection {
        /// The offending city.
        city: String,
        /// The repeated direction.
        direction: Direction,
    },

    /// A city name was empty or contained whitespace or `=`.
    #[error("invalid city name: {0:?}")]
    InvalidName(String),

    /// A failure on a specific line of a text map (1-based).
    #[error("line {line}: {source}")]
    AtLine {
        /// Line number, starting at 1.
        line: usize,
        /// The underlying parse error.
        source: Box<ParseError>,
    },

    /// A failure on a specific record of a JSON map (0-based).
    #[error("record {index}: {source}")]
    AtRecord {
        /// Record index, starting at 0.
        index: usize,
        /// The underlying parse error.
        source: Box<ParseError>,
    },
}

/// Errors that can occur during world-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A city was not found in the world graph.
    #[error("city not found: {0}")]
    CityNotFound(String),

    /// The map text failed validation.
    #[error("parse error: {source}")]
    Parse {
        /// The underlying parse error.
        #[from]
        source: ParseError,
    },

    /// The JSON map could not be decoded or encoded.
    #[error("invalid JSON map: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
