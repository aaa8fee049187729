//! Geography for the alien invasion simulation.
//!
//! This crate models the world the aliens walk over: named cities connected
//! by roads labelled with compass directions. It knows nothing about aliens.
//!
//! # Modules
//!
//! - [`direction`] -- The four compass directions and their opposites.
//! - [`error`] -- Error types for parsing and world-graph operations.
//! - [`city`] -- A single city node and its ordered road list.
//! - [`record`] -- Validated construction records (`name` plus roads).
//! - [`parse`] -- The line grammar and JSON form that produce records.
//! - [`world_map`] -- The world graph: construction, lookup, and
//!   deletion with road repair.

pub mod city;
pub mod direction;
pub mod error;
pub mod parse;
pub mod record;
pub mod world_map;

// Re-export primary types at crate root.
pub use city::{City, Road};
pub use direction::{Direction, MAX_ROADS};
pub use error::{ParseError, WorldError};
pub use parse::{parse_document, parse_json, parse_line, records_to_json};
pub use record::{CityRecord, RoadRecord};
pub use world_map::{Topology, WorldMap};
