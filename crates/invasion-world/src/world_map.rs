//! World graph: cities as nodes, named roads as labelled edges.
//!
//! The [`WorldMap`] is an arena of [`City`] values keyed by name. Roads hold
//! neighbor names, so deleting a city is one map removal plus stripping the
//! name from whichever road lists mention it.
//!
//! Two topologies are supported:
//!
//! - [`Topology::Undirected`] -- every road `A -d-> B` has a twin
//!   `B -opposite(d)-> A`. Deleting a city only touches its own neighbors.
//! - [`Topology::Directed`] -- roads are one-way and inbound roads are not
//!   indexed, so deleting a city scans every remaining city.
//!
//! Cities are kept in a `BTreeMap`, so whole-map walks (placement,
//! directed deletion, serialization) run in name order and are reproducible.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::city::City;
use crate::direction::Direction;
use crate::error::WorldError;
use crate::record::CityRecord;

/// Whether roads are one-way or always come in reciprocal pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Every road has a reciprocal road in the opposite direction.
    #[default]
    Undirected,
    /// Roads are one-way.
    Directed,
}

/// The world graph holding all cities and the roads between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldMap {
    /// All live cities indexed by name.
    cities: BTreeMap<String, City>,
    /// Road semantics for construction and deletion.
    topology: Topology,
    /// Names of destroyed cities, in destruction order.
    destroyed: Vec<String>,
}

impl WorldMap {
    /// Create an empty world map.
    pub const fn new(topology: Topology) -> Self {
        Self {
            cities: BTreeMap::new(),
            topology,
            destroyed: Vec::new(),
        }
    }

    /// Build a fully linked map from validated records.
    ///
    /// Cities referenced only as neighbors are created on first mention.
    /// Repeated edges collapse into one.
    pub fn from_records(records: &[CityRecord], topology: Topology) -> Self {
        let mut map = Self::new(topology);
        for record in records {
            map.add_record(record);
        }
        debug!(
            cities = map.city_count(),
            ?topology,
            "World map built from records"
        );
        map
    }

    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    /// Add a record's city and all its roads.
    pub fn add_record(&mut self, record: &CityRecord) {
        self.add_city(&record.name);
        for road in &record.roads {
            self.add_road(&record.name, road.direction, &road.to);
        }
    }

    /// Add a city with no roads. Returns `false` if it already exists.
    pub fn add_city(&mut self, name: &str) -> bool {
        if self.cities.contains_key(name) {
            return false;
        }
        self.cities
            .insert(name.to_owned(), City::new(name.to_owned()));
        true
    }

    /// Add the road `from -direction-> to`, creating either city if needed.
    ///
    /// An existing road from `from` to `to` is left untouched. In an
    /// undirected map the reciprocal road `to -opposite-> from` is ensured
    /// as well.
    pub fn add_road(&mut self, from: &str, direction: Direction, to: &str) {
        self.add_city(from);
        self.add_city(to);

        if let Some(city) = self.cities.get_mut(from) {
            city.add_road(direction, to);
        }

        if self.topology == Topology::Undirected {
            if let Some(city) = self.cities.get_mut(to) {
                city.add_road(direction.opposite(), from);
            }
        }
    }

    // -------------------------------------------------------------------
    // Deletion
    // -------------------------------------------------------------------

    /// Remove a city and every road leading to it.
    ///
    /// Undirected maps repair only the destroyed city's own neighbors;
    /// directed maps scan every remaining city. The order of surviving
    /// roads is preserved. Returns the removed city.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CityNotFound`] if no city has that name. The
    /// map is unchanged in that case.
    pub fn destroy_city(&mut self, name: &str) -> Result<City, WorldError> {
        let city = self
            .cities
            .remove(name)
            .ok_or_else(|| WorldError::CityNotFound(name.to_owned()))?;

        let mut repaired: usize = 0;
        match self.topology {
            Topology::Undirected => {
                for neighbor in city.neighbors() {
                    if let Some(other) = self.cities.get_mut(neighbor) {
                        if other.remove_road_to(name) {
                            repaired = repaired.saturating_add(1);
                        }
                    }
                }
            }
            Topology::Directed => {
                for other in self.cities.values_mut() {
                    if other.remove_road_to(name) {
                        repaired = repaired.saturating_add(1);
                    }
                }
            }
        }

        self.destroyed.push(name.to_owned());
        debug!(city = name, repaired, "City destroyed");
        Ok(city)
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// The road semantics of this map.
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Look up a city by name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Whether a live city has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.cities.contains_key(name)
    }

    /// Number of live cities.
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Whether no live cities remain.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Live city names in name order.
    pub fn city_names(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Live cities in name order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Names of destroyed cities, in destruction order.
    pub fn destroyed(&self) -> &[String] {
        &self.destroyed
    }

    /// Total number of roads across all live cities.
    pub fn road_count(&self) -> usize {
        self.cities.values().map(|city| city.roads().len()).sum()
    }

    // -------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------

    /// Lazily render the live cities in the text grammar.
    ///
    /// One line per city, except for the rare city whose roads do not fit a
    /// single record (see [`City::to_records`]). Feeding the lines back
    /// through [`crate::parse_document`] and [`WorldMap::from_records`]
    /// reproduces the same adjacency.
    pub fn lines(&self) -> impl Iterator<Item = String> {
        self.cities
            .values()
            .flat_map(City::to_records)
            .map(|record| record.to_string())
    }

    /// Snapshot the live cities as construction records.
    pub fn to_records(&self) -> Vec<CityRecord> {
        self.cities.values().flat_map(City::to_records).collect()
    }
}

/// Renders the map in the text grammar, one city per line.
impl fmt::Display for WorldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
