//! City node with its ordered road list.
//!
//! Roads refer to neighbors by name, never by reference: the [`WorldMap`]
//! owns every [`City`] and a name is the stable handle used to reach it.
//! Road order is insertion order and is observable through random move
//! selection and serialization.
//!
//! [`WorldMap`]: crate::WorldMap

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, MAX_ROADS};
use crate::record::{CityRecord, RoadRecord};

/// An outgoing road from a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    /// Direction label used to reach the neighbor.
    pub direction: Direction,
    /// Name of the neighbor city.
    pub to: String,
}

/// A named node in the world graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Unique, immutable name.
    name: String,
    /// Outgoing roads. A neighbor appears at most once.
    roads: Vec<Road>,
}

impl City {
    /// Create a city with no roads.
    pub(crate) const fn new(name: String) -> Self {
        Self {
            name,
            roads: Vec::new(),
        }
    }

    /// The city name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing roads in insertion order.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Names of the neighbor cities, in road order.
    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.roads.iter().map(|road| road.to.as_str())
    }

    /// Return the road leading to `name`, if any.
    pub fn road_to(&self, name: &str) -> Option<&Road> {
        self.roads.iter().find(|road| road.to == name)
    }

    /// Whether a road leads to `name`.
    pub fn has_road_to(&self, name: &str) -> bool {
        self.road_to(name).is_some()
    }

    /// Whether the city has no outgoing roads. Aliens here are trapped.
    pub fn is_isolated(&self) -> bool {
        self.roads.is_empty()
    }

    /// Add a road to `to` unless one already exists. Returns whether a road
    /// was added.
    pub(crate) fn add_road(&mut self, direction: Direction, to: &str) -> bool {
        if self.has_road_to(to) {
            return false;
        }
        self.roads.push(Road {
            direction,
            to: to.to_owned(),
        });
        true
    }

    /// Remove the road to `name`, keeping the order of the rest. Returns
    /// whether a road was removed.
    pub(crate) fn remove_road_to(&mut self, name: &str) -> bool {
        let before = self.roads.len();
        self.roads.retain(|road| road.to != name);
        self.roads.len() != before
    }

    /// Convert to construction records.
    ///
    /// Usually one record. Reciprocal roads can leave a city with more roads
    /// than [`MAX_ROADS`] or with a direction used twice, which a single
    /// record cannot express, so the road list is cut into consecutive runs
    /// that each fit the grammar. Rebuilding from the records merges them
    /// back into one city with the same road order.
    pub fn to_records(&self) -> Vec<CityRecord> {
        let mut records = vec![CityRecord::new(self.name.clone())];
        for road in &self.roads {
            let fits = records.last().is_some_and(|record| {
                record.roads.len() < MAX_ROADS
                    && record.roads.iter().all(|r| r.direction != road.direction)
            });
            if !fits {
                records.push(CityRecord::new(self.name.clone()));
            }
            if let Some(record) = records.last_mut() {
                record.roads.push(RoadRecord {
                    direction: road.direction,
                    to: road.to.clone(),
                });
            }
        }
        records
    }
}

/// Formats the city in the text grammar, one line per record from
/// [`City::to_records`].
impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.to_records().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_road_is_idempotent() {
        let mut city = City::new("A".to_owned());
        assert!(city.add_road(Direction::North, "B"));
        assert!(!city.add_road(Direction::North, "B"));
        // A second label for the same neighbor is still a duplicate edge.
        assert!(!city.add_road(Direction::East, "B"));
        assert_eq!(city.roads().len(), 1);
    }

    #[test]
    fn remove_road_preserves_order() {
        let mut city = City::new("A".to_owned());
        city.add_road(Direction::North, "B");
        city.add_road(Direction::South, "C");
        city.add_road(Direction::East, "D");

        assert!(city.remove_road_to("C"));
        assert!(!city.remove_road_to("C"));
        assert_eq!(city.neighbors().collect::<Vec<_>>(), vec!["B", "D"]);
    }

    #[test]
    fn display_matches_grammar() {
        let mut city = City::new("Gerli".to_owned());
        city.add_road(Direction::South, "Burzaco");
        city.add_road(Direction::West, "DockSud");
        assert_eq!(city.to_string(), "Gerli south=Burzaco west=DockSud");
        assert_eq!(city.to_records().len(), 1);
    }

    #[test]
    fn repeated_directions_split_into_runs() {
        let mut city = City::new("Hub".to_owned());
        city.add_road(Direction::South, "A");
        city.add_road(Direction::North, "B");
        city.add_road(Direction::South, "C");
        let records = city.to_records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.validate().is_ok()));
        assert_eq!(city.to_string(), "Hub south=A north=B\nHub south=C");
    }

    #[test]
    fn isolated_city_is_a_bare_name() {
        let city = City::new("Lonely".to_owned());
        assert_eq!(city.to_string(), "Lonely");
    }
}
