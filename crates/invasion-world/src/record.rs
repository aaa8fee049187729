//! Construction records: the validated input the world graph is built from.
//!
//! A [`CityRecord`] is one line of a map: a city name followed by up to
//! [`MAX_ROADS`] roads, each in a distinct direction. Records are produced
//! by the parsers in [`crate::parse`] and by [`WorldMap::to_records`], and
//! consumed by [`WorldMap::from_records`].
//!
//! [`WorldMap::to_records`]: crate::WorldMap::to_records
//! [`WorldMap::from_records`]: crate::WorldMap::from_records

use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, MAX_ROADS};
use crate::error::ParseError;

/// One road declared by a record: `direction=to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadRecord {
    /// Direction of travel from the declaring city.
    pub direction: Direction,
    /// Name of the neighbor city.
    pub to: String,
}

/// A city and the roads leaving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    /// The city name.
    pub name: String,
    /// Outgoing roads in declaration order.
    #[serde(default)]
    pub roads: Vec<RoadRecord>,
}

impl CityRecord {
    /// Create a record with no roads.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roads: Vec::new(),
        }
    }

    /// Append a road and return the record (builder style).
    #[must_use]
    pub fn with_road(mut self, direction: Direction, to: impl Into<String>) -> Self {
        self.roads.push(RoadRecord {
            direction,
            to: to.into(),
        });
        self
    }

    /// Check the record against the map grammar rules.
    ///
    /// # Errors
    ///
    /// - [`ParseError::InvalidName`] if the city or a neighbor name is empty
    ///   or contains whitespace or `=`.
    /// - [`ParseError::TooManyRoads`] if more than [`MAX_ROADS`] roads are
    ///   declared.
    /// - [`ParseError::DuplicateDirection`] if a direction is repeated.
    pub fn validate(&self) -> Result<(), ParseError> {
        validate_name(&self.name)?;

        if self.roads.len() > MAX_ROADS {
            return Err(ParseError::TooManyRoads {
                city: self.name.clone(),
                count: self.roads.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for road in &self.roads {
            validate_name(&road.to)?;
            if !seen.insert(road.direction) {
                return Err(ParseError::DuplicateDirection {
                    city: self.name.clone(),
                    direction: road.direction,
                });
            }
        }
        Ok(())
    }
}

/// Formats the record as one line of the text grammar.
impl fmt::Display for CityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for road in &self.roads {
            write!(f, " {}={}", road.direction, road.to)?;
        }
        Ok(())
    }
}

/// A city name must be non-empty and free of whitespace and `=`, otherwise
/// it cannot survive a trip through the text grammar.
fn validate_name(name: &str) -> Result<(), ParseError> {
    if name.is_empty() || name.contains('=') || name.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_grammar() {
        let record = CityRecord::new("Gerli")
            .with_road(Direction::South, "Burzaco")
            .with_road(Direction::West, "DockSud");
        assert_eq!(record.to_string(), "Gerli south=Burzaco west=DockSud");
        assert_eq!(CityRecord::new("Lonely").to_string(), "Lonely");
    }

    #[test]
    fn valid_record_passes() {
        let record = CityRecord::new("A")
            .with_road(Direction::North, "B")
            .with_road(Direction::South, "C")
            .with_road(Direction::East, "D")
            .with_road(Direction::West, "E");
        assert_eq!(record.validate(), Ok(()));
    }

    #[test]
    fn duplicate_direction_rejected() {
        let record = CityRecord::new("A")
            .with_road(Direction::North, "B")
            .with_road(Direction::North, "C");
        assert_eq!(
            record.validate(),
            Err(ParseError::DuplicateDirection {
                city: "A".to_owned(),
                direction: Direction::North,
            })
        );
    }

    #[test]
    fn too_many_roads_rejected() {
        let mut record = CityRecord::new("A");
        for (i, direction) in Direction::ALL.iter().chain(Direction::ALL.iter()).enumerate() {
            record = record.with_road(*direction, format!("N{i}"));
        }
        assert_eq!(
            record.validate(),
            Err(ParseError::TooManyRoads {
                city: "A".to_owned(),
                count: 8,
            })
        );
    }

    #[test]
    fn bad_names_rejected() {
        assert!(CityRecord::new("").validate().is_err());
        assert!(CityRecord::new("New York").validate().is_err());
        assert!(CityRecord::new("A=B").validate().is_err());
        let record = CityRecord::new("A").with_road(Direction::East, "B C");
        assert_eq!(
            record.validate(),
            Err(ParseError::InvalidName("B C".to_owned()))
        );
    }
}
