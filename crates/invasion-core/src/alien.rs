//! Alien identity and lifecycle.
//!
//! An alien is created `Active` and leaves that state exactly once: it is
//! either `Trapped` (standing on a city with no roads out) or `Destroyed`
//! (caught in a collision). Terminal aliens are never revisited.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for an alien: `1..=N` in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlienId(pub u32);

impl AlienId {
    /// Return the raw numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AlienId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AlienId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Lifecycle status of an alien.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlienStatus {
    /// Still walking.
    #[default]
    Active,
    /// Stuck on a city with no outgoing roads.
    Trapped,
    /// Killed in a collision together with its city.
    Destroyed,
}

impl AlienStatus {
    /// Whether the status is final.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// A mobile alien performing a random walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alien {
    /// Unique identifier.
    pub id: AlienId,
    /// Name of the city the alien stands on (or fell in).
    pub city: String,
    /// Lifecycle status.
    pub status: AlienStatus,
}

impl Alien {
    /// Create an active alien standing on `city`.
    pub fn new(id: AlienId, city: impl Into<String>) -> Self {
        Self {
            id,
            city: city.into(),
            status: AlienStatus::Active,
        }
    }

    /// Whether the alien has reached a terminal status.
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_alien_is_active() {
        let alien = Alien::new(AlienId(1), "Gerli");
        assert_eq!(alien.status, AlienStatus::Active);
        assert!(!alien.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(AlienStatus::Trapped.is_terminal());
        assert!(AlienStatus::Destroyed.is_terminal());
        assert!(!AlienStatus::Active.is_terminal());
    }

    #[test]
    fn id_serializes_as_plain_number() {
        let json = serde_json::to_string(&AlienId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }
}
