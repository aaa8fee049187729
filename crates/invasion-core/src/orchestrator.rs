//! The orchestrator: aliens, the occupancy index, and the move protocol.
//!
//! An [`Orchestrator`] owns the [`WorldMap`] it was built from, the live
//! alien set, and the city -> residents index. Each move reads the graph to
//! pick a destination, updates the alien and occupancy state, and on a
//! collision calls back into the graph to destroy the city.
//!
//! # Move protocol
//!
//! 1. A terminal or unknown alien does nothing.
//! 2. An alien on a city with no roads is trapped; the city survives.
//! 3. Otherwise a road is picked uniformly at random, in stored order, and
//!    the alien leaves its old city.
//! 4. If the destination already has residents, the city is destroyed and
//!    the mover and every resident die with it.
//! 5. Otherwise the alien joins the destination's residents.
//!
//! Collisions resolve strictly in processing order. A road whose target was
//! destroyed earlier in the same round is stale: the move is refused with
//! [`OrchestratorError::StaleReference`] and the alien stays put, still
//! active, for the rest of the round.
//!
//! All randomness comes from one `StdRng` seeded at construction, so a seed,
//! a world, and an alien count fully determine a run.

use core::fmt;
use std::collections::BTreeMap;

use invasion_world::WorldMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alien::{Alien, AlienId, AlienStatus};
use crate::error::OrchestratorError;
use crate::event::{EventSink, InvasionEvent};
use crate::occupancy::OccupancyIndex;

/// What a single move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The alien was already terminal or is unknown.
    Idle,
    /// The alien had no road out and is now trapped.
    Trapped {
        /// City the alien is stuck in.
        city: String,
    },
    /// The alien walked to an empty city.
    Moved {
        /// City it left.
        from: String,
        /// City it arrived at.
        to: String,
    },
    /// The alien arrived at an occupied city, destroying it.
    Collided {
        /// The destroyed city.
        city: String,
        /// The mover followed by every resident, all now destroyed.
        casualties: Vec<AlienId>,
    },
}

/// Why a batch run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// No live aliens remain.
    Extinction,
    /// The round limit was reached with aliens still alive.
    MaxRoundsReached,
}

/// Summary of a [`Orchestrator::run_rounds`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Rounds executed by this call.
    pub rounds: u64,
    /// Live aliens at the end.
    pub aliens_remaining: usize,
    /// Live cities at the end.
    pub cities_remaining: usize,
    /// Why the run stopped.
    pub end_reason: EndReason,
}

// -----------------------------------------------------------------------
// Builder
// -----------------------------------------------------------------------

/// Collects the inputs for an [`Orchestrator`] and validates them.
#[derive(Default)]
pub struct OrchestratorBuilder {
    world: Option<WorldMap>,
    sink: Option<Box<dyn EventSink>>,
    alien_count: u32,
    seed: u64,
    placements: Vec<String>,
}

impl OrchestratorBuilder {
    /// Number of aliens to place on uniformly random cities.
    #[must_use]
    pub const fn aliens(mut self, count: u32) -> Self {
        self.alien_count = count;
        self
    }

    /// Seed for placement and movement randomness.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The world the aliens invade. Ownership moves to the orchestrator.
    #[must_use]
    pub fn world(mut self, world: WorldMap) -> Self {
        self.world = Some(world);
        self
    }

    /// Where events are reported.
    #[must_use]
    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Where events are reported, already boxed.
    #[must_use]
    pub fn boxed_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Add one alien at a fixed city.
    ///
    /// Placed aliens take the lowest ids, in call order, ahead of the
    /// randomly placed ones.
    #[must_use]
    pub fn place(mut self, city: impl Into<String>) -> Self {
        self.placements.push(city.into());
        self
    }

    /// Validate the inputs and create the aliens.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::InvalidGraph`] if no world was supplied, the
    ///   world has no cities, or a placement names an unknown city.
    /// - [`OrchestratorError::InvalidSink`] if no sink was supplied.
    ///
    /// The world is checked before the sink.
    pub fn build(self) -> Result<Orchestrator, OrchestratorError> {
        let Some(world) = self.world else {
            return Err(OrchestratorError::InvalidGraph {
                reason: "no world supplied".to_owned(),
            });
        };
        if world.is_empty() {
            return Err(OrchestratorError::InvalidGraph {
                reason: "world has 0 cities".to_owned(),
            });
        }
        let Some(sink) = self.sink else {
            return Err(OrchestratorError::InvalidSink);
        };
        if let Some(missing) = self.placements.iter().find(|city| !world.contains(city)) {
            return Err(OrchestratorError::InvalidGraph {
                reason: format!("placement city {missing:?} does not exist"),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let names: Vec<&str> = world.city_names().collect();
        let mut starting = self.placements;
        for _ in 0..self.alien_count {
            let Some(city) = names.choose(&mut rng) else {
                return Err(OrchestratorError::InvalidGraph {
                    reason: "world has 0 cities".to_owned(),
                });
            };
            starting.push((*city).to_owned());
        }

        let mut aliens = BTreeMap::new();
        let mut occupancy = OccupancyIndex::default();
        for (id, city) in (1..=u32::MAX).map(AlienId).zip(starting) {
            occupancy.insert(&city, id);
            aliens.insert(id, Alien::new(id, city));
        }

        info!(
            aliens = aliens.len(),
            cities = world.city_count(),
            seed = self.seed,
            "Aliens unleashed"
        );

        Ok(Orchestrator {
            world,
            aliens,
            fallen: Vec::new(),
            occupancy,
            rng,
            sink,
            rounds_completed: 0,
        })
    }
}

impl fmt::Debug for OrchestratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorBuilder")
            .field("world", &self.world)
            .field("has_sink", &self.sink.is_some())
            .field("alien_count", &self.alien_count)
            .field("seed", &self.seed)
            .field("placements", &self.placements)
            .finish()
    }
}

// -----------------------------------------------------------------------
// Orchestrator
// -----------------------------------------------------------------------

/// Drives the aliens over the world.
pub struct Orchestrator {
    /// The world being invaded.
    world: WorldMap,
    /// Live aliens, keyed (and therefore ordered) by id.
    aliens: BTreeMap<AlienId, Alien>,
    /// Terminal aliens in the order they fell.
    fallen: Vec<Alien>,
    /// City -> live residents.
    occupancy: OccupancyIndex,
    /// Source of all randomness after construction.
    rng: StdRng,
    /// Event receiver.
    sink: Box<dyn EventSink>,
    /// Rounds executed over the orchestrator's lifetime.
    rounds_completed: u64,
}

impl Orchestrator {
    /// Start building an orchestrator.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    // -------------------------------------------------------------------
    // Driving
    // -------------------------------------------------------------------

    /// Move one alien. Intended for externally paced drivers; choosing which
    /// alien goes next is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::StaleReference`] if the chosen road
    /// leads to a city that no longer exists. Nothing changes in that case.
    pub fn step(&mut self, id: AlienId) -> Result<MoveOutcome, OrchestratorError> {
        self.move_alien(id)
    }

    /// Move every live alien once, in id order. Aliens that fall earlier in
    /// the round are skipped. Stale moves are logged and skipped.
    pub fn run_round(&mut self) {
        let roster: Vec<AlienId> = self.aliens.keys().copied().collect();
        debug!(
            round = self.rounds_completed.saturating_add(1),
            aliens = roster.len(),
            "Round started"
        );
        for id in roster {
            if let Err(e) = self.move_alien(id) {
                warn!(alien = id.get(), error = %e, "Move refused");
            }
        }
        self.rounds_completed = self.rounds_completed.saturating_add(1);
    }

    /// Run up to `max_rounds` rounds, stopping early once no aliens remain.
    pub fn run_rounds(&mut self, max_rounds: u64) -> RunSummary {
        let mut rounds: u64 = 0;
        while rounds < max_rounds && !self.aliens.is_empty() {
            self.run_round();
            rounds = rounds.saturating_add(1);
        }

        let end_reason = if self.aliens.is_empty() {
            EndReason::Extinction
        } else {
            EndReason::MaxRoundsReached
        };
        info!(
            rounds,
            aliens_remaining = self.aliens.len(),
            cities_remaining = self.world.city_count(),
            ?end_reason,
            "Invasion run finished"
        );

        RunSummary {
            rounds,
            aliens_remaining: self.aliens.len(),
            cities_remaining: self.world.city_count(),
            end_reason,
        }
    }

    fn move_alien(&mut self, id: AlienId) -> Result<MoveOutcome, OrchestratorError> {
        let Some(from) = self.aliens.get(&id).map(|alien| alien.city.clone()) else {
            return Ok(MoveOutcome::Idle);
        };
        let Some(city) = self.world.city(&from) else {
            return Err(OrchestratorError::StaleReference {
                alien: id,
                city: from,
            });
        };

        let Some(to) = city.roads().choose(&mut self.rng).map(|road| road.to.clone()) else {
            self.occupancy.remove(&from, id);
            self.retire(id, AlienStatus::Trapped);
            self.emit(&InvasionEvent::Trapped {
                alien: id,
                city: from.clone(),
            });
            return Ok(MoveOutcome::Trapped { city: from });
        };

        self.walk(id, from, to)
    }

    /// Carry alien `id` from `from` down a road to `to` and resolve the
    /// arrival. Refuses, changing nothing, if `to` is no longer in the world.
    fn walk(
        &mut self,
        id: AlienId,
        from: String,
        to: String,
    ) -> Result<MoveOutcome, OrchestratorError> {
        if !self.world.contains(&to) {
            return Err(OrchestratorError::StaleReference { alien: id, city: to });
        }

        self.occupancy.remove(&from, id);
        if let Some(alien) = self.aliens.get_mut(&id) {
            alien.city.clone_from(&to);
        }
        self.emit(&InvasionEvent::Moved {
            alien: id,
            from: from.clone(),
            to: to.clone(),
        });

        let residents = self.occupancy.evict(&to);
        let Some((&rival, others)) = residents.split_first() else {
            self.occupancy.insert(&to, id);
            return Ok(MoveOutcome::Moved { from, to });
        };

        self.emit(&InvasionEvent::Collision {
            alien: id,
            rival,
            city: to.clone(),
        });
        self.world.destroy_city(&to)?;
        self.emit(&InvasionEvent::CityDestroyed {
            city: to.clone(),
            alien: id,
            rival,
        });
        for &resident in others {
            self.emit(&InvasionEvent::TrappedInRuins {
                alien: resident,
                city: to.clone(),
            });
        }

        let casualties: Vec<AlienId> = std::iter::once(id).chain(residents.iter().copied()).collect();
        for &casualty in &casualties {
            self.retire(casualty, AlienStatus::Destroyed);
        }

        Ok(MoveOutcome::Collided {
            city: to,
            casualties,
        })
    }

    /// Move a live alien to the fallen list with its final status. The
    /// caller is responsible for its occupancy entry.
    fn retire(&mut self, id: AlienId, status: AlienStatus) {
        if let Some(mut alien) = self.aliens.remove(&id) {
            alien.status = status;
            self.fallen.push(alien);
        }
    }

    fn emit(&mut self, event: &InvasionEvent) {
        self.sink.on_event(event);
    }

    // -------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------

    /// The world in its current state.
    pub const fn world(&self) -> &WorldMap {
        &self.world
    }

    /// Consume the orchestrator and return the world.
    pub fn into_world(self) -> WorldMap {
        self.world
    }

    /// Live aliens in id order.
    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.aliens.values()
    }

    /// Ids of the live aliens in id order.
    pub fn live_ids(&self) -> Vec<AlienId> {
        self.aliens.keys().copied().collect()
    }

    /// Number of live aliens.
    pub fn live_count(&self) -> usize {
        self.aliens.len()
    }

    /// Terminal aliens in the order they fell.
    pub fn fallen(&self) -> &[Alien] {
        &self.fallen
    }

    /// Look up an alien, live or fallen.
    pub fn alien(&self, id: AlienId) -> Option<&Alien> {
        self.aliens
            .get(&id)
            .or_else(|| self.fallen.iter().find(|alien| alien.id == id))
    }

    /// Live aliens standing on `city`, in arrival order.
    pub fn occupants(&self, city: &str) -> &[AlienId] {
        self.occupancy.residents(city)
    }

    /// Rounds executed over the orchestrator's lifetime.
    pub const fn rounds_completed(&self) -> u64 {
        self.rounds_completed
    }

    /// Check that the occupancy index matches the live alien set: every
    /// live alien is listed exactly once under its own city, nothing else is
    /// listed, and every listed city exists.
    pub fn is_consistent(&self) -> bool {
        if self.occupancy.total() != self.aliens.len() {
            return false;
        }
        let listed_once = self.aliens.values().all(|alien| {
            self.occupancy
                .residents(&alien.city)
                .iter()
                .filter(|id| **id == alien.id)
                .count()
                == 1
        });
        let entries_valid = self.occupancy.entries().all(|(city, id)| {
            self.world.contains(city)
                && self
                    .aliens
                    .get(&id)
                    .is_some_and(|alien| alien.city == city && !alien.is_terminal())
        });
        listed_once && entries_valid
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("world", &self.world)
            .field("aliens", &self.aliens)
            .field("fallen", &self.fallen)
            .field("occupancy", &self.occupancy)
            .field("rounds_completed", &self.rounds_completed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use invasion_world::{Topology, parse_document};

    use super::*;
    use crate::event::{NullSink, RecordingSink};

    fn world(input: &str, topology: Topology) -> WorldMap {
        WorldMap::from_records(&parse_document(input).unwrap(), topology)
    }

    fn two_cities() -> WorldMap {
        world("City1 south=City2\nCity2 north=City1", Topology::Undirected)
    }

    #[test]
    fn missing_world_is_invalid_graph() {
        let err = Orchestrator::builder().sink(NullSink).build().unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidGraph { .. }));
    }

    #[test]
    fn empty_world_is_invalid_graph() {
        let err = Orchestrator::builder()
            .world(WorldMap::new(Topology::Undirected))
            .sink(NullSink)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid world: world has 0 cities");
    }

    #[test]
    fn missing_sink_is_invalid_sink() {
        let err = Orchestrator::builder()
            .world(two_cities())
            .build()
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidSink));
    }

    #[test]
    fn world_is_checked_before_sink() {
        let err = Orchestrator::builder().build().unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidGraph { .. }));
    }

    #[test]
    fn unknown_placement_is_invalid_graph() {
        let err = Orchestrator::builder()
            .world(two_cities())
            .sink(NullSink)
            .place("Atlantis")
            .build()
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidGraph { .. }));
    }

    #[test]
    fn ids_are_sequential_and_placed_first() {
        let orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(NullSink)
            .place("City2")
            .aliens(3)
            .build()
            .unwrap();
        assert_eq!(
            orchestrator.live_ids(),
            vec![AlienId(1), AlienId(2), AlienId(3), AlienId(4)]
        );
        assert_eq!(
            orchestrator.alien(AlienId(1)).map(|a| a.city.as_str()),
            Some("City2")
        );
        assert!(orchestrator.is_consistent());
    }

    #[test]
    fn zero_aliens_is_immediate_extinction() {
        let mut orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(NullSink)
            .build()
            .unwrap();
        let summary = orchestrator.run_rounds(10);
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.end_reason, EndReason::Extinction);
        assert_eq!(orchestrator.world().city_count(), 2);
    }

    #[test]
    fn lone_alien_walks_back_and_forth() {
        let sink = RecordingSink::new();
        let mut orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(sink.clone())
            .place("City1")
            .build()
            .unwrap();

        let summary = orchestrator.run_rounds(3);
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.end_reason, EndReason::MaxRoundsReached);
        assert_eq!(summary.aliens_remaining, 1);
        assert_eq!(orchestrator.occupants("City2"), [AlienId(1)]);
        assert!(orchestrator.occupants("City1").is_empty());
        assert_eq!(sink.len(), 3);
        assert!(orchestrator.is_consistent());
    }

    #[test]
    fn trapped_alien_leaves_occupancy_but_not_the_city() {
        let sink = RecordingSink::new();
        let mut orchestrator = Orchestrator::builder()
            .world(world("Island", Topology::Undirected))
            .sink(sink.clone())
            .place("Island")
            .build()
            .unwrap();

        let outcome = orchestrator.step(AlienId(1)).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Trapped {
                city: "Island".to_owned()
            }
        );
        assert!(orchestrator.world().contains("Island"));
        assert!(orchestrator.occupants("Island").is_empty());
        assert_eq!(orchestrator.live_count(), 0);
        assert_eq!(
            orchestrator.alien(AlienId(1)).map(|a| a.status),
            Some(AlienStatus::Trapped)
        );

        // Terminal aliens are never revisited.
        assert_eq!(orchestrator.step(AlienId(1)).unwrap(), MoveOutcome::Idle);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn unknown_alien_is_idle() {
        let mut orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(NullSink)
            .aliens(1)
            .build()
            .unwrap();
        assert_eq!(orchestrator.step(AlienId(99)).unwrap(), MoveOutcome::Idle);
    }

    #[test]
    fn rounds_completed_accumulates_across_calls() {
        let mut orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(NullSink)
            .place("City1")
            .build()
            .unwrap();
        orchestrator.run_rounds(2);
        orchestrator.run_round();
        assert_eq!(orchestrator.rounds_completed(), 3);
    }

    #[test]
    fn alien_on_vanished_city_is_refused_and_stays_active() {
        let sink = RecordingSink::new();
        let mut orchestrator = Orchestrator::builder()
            .world(world("A east=B\nC east=D", Topology::Undirected))
            .sink(sink.clone())
            .place("A")
            .place("C")
            .build()
            .unwrap();
        if let Some(alien) = orchestrator.aliens.get_mut(&AlienId(1)) {
            "Ghost".clone_into(&mut alien.city);
        }

        let err = orchestrator.step(AlienId(1)).unwrap_err();
        assert!(
            matches!(&err, OrchestratorError::StaleReference { alien, city }
                if *alien == AlienId(1) && city == "Ghost"),
            "{err:?}"
        );
        assert!(sink.is_empty());
        assert_eq!(
            orchestrator.alien(AlienId(1)).map(|a| a.status),
            Some(AlienStatus::Active)
        );

        // The batch logs the refusal and keeps going.
        orchestrator.run_round();
        assert_eq!(orchestrator.rounds_completed(), 1);
        assert_eq!(orchestrator.live_count(), 2);
        assert_eq!(
            orchestrator.alien(AlienId(1)).map(|a| a.city.as_str()),
            Some("Ghost")
        );
        assert_eq!(
            orchestrator.alien(AlienId(2)).map(|a| a.city.as_str()),
            Some("D")
        );
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn road_to_vanished_city_is_refused_without_side_effects() {
        let sink = RecordingSink::new();
        let mut orchestrator = Orchestrator::builder()
            .world(two_cities())
            .sink(sink.clone())
            .place("City1")
            .build()
            .unwrap();

        let err = orchestrator
            .walk(AlienId(1), "City1".to_owned(), "Ghost".to_owned())
            .unwrap_err();
        assert!(
            matches!(&err, OrchestratorError::StaleReference { alien, city }
                if *alien == AlienId(1) && city == "Ghost"),
            "{err:?}"
        );
        assert!(sink.is_empty());
        assert_eq!(orchestrator.occupants("City1"), [AlienId(1)]);
        assert_eq!(
            orchestrator.alien(AlienId(1)).map(|a| (a.city.as_str(), a.status)),
            Some(("City1", AlienStatus::Active))
        );
        assert_eq!(orchestrator.world().city_count(), 2);
        assert!(orchestrator.is_consistent());
    }
}
