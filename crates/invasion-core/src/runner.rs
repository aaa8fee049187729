//! Config-driven batch run.
//!
//! [`run_simulation`] builds an [`Orchestrator`] from a [`SimulationConfig`]
//! and a world, runs up to `simulation.max_rounds` rounds, and logs why the
//! run ended. Callers that need per-alien control (the interactive driver)
//! build the orchestrator themselves via [`build_orchestrator`].

use invasion_world::WorldMap;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::OrchestratorError;
use crate::event::EventSink;
use crate::orchestrator::{EndReason, Orchestrator, RunSummary};

/// Result of a batch run.
#[derive(Debug)]
pub struct SimulationResult {
    /// Round count and end reason.
    pub summary: RunSummary,
    /// Seed the run used.
    pub seed: u64,
    /// The surviving world.
    pub world: WorldMap,
}

/// Build an orchestrator from the config's alien settings.
///
/// `seed` is passed separately because the config's seed is optional and
/// the fallback is the caller's choice.
///
/// # Errors
///
/// Returns [`OrchestratorError::InvalidGraph`] if the world has no cities.
pub fn build_orchestrator(
    config: &SimulationConfig,
    seed: u64,
    world: WorldMap,
    sink: Box<dyn EventSink>,
) -> Result<Orchestrator, OrchestratorError> {
    Orchestrator::builder()
        .world(world)
        .boxed_sink(sink)
        .aliens(config.aliens.count)
        .seed(seed)
        .build()
}

/// Run a full batch simulation.
///
/// # Errors
///
/// Returns [`OrchestratorError`] if the orchestrator cannot be built.
pub fn run_simulation(
    config: &SimulationConfig,
    seed: u64,
    world: WorldMap,
    sink: Box<dyn EventSink>,
) -> Result<SimulationResult, OrchestratorError> {
    info!(
        aliens = config.aliens.count,
        max_rounds = config.simulation.max_rounds,
        seed,
        cities = world.city_count(),
        "Invasion starting"
    );

    let mut orchestrator = build_orchestrator(config, seed, world, sink)?;
    let summary = orchestrator.run_rounds(config.simulation.max_rounds);
    log_simulation_end(&summary);

    Ok(SimulationResult {
        summary,
        seed,
        world: orchestrator.into_world(),
    })
}

/// Log the end of a run.
pub fn log_simulation_end(summary: &RunSummary) {
    match summary.end_reason {
        EndReason::Extinction => info!(
            rounds = summary.rounds,
            cities_remaining = summary.cities_remaining,
            "Every alien has fallen"
        ),
        EndReason::MaxRoundsReached => info!(
            rounds = summary.rounds,
            aliens_remaining = summary.aliens_remaining,
            cities_remaining = summary.cities_remaining,
            "Round limit reached"
        ),
    }
    info!(reason = ?summary.end_reason, "Invasion ended");
}
