//! Engine binary for the alien invasion simulation.
//!
//! Wires together configuration, the map file, the orchestrator, and the
//! chosen driver, then reports what is left of the world.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line flags
//! 2. Load configuration (`--config`, else `invasion-config.yaml`) and apply the flags
//! 3. Initialize structured logging (tracing)
//! 4. Load the map and build the world
//! 5. Build the orchestrator with the event sink
//! 6. Run the batch or interactive driver
//! 7. Print the surviving map and optionally write it to a file

mod cli;
mod error;
mod interactive;
mod mapfile;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use invasion_core::config::{LoggingConfig, OutputConfig, SimulationConfig};
use invasion_core::{EventSink, InvasionEvent, JsonLinesSink, TracingSink, runner};
use invasion_world::Topology;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::EngineError;

/// Application entry point for the invasion engine.
///
/// # Errors
///
/// Returns an error if loading, initialization, or output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, from_file) = cli.load_config()?;
    cli.apply(&mut config);
    init_logging(&config.logging);

    info!("invasion engine starting");
    if !from_file {
        info!(path = %cli.config_path().display(), "Config file not found, using defaults");
    }

    if let Err(e) = run(&config) {
        error!(error = %e, "invasion engine failed");
        return Err(e.into());
    }
    Ok(())
}

fn run(config: &SimulationConfig) -> Result<(), EngineError> {
    let seed = config.aliens.seed.unwrap_or_else(clock_seed);
    let topology = if config.world.directed {
        Topology::Directed
    } else {
        Topology::Undirected
    };
    info!(
        map = %config.world.map_path.display(),
        aliens = config.aliens.count,
        max_rounds = config.simulation.max_rounds,
        seed,
        interactive = config.simulation.interactive,
        "Configuration loaded"
    );

    let world = mapfile::load_world(&config.world.map_path, topology)?;
    let sink = event_sink(&config.output)?;

    let world = if config.simulation.interactive {
        let mut orchestrator = runner::build_orchestrator(config, seed, world, sink)?;
        let steps = interactive::run_interactive(
            &mut orchestrator,
            std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
        )?;
        info!(steps, rounds = orchestrator.rounds_completed(), "Interactive session finished");
        orchestrator.into_world()
    } else {
        runner::run_simulation(config, seed, world, sink)?.world
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Simulation done, this is what's left of the world:")?;
    write!(stdout, "{world}")?;
    stdout.flush()?;

    if let Some(path) = &config.output.map_path {
        mapfile::write_world(path, &world)?;
    }

    info!(
        cities_remaining = world.city_count(),
        cities_destroyed = world.destroyed().len(),
        "invasion engine shutdown complete"
    );
    Ok(())
}

/// Logs go to stderr so the surviving map on stdout stays clean.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.is_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed
                .as_secs()
                .wrapping_mul(1_000_000_000)
                .wrapping_add(u64::from(elapsed.subsec_nanos()))
        })
}

/// Logs every event and also appends it to the events file.
struct RecordedTracingSink {
    file: JsonLinesSink<BufWriter<File>>,
}

impl EventSink for RecordedTracingSink {
    fn on_event(&mut self, event: &InvasionEvent) {
        TracingSink.on_event(event);
        self.file.on_event(event);
    }
}

fn event_sink(output: &OutputConfig) -> Result<Box<dyn EventSink>, EngineError> {
    let Some(path) = &output.events_path else {
        return Ok(Box::new(TracingSink));
    };
    let file = File::create(path).map_err(|source| EngineError::File {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Recording events");
    Ok(Box::new(RecordedTracingSink {
        file: JsonLinesSink::new(BufWriter::new(file)),
    }))
}
