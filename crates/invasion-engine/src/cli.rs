//! Command-line flags.
//!
//! Every flag is optional. Unset flags leave the loaded configuration
//! alone, so the precedence is: flag, then environment, then YAML, then the
//! built-in default.

use std::path::{Path, PathBuf};

use clap::Parser;
use invasion_core::config::SimulationConfig;

use crate::error::EngineError;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "invasion-config.yaml";

/// Alien invasion simulation.
#[derive(Debug, Parser)]
#[command(name = "invasion")]
#[command(about = "Unleash aliens on a map of cities and see what is left")]
#[command(version)]
pub struct Cli {
    /// Map file; a `.json` extension selects the JSON form [default: map.txt]
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Number of aliens [default: 5]
    #[arg(short = 'n', long)]
    pub aliens: Option<u32>,

    /// Maximum number of rounds [default: 10000]
    #[arg(long)]
    pub rounds: Option<u64>,

    /// Treat roads as one-way
    #[arg(long, overrides_with = "undirected")]
    pub directed: bool,

    /// Treat roads as two-way, even if the config says otherwise
    #[arg(long, overrides_with = "directed")]
    pub undirected: bool,

    /// Random seed [default: derived from the clock]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the surviving map here; `.json` selects the JSON form
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write every event as JSON lines here
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// YAML configuration file; must exist when given [default: invasion-config.yaml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Step aliens one at a time from stdin
    #[arg(long, overrides_with = "batch")]
    pub interactive: bool,

    /// Run every round without prompting, even if the config says otherwise
    #[arg(long, overrides_with = "interactive")]
    pub batch: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// The configuration file this run reads from.
    pub fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG))
    }

    /// Load the configuration named by `--config`.
    ///
    /// Without the flag a missing default file means built-in defaults plus
    /// environment overrides; the returned flag is `false` in that case.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the file cannot be read or parsed,
    /// including when an explicitly given file does not exist.
    pub fn load_config(&self) -> Result<(SimulationConfig, bool), EngineError> {
        let path = self.config_path();
        if self.config.is_none() && !path.exists() {
            let mut config = SimulationConfig::default();
            config.apply_env_overrides();
            return Ok((config, false));
        }
        Ok((SimulationConfig::from_file(path)?, true))
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(map) = &self.map {
            config.world.map_path.clone_from(map);
        }
        if self.directed {
            config.world.directed = true;
        } else if self.undirected {
            config.world.directed = false;
        }
        if let Some(aliens) = self.aliens {
            config.aliens.count = aliens;
        }
        if let Some(seed) = self.seed {
            config.aliens.seed = Some(seed);
        }
        if let Some(rounds) = self.rounds {
            config.simulation.max_rounds = rounds;
        }
        if self.interactive {
            config.simulation.interactive = true;
        } else if self.batch {
            config.simulation.interactive = false;
        }
        if let Some(output) = &self.output {
            config.output.map_path = Some(output.clone());
        }
        if let Some(events) = &self.events {
            config.output.events_path = Some(events.clone());
        }
        if self.json_logs {
            "json".clone_into(&mut config.logging.format);
        }
    }
}
