//! Configuration loading and typed config structures for the invasion.
//!
//! The configuration lives in `invasion-config.yaml` at the project root.
//! Every section and field is optional; missing values fall back to the
//! defaults below, so an empty file is a valid configuration. Command-line
//! flags in the engine take precedence over anything loaded here.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Environment variable overriding `world.map_path`.
pub const MAP_ENV: &str = "INVASION_MAP";

/// Environment variable overriding `aliens.seed`.
pub const SEED_ENV: &str = "INVASION_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level invasion configuration.
///
/// Mirrors the structure of `invasion-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Where the map comes from and how roads behave.
    #[serde(default)]
    pub world: WorldConfig,

    /// How many aliens land and how they are placed.
    #[serde(default)]
    pub aliens: AlienConfig,

    /// Run length and driving mode.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `INVASION_MAP` overrides `world.map_path`
    /// - `INVASION_SEED` overrides `aliens.seed`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override values from the process environment when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override values from an arbitrary variable lookup.
    ///
    /// An `INVASION_SEED` that is not a `u64` is ignored with a warning.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(MAP_ENV) {
            self.world.map_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.aliens.seed = Some(seed),
                Err(e) => warn!(value = raw.as_str(), error = %e, "ignoring {SEED_ENV}"),
            }
        }
    }
}

/// World settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Map file. A `.json` extension selects the JSON form.
    #[serde(default = "default_map_path")]
    pub map_path: PathBuf,

    /// Whether roads are one-way.
    #[serde(default)]
    pub directed: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_path: default_map_path(),
            directed: false,
        }
    }
}

/// Alien settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlienConfig {
    /// Number of aliens placed at random.
    #[serde(default = "default_alien_count")]
    pub count: u32,

    /// Random seed. `None` means the engine derives one from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AlienConfig {
    fn default() -> Self {
        Self {
            count: default_alien_count(),
            seed: None,
        }
    }
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Upper bound on batch rounds.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,

    /// Step aliens one at a time from stdin instead of running batches.
    #[serde(default)]
    pub interactive: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            interactive: false,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Write the surviving map here. `.json` selects the JSON form.
    #[serde(default)]
    pub map_path: Option<PathBuf>,

    /// Write every event as JSON lines here.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log output was requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_map_path() -> PathBuf {
    PathBuf::from("map.txt")
}

const fn default_alien_count() -> u32 {
    5
}

const fn default_max_rounds() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "text".to_owned()
}
