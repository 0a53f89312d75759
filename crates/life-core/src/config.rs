//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Birth/survival rule in B/S notation
    pub rule: String,
    /// Stop after this many generations (0 = no limit)
    pub max_generations: u64,
    /// Number of past generations remembered for cycle detection
    pub history_depth: usize,
    /// Stop once the population dies out
    pub stop_on_extinction: bool,
    /// Stop once the population repeats an earlier generation
    pub stop_on_cycle: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rule: "B3/S23".to_string(),
            max_generations: 0,
            history_depth: 16,
            stop_on_extinction: true,
            stop_on_cycle: false,
        }
    }
}

/// Log output format for the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Validation(format!("unknown log format '{}'", other))),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Named seed pattern, or "soup" for a random field
    pub pattern: String,
    /// Seed for the random soup
    pub seed: u64,
    /// Random soup width
    pub soup_width: i64,
    /// Random soup height
    pub soup_height: i64,
    /// Probability of a soup cell starting alive (0.0 to 1.0)
    pub soup_density: f64,
    /// Saved game to resume from
    pub state_path: Option<String>,
    /// Where to write the final saved game
    pub save_path: Option<String>,
    /// Delay between generations (milliseconds, 0 = unpaced)
    pub interval_ms: u64,
    /// Emit a snapshot log line every N generations
    pub snapshot_every: u64,
    pub log_format: LogFormat,
    pub simulation: SimulationConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pattern: "glider".to_string(),
            seed: 0,
            soup_width: 64,
            soup_height: 64,
            soup_density: 0.3,
            state_path: None,
            save_path: None,
            interval_ms: 50,
            snapshot_every: 100,
            log_format: LogFormat::Pretty,
            simulation: SimulationConfig {
                max_generations: 1_000,
                ..Default::default()
            },
        }
    }
}

/// Largest random soup area the runner will seed
pub const MAX_SOUP_CELLS: i64 = 1 << 24;

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{} has invalid value '{}'", key, value)))
}

impl RunnerConfig {
    /// Defaults overridden by `LIFE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LIFE_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for key in [
            "LIFE_PATTERN",
            "LIFE_SEED",
            "LIFE_SOUP_WIDTH",
            "LIFE_SOUP_HEIGHT",
            "LIFE_SOUP_DENSITY",
            "LIFE_STATE_PATH",
            "LIFE_SAVE_PATH",
            "LIFE_INTERVAL_MS",
            "LIFE_SNAPSHOT_EVERY",
            "LIFE_LOG_FORMAT",
            "LIFE_RULE",
            "LIFE_MAX_GENERATIONS",
            "LIFE_HISTORY_DEPTH",
            "LIFE_STOP_ON_EXTINCTION",
            "LIFE_STOP_ON_CYCLE",
        ] {
            let Some(value) = lookup(key) else { continue };
            debug!(key, value = %value, "Config override");

            match key {
                "LIFE_PATTERN" => config.pattern = value,
                "LIFE_SEED" => config.seed = parse_var(key, &value)?,
                "LIFE_SOUP_WIDTH" => config.soup_width = parse_var(key, &value)?,
                "LIFE_SOUP_HEIGHT" => config.soup_height = parse_var(key, &value)?,
                "LIFE_SOUP_DENSITY" => config.soup_density = parse_var(key, &value)?,
                "LIFE_STATE_PATH" => config.state_path = Some(value),
                "LIFE_SAVE_PATH" => config.save_path = Some(value),
                "LIFE_INTERVAL_MS" => config.interval_ms = parse_var(key, &value)?,
                "LIFE_SNAPSHOT_EVERY" => config.snapshot_every = parse_var(key, &value)?,
                "LIFE_LOG_FORMAT" => config.log_format = value.parse()?,
                "LIFE_RULE" => config.simulation.rule = value,
                "LIFE_MAX_GENERATIONS" => {
                    config.simulation.max_generations = parse_var(key, &value)?
                }
                "LIFE_HISTORY_DEPTH" => config.simulation.history_depth = parse_var(key, &value)?,
                "LIFE_STOP_ON_EXTINCTION" => {
                    config.simulation.stop_on_extinction = parse_var(key, &value)?
                }
                "LIFE_STOP_ON_CYCLE" => config.simulation.stop_on_cycle = parse_var(key, &value)?,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.soup_density) {
            return Err(Error::Validation(format!(
                "soup density {} is outside 0.0..=1.0",
                self.soup_density
            )));
        }

        if self.soup_width <= 0 || self.soup_height <= 0 {
            return Err(Error::Validation(format!(
                "soup dimensions {}x{} must be positive",
                self.soup_width, self.soup_height
            )));
        }

        match self.soup_width.checked_mul(self.soup_height) {
            Some(area) if area <= MAX_SOUP_CELLS => {}
            _ => {
                return Err(Error::Validation(format!(
                    "soup dimensions {}x{} exceed {} cells",
                    self.soup_width, self.soup_height, MAX_SOUP_CELLS
                )))
            }
        }

        if self.simulation.stop_on_cycle && self.simulation.history_depth == 0 {
            return Err(Error::Validation(
                "cycle detection needs a history depth of at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
