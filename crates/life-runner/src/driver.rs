//! Drives a simulation: seeding, paced stepping, and saving.

use crate::checkpoint;
use anyhow::{Context, Result};
use life_core::RunnerConfig;
use life_world::{patterns, RunSummary, Simulation, StopMonitor, StopReason};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::path::Path;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Where the starting population came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    SavedGame { turn_counter: u64 },
    Pattern(&'static str),
    Soup { seed: u64 },
}

pub struct Driver {
    config: RunnerConfig,
    simulation: Simulation,
}

impl Driver {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let simulation = Simulation::from_config(&config.simulation)
            .with_context(|| format!("invalid rule '{}'", config.simulation.rule))?;

        Ok(Self { config, simulation })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Load the saved game if one is configured and readable, otherwise start
    /// from the configured pattern.
    pub async fn seed(&mut self) -> Result<Seed> {
        if let Some(path) = self.config.state_path.as_deref() {
            match checkpoint::load_saved_game(Path::new(path)).await {
                Ok(saved) => {
                    self.simulation.restore(&saved);
                    return Ok(Seed::SavedGame {
                        turn_counter: saved.turn_counter,
                    });
                }
                Err(e) => {
                    warn!(path, error = %e, "Failed to load saved game, starting from pattern");
                }
            }
        }

        self.seed_from_pattern()
    }

    fn seed_from_pattern(&mut self) -> Result<Seed> {
        if self.config.pattern.eq_ignore_ascii_case("soup") {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
            let cells = patterns::random_soup(
                self.config.soup_width,
                self.config.soup_height,
                self.config.soup_density,
                &mut rng,
            );
            self.simulation.initialize(cells);
            info!(
                seed = self.config.seed,
                width = self.config.soup_width,
                height = self.config.soup_height,
                population = self.simulation.population(),
                "Seeded random soup"
            );
            return Ok(Seed::Soup {
                seed: self.config.seed,
            });
        }

        let pattern = patterns::find(&self.config.pattern)?;
        self.simulation.initialize(pattern.coordinates());
        info!(
            pattern = pattern.name,
            population = self.simulation.population(),
            "Seeded pattern"
        );
        Ok(Seed::Pattern(pattern.name))
    }

    /// Step until a stop condition holds or `shutdown` completes
    #[instrument(skip(self, shutdown), fields(interval_ms = self.config.interval_ms))]
    pub async fn run<F>(&mut self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut monitor = StopMonitor::new(&self.simulation, &self.config.simulation);
        let mut ticker = (self.config.interval_ms > 0).then(|| {
            let mut ticker = interval(Duration::from_millis(self.config.interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        self.log_snapshot();

        let stop_reason = loop {
            if let Some(reason) = monitor.before_step(&self.simulation) {
                break reason;
            }

            match ticker.as_mut() {
                Some(ticker) => tokio::select! {
                    biased;
                    _ = &mut shutdown => break StopReason::Interrupted,
                    _ = ticker.tick() => {}
                },
                None => tokio::select! {
                    biased;
                    _ = &mut shutdown => break StopReason::Interrupted,
                    _ = tokio::task::yield_now() => {}
                },
            }

            let outcome = self.simulation.step()?;
            debug!(
                generation = self.simulation.generation_count(),
                births = outcome.births,
                deaths = outcome.deaths,
                population = outcome.population,
                "Generation"
            );

            let every = self.config.snapshot_every;
            if every > 0 && self.simulation.generation_count() % every == 0 {
                self.log_snapshot();
            }

            if let Some(reason) = monitor.after_step(&self.simulation) {
                break reason;
            }
        };

        let summary = monitor.summary(&self.simulation, stop_reason);
        info!(
            event = "run_complete",
            generations = summary.generations,
            final_generation = summary.final_generation,
            final_population = summary.final_population,
            stop_reason = ?summary.stop_reason,
            "Simulation stopped"
        );

        Ok(summary)
    }

    /// Write the current game to the configured save path, if any
    pub async fn save(&self) -> Result<()> {
        let Some(path) = self.config.save_path.as_deref() else {
            return Ok(());
        };

        let saved = self.simulation.to_saved_game(true);
        checkpoint::write_saved_game(Path::new(path), &saved)
            .await
            .with_context(|| format!("failed to save game to {}", path))?;
        Ok(())
    }

    fn log_snapshot(&self) {
        let snapshot = self.simulation.snapshot();
        info!(
            event = "snapshot",
            generation = snapshot.generation,
            population = snapshot.population(),
            width = snapshot.bounds.width,
            height = snapshot.bounds.height,
            min_x = snapshot.bounds.bounds.min_x,
            min_y = snapshot.bounds.bounds.min_y,
            "Population snapshot"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::{Coordinate, SavedGame, SimulationConfig};
    use std::collections::HashSet;

    fn config() -> RunnerConfig {
        RunnerConfig {
            interval_ms: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_seed_from_pattern() {
        let mut driver = Driver::new(RunnerConfig {
            pattern: "Blinker".to_string(),
            ..config()
        })
        .unwrap();

        assert_eq!(driver.seed().await.unwrap(), Seed::Pattern("blinker"));
        assert_eq!(driver.simulation().population(), 3);
    }

    #[tokio::test]
    async fn test_seed_from_soup() {
        let mut driver = Driver::new(RunnerConfig {
            pattern: "soup".to_string(),
            seed: 3,
            soup_width: 16,
            soup_height: 16,
            ..config()
        })
        .unwrap();

        assert_eq!(driver.seed().await.unwrap(), Seed::Soup { seed: 3 });
        assert!(driver.simulation().population() > 0);
    }

    #[tokio::test]
    async fn test_unknown_pattern_fails() {
        let mut driver = Driver::new(RunnerConfig {
            pattern: "nope".to_string(),
            ..config()
        })
        .unwrap();
        assert!(driver.seed().await.is_err());
    }

    #[tokio::test]
    async fn test_bad_saved_game_falls_back_to_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();

        let mut driver = Driver::new(RunnerConfig {
            state_path: Some(path.to_string_lossy().into_owned()),
            ..config()
        })
        .unwrap();

        assert_eq!(driver.seed().await.unwrap(), Seed::Pattern("glider"));
        assert_eq!(driver.simulation().generation_count(), 0);
    }

    #[tokio::test]
    async fn test_resume_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("resume-in.json");
        let out = dir.path().join("resume-out.json");
        let blinker = SavedGame::new(
            10,
            [Coordinate::new(1, 0), Coordinate::new(2, 0), Coordinate::new(3, 0)],
        );
        std::fs::write(&state, blinker.to_json().unwrap()).unwrap();

        let mut driver = Driver::new(RunnerConfig {
            state_path: Some(state.to_string_lossy().into_owned()),
            save_path: Some(out.to_string_lossy().into_owned()),
            simulation: SimulationConfig {
                max_generations: 3,
                ..Default::default()
            },
            ..config()
        })
        .unwrap();

        assert_eq!(driver.seed().await.unwrap(), Seed::SavedGame { turn_counter: 10 });
        let summary = driver.run(std::future::pending()).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::GenerationLimit);
        assert_eq!(summary.final_generation, 13);

        driver.save().await.unwrap();
        let saved = SavedGame::from_json(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let cells: HashSet<Coordinate> = saved.coordinates().collect();
        assert_eq!(saved.turn_counter, 13);
        assert_eq!(
            cells,
            HashSet::from([Coordinate::new(2, -1), Coordinate::new(2, 0), Coordinate::new(2, 1)])
        );
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_run() {
        let mut driver = Driver::new(RunnerConfig {
            interval_ms: 10,
            simulation: SimulationConfig {
                max_generations: 0,
                ..Default::default()
            },
            ..config()
        })
        .unwrap();
        driver.seed().await.unwrap();

        let summary = driver.run(std::future::ready(())).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.generations, 0);
    }

    #[tokio::test]
    async fn test_unbounded_run_stops_on_shutdown() {
        let mut driver = Driver::new(RunnerConfig {
            pattern: "block".to_string(),
            simulation: SimulationConfig {
                max_generations: 0,
                stop_on_extinction: false,
                stop_on_cycle: false,
                ..Default::default()
            },
            ..config()
        })
        .unwrap();
        assert!(driver.config.validate().is_ok());
        driver.seed().await.unwrap();

        let summary = driver.run(std::future::ready(())).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.final_population, 4);

        // Runs until the shutdown future fires, not before
        let shutdown = tokio::time::sleep(Duration::from_millis(20));
        let summary = driver.run(shutdown).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert!(summary.generations > 0);
        assert_eq!(driver.simulation().population(), 4);
    }

    #[tokio::test]
    async fn test_run_until_extinct() {
        let mut driver = Driver::new(RunnerConfig {
            pattern: "diehard".to_string(),
            simulation: SimulationConfig {
                max_generations: 500,
                ..Default::default()
            },
            ..config()
        })
        .unwrap();
        driver.seed().await.unwrap();

        let summary = driver.run(std::future::pending()).await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::Extinct);
        assert_eq!(summary.generations, 130);
    }
}
