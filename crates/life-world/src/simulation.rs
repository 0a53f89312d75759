//! Generation-stepping engine over a sparse grid.

use crate::grid::{Cell, SparseGrid};
use crate::history::History;
use crate::rule::Rule;
use life_core::{Coordinate, Error, Result, SavedGame, SimulationConfig, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};

/// Lifecycle of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Created, but no population has been loaded yet
    Uninitialized,
    /// Holding a population that can be stepped
    Ready,
}

/// What a single `step()` changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub births: usize,
    pub deaths: usize,
    pub population: usize,
}

/// Why `run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    Extinct,
    StillLife,
    Oscillating { period: usize },
    GenerationLimit,
    /// The driver was told to shut down
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Generations stepped by this run
    pub generations: u64,
    /// Engine generation counter when the run ended
    pub final_generation: u64,
    pub final_population: usize,
    pub stop_reason: StopReason,
}

/// Game of Life engine. Owns its grid exclusively; callers read snapshots.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: SparseGrid,
    rule: Rule,
    state: EngineState,
    generation: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_rule(Rule::conway())
    }

    pub fn with_rule(rule: Rule) -> Self {
        Self {
            grid: SparseGrid::new(),
            rule,
            state: EngineState::Uninitialized,
            generation: 0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Ok(Self::with_rule(config.rule.parse()?))
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replace the population and reset the generation counter.
    /// Duplicate coordinates collapse into one cell.
    pub fn initialize<I>(&mut self, live_cells: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.grid.clear();
        for pos in live_cells {
            self.grid.add(Cell::at(pos));
        }
        self.generation = 0;
        self.state = EngineState::Ready;

        debug!(population = self.grid.len(), rule = %self.rule, "Simulation initialized");
    }

    /// Advance exactly one generation.
    ///
    /// Every survival and birth decision is made against the population as it
    /// stood when the call began; the grid is only mutated once all decisions
    /// are in.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.state == EngineState::Uninitialized {
            return Err(Error::InvalidState(
                "step() called before initialize()".to_string(),
            ));
        }

        // Decide
        let mut dying: Vec<Coordinate> = Vec::new();
        let mut candidates: HashMap<Coordinate, usize> = HashMap::new();

        for cell in self.grid.all_cells() {
            let neighbors = self.grid.neighbors(cell.x(), cell.y());
            if !self.rule.survives(neighbors.alive_count()) {
                dying.push(cell.position());
            }
            // A dead position is listed once by each live neighbor, so its
            // multiplicity is exactly its live-neighbor count.
            for pos in neighbors.absent {
                *candidates.entry(pos).or_insert(0) += 1;
            }
        }

        // Apply
        let deaths = dying.len();
        for pos in dying {
            self.grid.remove(pos.x, pos.y);
        }

        let mut births = 0;
        for (pos, live_neighbors) in candidates {
            if self.rule.is_born(live_neighbors) {
                self.grid.add(Cell::at(pos));
                births += 1;
            }
        }

        self.generation += 1;

        let outcome = StepOutcome {
            births,
            deaths,
            population: self.grid.len(),
        };
        trace!(
            generation = self.generation,
            births,
            deaths,
            population = outcome.population,
            "Generation stepped"
        );

        Ok(outcome)
    }

    /// Current population and bounding box
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.generation,
            alive_cells: self.grid.all_cells().iter().map(Cell::position).collect(),
            bounds: self.grid.measure(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn population(&self) -> usize {
        self.grid.len()
    }

    /// Completed steps since the last `initialize`, or the restored counter
    pub fn generation_count(&self) -> u64 {
        self.generation
    }

    /// Overwrite the counter, e.g. with a persisted turn count
    pub fn set_generation_count(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Load a saved game: its cells become the population and its turn
    /// counter becomes the generation count.
    pub fn restore(&mut self, saved: &SavedGame) {
        self.initialize(saved.coordinates());
        self.generation = saved.turn_counter;

        info!(
            event = "state_restored",
            generation = self.generation,
            population = self.grid.len(),
            "Restored saved game"
        );
    }

    /// Parse and load a saved game. On error the current population is left
    /// exactly as it was.
    pub fn restore_json(&mut self, json: &str) -> Result<()> {
        let saved = SavedGame::from_json(json)?;
        self.restore(&saved);
        Ok(())
    }

    pub fn to_saved_game(&self, show_grid_lines: bool) -> SavedGame {
        SavedGame {
            show_grid_lines,
            ..SavedGame::new(
                self.generation,
                self.grid.all_cells().iter().map(Cell::position),
            )
        }
    }

    /// Step until the generation limit, extinction or a repeated population,
    /// whichever the config asks for first.
    #[instrument(skip(self, config), fields(rule = %self.rule, max_generations = config.max_generations))]
    pub fn run(&mut self, config: &SimulationConfig) -> Result<RunSummary> {
        if config.max_generations == 0 && !config.stop_on_extinction && !config.stop_on_cycle {
            return Err(Error::Validation(
                "run needs a generation limit or a stop condition".to_string(),
            ));
        }

        let mut monitor = StopMonitor::new(self, config);

        info!(
            event = "run_started",
            generation = self.generation,
            population = self.grid.len(),
            "Starting run"
        );

        let stop_reason = loop {
            if let Some(reason) = monitor.before_step(self) {
                break reason;
            }

            self.step()?;

            if let Some(reason) = monitor.after_step(self) {
                break reason;
            }
        };

        let summary = monitor.summary(self, stop_reason);

        info!(
            event = "run_complete",
            generations = summary.generations,
            final_generation = summary.final_generation,
            final_population = summary.final_population,
            stop_reason = ?summary.stop_reason,
            "Run complete"
        );

        Ok(summary)
    }
}

/// Stop conditions of a multi-generation run, checked around each step
#[derive(Debug, Clone)]
pub struct StopMonitor {
    config: SimulationConfig,
    start: u64,
    history: History,
}

impl StopMonitor {
    /// Start watching `sim` from its current generation. With no limit and
    /// no stop condition the monitor never stops on its own.
    pub fn new(sim: &Simulation, config: &SimulationConfig) -> Self {
        let mut history = History::new(config.history_depth);
        history.observe(sim.grid.all_cells());

        Self {
            config: config.clone(),
            start: sim.generation,
            history,
        }
    }

    pub fn before_step(&self, sim: &Simulation) -> Option<StopReason> {
        if self.config.stop_on_extinction && sim.is_empty() {
            return Some(StopReason::Extinct);
        }
        if self.config.max_generations > 0 && self.elapsed(sim) >= self.config.max_generations {
            return Some(StopReason::GenerationLimit);
        }
        None
    }

    /// Record the generation `sim` just reached
    pub fn after_step(&mut self, sim: &Simulation) -> Option<StopReason> {
        if !self.config.stop_on_cycle {
            return None;
        }
        match self.history.observe(sim.grid.all_cells())? {
            1 => Some(StopReason::StillLife),
            period => Some(StopReason::Oscillating { period }),
        }
    }

    pub fn summary(&self, sim: &Simulation, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            generations: self.elapsed(sim),
            final_generation: sim.generation,
            final_population: sim.grid.len(),
            stop_reason,
        }
    }

    fn elapsed(&self, sim: &Simulation) -> u64 {
        sim.generation.saturating_sub(self.start)
    }
}
