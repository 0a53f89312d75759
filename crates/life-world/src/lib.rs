//! Game of Life simulation engine.
//!
//! This crate holds the sparse, unbounded grid of live cells and the engine
//! that advances it one generation at a time.

pub mod grid;
pub mod history;
pub mod patterns;
pub mod rule;
pub mod simulation;

pub use grid::{Cell, Neighbors, SparseGrid};
pub use history::History;
pub use patterns::Pattern;
pub use rule::Rule;
pub use simulation::{EngineState, RunSummary, Simulation, StepOutcome, StopMonitor, StopReason};
