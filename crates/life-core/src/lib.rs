//! Core types and utilities for the sparse Game of Life engine.

pub mod types;
pub mod config;
pub mod error;
pub mod state;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use state::{CellRecord, SavedGame};
