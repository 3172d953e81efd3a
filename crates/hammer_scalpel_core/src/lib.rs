//! Hammer and scalpel: optimal isolation policy during an epidemic
//!
//! This crate solves a finite-horizon planning problem in which a government
//! chooses how many people to isolate each week, with or without imperfect
//! testing. It supports:
//! - A baseline epidemic with no government response
//! - Blanket isolation without tests (the hammer)
//! - Isolation conditioned on random or targeted tests (the scalpel)
//! - Isolation of traced contacts without tests
//! - Value-function iteration on a bilinear state grid with a derivative-free
//!   optimizer at every node
//! - Stored result bundles so figures can be rebuilt without re-solving
//!
//! # Example
//!
//! ```no_run
//! use hammer_scalpel_core::{ModelParameters, SolveOptions, solve_model};
//!
//! let options = SolveOptions {
//!     params: ModelParameters::default().horizon(26).grid_points(12),
//!     workers: Some(5),
//!     ..Default::default()
//! };
//! let solution = solve_model(&options)?;
//! for result in &solution.results {
//!     println!("{}: welfare {:.2}", result.scenario, result.welfare);
//! }
//! # Ok::<(), hammer_scalpel_core::error::SolveError>(())
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod grid;
pub mod optimization;
pub mod scenarios;
pub mod solver;
pub mod storage;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ConfigError, SolveError, StorageError};
pub use model::{
    Controls, ModelParameters, ModelSolution, Policy, Scenario, ScenarioResult, TimeSeries,
};
pub use optimization::OptimizerAlgorithm;
pub use scenarios::{SolveOptions, nopolicy, run_scenario, solve_model, withpolicy};
pub use storage::ResultStore;
