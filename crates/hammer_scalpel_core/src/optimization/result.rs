//! Optimization result types

use serde::{Deserialize, Serialize};

/// Reason why optimization terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The simplex collapsed below tolerance, or the grid was exhausted
    Converged,

    /// Maximum iterations reached without convergence
    MaxIterationsReached,
}

/// Final result from a bounded maximization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best point found
    pub point: Vec<f64>,

    /// Objective at `point`; `-inf` if nothing finite was found
    pub objective: f64,

    /// Simplex iterations performed (0 for a pure grid)
    pub iterations: usize,

    /// Number of objective evaluations
    pub evaluations: usize,

    pub termination_reason: TerminationReason,
}

impl OptimizationResult {
    pub fn converged(&self) -> bool {
        self.termination_reason == TerminationReason::Converged
    }
}
