//! Optimizer selection

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: usize = 200;
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Algorithm used to maximize the Bellman objective at a grid node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerAlgorithm {
    /// Nelder-Mead simplex with bound clamping
    NelderMead { max_iterations: usize, tolerance: f64 },

    /// Exhaustive grid over the control box, polished by Nelder-Mead from the
    /// best grid point
    GridSearch { grid_size: usize },

    /// Grid search for a single control, Nelder-Mead seeded from a coarse
    /// grid otherwise
    #[default]
    Auto,
}

impl OptimizerAlgorithm {
    pub fn nelder_mead() -> Self {
        OptimizerAlgorithm::NelderMead {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn grid_search(grid_size: usize) -> Self {
        OptimizerAlgorithm::GridSearch { grid_size }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptimizerAlgorithm::NelderMead { .. } => "nelder-mead",
            OptimizerAlgorithm::GridSearch { .. } => "grid",
            OptimizerAlgorithm::Auto => "auto",
        }
    }
}
