//! Bounded derivative-free maximization
//!
//! The solver maximizes the Bellman objective over isolation rates at every
//! grid node and period. Controls live in a small box (one or two rates in
//! `[0, 1]`), so simple derivative-free methods are enough.
//!
//! # Example
//!
//! ```
//! use hammer_scalpel_core::optimization::{OptimizerAlgorithm, maximize};
//!
//! let result = maximize(
//!     &OptimizerAlgorithm::nelder_mead(),
//!     &[(0.0, 1.0)],
//!     None,
//!     |x| -(x[0] - 0.25).powi(2),
//! );
//! assert!((result.point[0] - 0.25).abs() < 1e-3);
//! ```

mod config;
mod grid_search;
mod nelder_mead;
mod result;

pub use config::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, OptimizerAlgorithm};
pub use grid_search::{best_grid_point, optimize_grid_search};
pub use nelder_mead::optimize_nelder_mead;
pub use result::{OptimizationResult, TerminationReason};

/// Grid used by `Auto` for a single control
const AUTO_GRID_1D: usize = 11;
/// Coarse grid used by `Auto` to seed the simplex for several controls
const AUTO_SEED_GRID: usize = 5;
/// Initial simplex edge for a plain Nelder-Mead run
const NELDER_MEAD_STEP: f64 = 0.1;

/// Main optimization entry point
///
/// # Arguments
/// * `algorithm` - Which method to use
/// * `bounds` - `(min, max)` per control
/// * `warm_start` - Starting point for the simplex methods; the box center
///   when absent
/// * `objective` - Function to maximize
pub fn maximize<F>(
    algorithm: &OptimizerAlgorithm,
    bounds: &[(f64, f64)],
    warm_start: Option<&[f64]>,
    mut objective: F,
) -> OptimizationResult
where
    F: FnMut(&[f64]) -> f64,
{
    let center: Vec<f64>;
    let start = match warm_start {
        Some(start) => start,
        None => {
            center = bounds.iter().map(|(min, max)| (min + max) / 2.0).collect();
            &center
        }
    };

    match *algorithm {
        OptimizerAlgorithm::NelderMead {
            max_iterations,
            tolerance,
        } => optimize_nelder_mead(
            objective,
            bounds,
            start,
            NELDER_MEAD_STEP,
            max_iterations,
            tolerance,
        ),
        OptimizerAlgorithm::GridSearch { grid_size } => optimize_grid_search(
            objective,
            bounds,
            grid_size,
            DEFAULT_MAX_ITERATIONS,
            DEFAULT_TOLERANCE,
        ),
        OptimizerAlgorithm::Auto => {
            if bounds.len() == 1 {
                return optimize_grid_search(
                    objective,
                    bounds,
                    AUTO_GRID_1D,
                    DEFAULT_MAX_ITERATIONS,
                    DEFAULT_TOLERANCE,
                );
            }

            // Seed the simplex from whichever is better: the warm start or
            // the best point of a coarse grid
            let seed = best_grid_point(&mut objective, bounds, AUTO_SEED_GRID);
            let warm_value = nelder_mead::sanitize(objective(start));
            let (seed_point, seed_evaluations) = if warm_value > seed.objective {
                (start.to_vec(), seed.evaluations + 1)
            } else {
                (seed.point, seed.evaluations + 1)
            };

            let result = optimize_nelder_mead(
                &mut objective,
                bounds,
                &seed_point,
                0.5 / (AUTO_SEED_GRID - 1) as f64,
                DEFAULT_MAX_ITERATIONS,
                DEFAULT_TOLERANCE,
            );
            OptimizationResult {
                evaluations: result.evaluations + seed_evaluations,
                ..result
            }
        }
    }
}
