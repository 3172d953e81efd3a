//! Grid search optimization
//!
//! Grid search exhaustively evaluates points on a regular grid across the
//! control box. It is guaranteed to find the best point within the grid
//! resolution and never misses a corner solution (full or zero isolation),
//! which the Bellman objective of this model frequently has. The best grid
//! point is then polished with a short Nelder-Mead run.

use super::nelder_mead::{optimize_nelder_mead, sanitize};
use super::result::{OptimizationResult, TerminationReason};

/// Generate all grid points for the box
pub(crate) fn generate_grid_points(bounds: &[(f64, f64)], grid_size: usize) -> Vec<Vec<f64>> {
    if bounds.is_empty() {
        return vec![vec![]];
    }

    let mut points = Vec::new();
    let mut indices = vec![0usize; bounds.len()];

    loop {
        let point: Vec<f64> = indices
            .iter()
            .zip(bounds.iter())
            .map(|(&idx, &(min, max))| {
                if grid_size <= 1 {
                    (min + max) / 2.0
                } else {
                    min + (max - min) * (idx as f64) / (grid_size - 1) as f64
                }
            })
            .collect();
        points.push(point);

        // Increment indices (like counting in base grid_size)
        let mut carry = true;
        for index in indices.iter_mut() {
            if carry {
                *index += 1;
                if *index >= grid_size.max(1) {
                    *index = 0;
                } else {
                    carry = false;
                }
            }
        }

        if carry {
            break;
        }
    }

    points
}

/// Best point of an exhaustive grid, without polishing
pub fn best_grid_point<F>(
    objective: &mut F,
    bounds: &[(f64, f64)],
    grid_size: usize,
) -> OptimizationResult
where
    F: FnMut(&[f64]) -> f64,
{
    let points = generate_grid_points(bounds, grid_size);
    let evaluations = points.len();

    let mut best_point = points[0].clone();
    let mut best_objective = f64::NEG_INFINITY;
    for point in points {
        let value = sanitize(objective(&point));
        if value > best_objective {
            best_objective = value;
            best_point = point;
        }
    }

    OptimizationResult {
        point: best_point,
        objective: best_objective,
        iterations: 0,
        evaluations,
        termination_reason: TerminationReason::Converged,
    }
}

/// Grid search followed by a Nelder-Mead polish started from the best node.
///
/// The polish starts with an edge of half a grid cell, so it explores only the
/// neighbourhood of the grid optimum. The polished point is kept only if it
/// improves on the grid.
pub fn optimize_grid_search<F>(
    mut objective: F,
    bounds: &[(f64, f64)],
    grid_size: usize,
    max_iterations: usize,
    tolerance: f64,
) -> OptimizationResult
where
    F: FnMut(&[f64]) -> f64,
{
    let coarse = best_grid_point(&mut objective, bounds, grid_size);
    if grid_size <= 1 || max_iterations == 0 {
        return coarse;
    }

    let step_fraction = 0.5 / (grid_size - 1) as f64;
    let polished = optimize_nelder_mead(
        &mut objective,
        bounds,
        &coarse.point,
        step_fraction,
        max_iterations,
        tolerance,
    );

    let evaluations = coarse.evaluations + polished.evaluations;
    if polished.objective > coarse.objective {
        OptimizationResult {
            evaluations,
            ..polished
        }
    } else {
        OptimizationResult {
            evaluations,
            iterations: polished.iterations,
            termination_reason: polished.termination_reason,
            ..coarse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_grid_points_1d() {
        let points = generate_grid_points(&[(0.0, 1.0)], 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], vec![0.0]);
        assert_eq!(points[4], vec![1.0]);
    }

    #[test]
    fn test_generate_grid_points_2d() {
        let points = generate_grid_points(&[(0.0, 1.0), (0.0, 2.0)], 3);
        assert_eq!(points.len(), 9);
        assert!(points.contains(&vec![0.0, 0.0]));
        assert!(points.contains(&vec![1.0, 2.0]));
        assert!(points.contains(&vec![0.5, 1.0]));
    }

    #[test]
    fn test_single_point_grid_uses_center() {
        let points = generate_grid_points(&[(0.0, 1.0)], 1);
        assert_eq!(points, vec![vec![0.5]]);
    }

    #[test]
    fn test_finds_corner_solution() {
        let result = optimize_grid_search(|x| x[0] + x[1], &[(0.0, 1.0), (0.0, 1.0)], 5, 100, 1e-8);
        assert_eq!(result.point, vec![1.0, 1.0]);
        assert!((result.objective - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_polish_improves_on_grid() {
        let objective = |x: &[f64]| -(x[0] - 0.33).powi(2);
        let coarse = best_grid_point(&mut { objective }, &[(0.0, 1.0)], 5);
        let polished = optimize_grid_search(objective, &[(0.0, 1.0)], 5, 200, 1e-9);
        assert!(polished.objective >= coarse.objective);
        assert!((polished.point[0] - 0.33).abs() < 1e-4, "{:?}", polished.point);
        assert!(polished.evaluations > coarse.evaluations);
    }

    #[test]
    fn test_grid_contains_zero_control() {
        // Never worse than doing nothing when doing nothing is on the grid
        let objective = |x: &[f64]| if x[0] == 0.0 { 1.0 } else { 0.0 };
        let result = optimize_grid_search(objective, &[(0.0, 1.0)], 7, 50, 1e-8);
        assert_eq!(result.objective, 1.0);
        assert_eq!(result.point, vec![0.0]);
    }
}
