//! Nelder-Mead simplex optimization
//!
//! The Nelder-Mead algorithm is a derivative-free optimization method that
//! works well for continuous, low-dimensional problems. It maintains a simplex
//! of N+1 points in N-dimensional space and iteratively transforms the simplex
//! toward the optimum. Trial points are clamped to the bounding box, which is
//! enough for the isolation-rate controls of this model.

use super::result::{OptimizationResult, TerminationReason};

/// Standard Nelder-Mead coefficients
const REFLECTION_COEF: f64 = 1.0;
const EXPANSION_COEF: f64 = 2.0;
const CONTRACTION_COEF: f64 = 0.5;
const SHRINK_COEF: f64 = 0.5;

/// A point in parameter space with its evaluation
#[derive(Clone)]
struct SimplexVertex {
    values: Vec<f64>,
    objective: f64,
}

/// Counts evaluations and maps non-finite values to `-inf`
struct Evaluator<F> {
    objective: F,
    evaluations: usize,
}

impl<F: FnMut(&[f64]) -> f64> Evaluator<F> {
    fn vertex(&mut self, values: Vec<f64>) -> SimplexVertex {
        self.evaluations += 1;
        let objective = sanitize((self.objective)(&values));
        SimplexVertex { values, objective }
    }
}

pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::NEG_INFINITY
    }
}

/// Initialize the simplex with N+1 points around `start`
fn initialize_simplex<F: FnMut(&[f64]) -> f64>(
    eval: &mut Evaluator<F>,
    start: &[f64],
    bounds: &[(f64, f64)],
    step_fraction: f64,
) -> Vec<SimplexVertex> {
    let n = bounds.len();
    let mut simplex = Vec::with_capacity(n + 1);

    let mut center = start.to_vec();
    clamp_to_bounds(&mut center, bounds);
    simplex.push(eval.vertex(center.clone()));

    // Perturb each dimension, stepping back from the upper bound if needed
    for i in 0..n {
        let mut point = center.clone();
        let (min, max) = bounds[i];
        let step = step_fraction * (max - min);

        if point[i] + step <= max {
            point[i] += step;
        } else {
            point[i] -= step;
        }

        simplex.push(eval.vertex(point));
    }

    simplex
}

/// Calculate the centroid of all points except the worst
fn centroid(simplex: &[SimplexVertex]) -> Vec<f64> {
    let n = simplex[0].values.len();
    let mut center = vec![0.0; n];

    for vertex in simplex.iter().take(simplex.len() - 1) {
        for (i, val) in vertex.values.iter().enumerate() {
            center[i] += val;
        }
    }

    let count = (simplex.len() - 1) as f64;
    for val in &mut center {
        *val /= count;
    }

    center
}

/// Reflect a point through the centroid
fn reflect(point: &[f64], centroid: &[f64], coef: f64) -> Vec<f64> {
    point
        .iter()
        .zip(centroid.iter())
        .map(|(p, c)| c + coef * (c - p))
        .collect()
}

/// Clamp values to bounds
pub(crate) fn clamp_to_bounds(values: &mut [f64], bounds: &[(f64, f64)]) {
    for (val, (min, max)) in values.iter_mut().zip(bounds.iter()) {
        *val = val.clamp(*min, *max);
    }
}

/// Calculate simplex size (max distance from the best vertex)
fn simplex_size(simplex: &[SimplexVertex]) -> f64 {
    let best = &simplex[0].values;
    simplex
        .iter()
        .map(|v| {
            v.values
                .iter()
                .zip(best.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0_f64, |a, b| a.max(b))
}

fn sort_best_first(simplex: &mut [SimplexVertex]) {
    simplex.sort_by(|a, b| {
        b.objective
            .partial_cmp(&a.objective)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Maximize `objective` over the box `bounds` with the Nelder-Mead method
///
/// # Arguments
/// * `objective` - Function to maximize; non-finite values count as `-inf`
/// * `bounds` - `(min, max)` per dimension
/// * `start` - Starting vertex (clamped into the box)
/// * `step_fraction` - Initial simplex edge as a fraction of each range
/// * `max_iterations` - Iteration cap
/// * `tolerance` - Stop once every vertex is within this distance of the best
pub fn optimize_nelder_mead<F>(
    objective: F,
    bounds: &[(f64, f64)],
    start: &[f64],
    step_fraction: f64,
    max_iterations: usize,
    tolerance: f64,
) -> OptimizationResult
where
    F: FnMut(&[f64]) -> f64,
{
    let mut eval = Evaluator {
        objective,
        evaluations: 0,
    };
    let mut simplex = initialize_simplex(&mut eval, start, bounds, step_fraction);
    let mut iteration = 0;

    while iteration < max_iterations {
        sort_best_first(&mut simplex);

        if simplex_size(&simplex) < tolerance {
            break;
        }
        iteration += 1;

        let cent = centroid(&simplex);
        let worst_idx = simplex.len() - 1;
        let best_objective = simplex[0].objective;
        let second_worst_objective = simplex[worst_idx.saturating_sub(1)].objective;
        let worst_objective = simplex[worst_idx].objective;
        let worst_values = simplex[worst_idx].values.clone();

        let mut reflected = reflect(&worst_values, &cent, REFLECTION_COEF);
        clamp_to_bounds(&mut reflected, bounds);
        let reflected = eval.vertex(reflected);

        if reflected.objective > best_objective {
            let mut expanded = reflect(&worst_values, &cent, EXPANSION_COEF);
            clamp_to_bounds(&mut expanded, bounds);
            let expanded = eval.vertex(expanded);

            simplex[worst_idx] = if expanded.objective > reflected.objective {
                expanded
            } else {
                reflected
            };
        } else if reflected.objective > second_worst_objective {
            simplex[worst_idx] = reflected;
        } else {
            let contract_point = if reflected.objective > worst_objective {
                &reflected.values
            } else {
                &worst_values
            };

            let mut contracted: Vec<f64> = cent
                .iter()
                .zip(contract_point.iter())
                .map(|(c, p)| c + CONTRACTION_COEF * (p - c))
                .collect();
            clamp_to_bounds(&mut contracted, bounds);
            let contracted = eval.vertex(contracted);

            if contracted.objective > worst_objective {
                simplex[worst_idx] = contracted;
            } else {
                // Shrink the simplex toward the best point
                let best_values = simplex[0].values.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let mut shrunk: Vec<f64> = best_values
                        .iter()
                        .zip(vertex.values.iter())
                        .map(|(b, v)| b + SHRINK_COEF * (v - b))
                        .collect();
                    clamp_to_bounds(&mut shrunk, bounds);
                    *vertex = eval.vertex(shrunk);
                }
            }
        }
    }

    sort_best_first(&mut simplex);
    let converged = simplex_size(&simplex) < tolerance;
    let best = simplex.swap_remove(0);

    OptimizationResult {
        point: best.values,
        objective: best.objective,
        iterations: iteration,
        evaluations: eval.evaluations,
        termination_reason: if converged {
            TerminationReason::Converged
        } else {
            TerminationReason::MaxIterationsReached
        },
    }
}
