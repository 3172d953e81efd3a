//! Scenario drivers: the baseline, single policies, and the full model
//!
//! The five scenarios are independent. [`solve_model`] can run them on a
//! dedicated worker pool; results always come back in [`Scenario::ALL`] order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
#[cfg(feature = "parallel")]
use crate::error::SolveError;
use crate::model::{ModelParameters, ModelSolution, Policy, Scenario, ScenarioResult};
use crate::optimization::OptimizerAlgorithm;
use crate::solver::{simulate_unmitigated, solve_policy};

/// Everything `solve_model` needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    pub params: ModelParameters,
    pub algorithm: OptimizerAlgorithm,
    /// Number of workers for the scenario fan-out; `None` runs scenarios one
    /// after another
    pub workers: Option<usize>,
}

/// Simulate `TT` periods under no government response
pub fn nopolicy(params: &ModelParameters) -> Result<ScenarioResult> {
    let started = Instant::now();
    let result = simulate_unmitigated(params)?;
    log_finished(&result, started);
    Ok(result)
}

/// Solve the model under one government policy.
///
/// With `workers = Some(n)` and `n > 1` the grid nodes of each period are
/// maximized on a dedicated pool of `n` threads; otherwise on the caller's
/// pool.
pub fn withpolicy(
    policy: Policy,
    params: &ModelParameters,
    algorithm: &OptimizerAlgorithm,
    workers: Option<usize>,
) -> Result<ScenarioResult> {
    tracing::info!(
        policy = %policy,
        horizon = params.horizon,
        grid_points = params.grid_points,
        algorithm = algorithm.name(),
        workers,
        "solving policy"
    );
    let started = Instant::now();
    let result = match workers {
        Some(workers) if workers > 1 => {
            on_worker_pool(workers, || solve_policy(params, policy, algorithm))?
        }
        _ => solve_policy(params, policy, algorithm)?,
    };
    log_finished(&result, started);
    Ok(result)
}

/// Run any of the five scenarios
pub fn run_scenario(
    scenario: Scenario,
    params: &ModelParameters,
    algorithm: &OptimizerAlgorithm,
) -> Result<ScenarioResult> {
    match scenario {
        Scenario::NoIntervention => nopolicy(params),
        Scenario::Policy(policy) => withpolicy(policy, params, algorithm, None),
    }
}

/// Solve the baseline and all four policies
pub fn solve_model(options: &SolveOptions) -> Result<ModelSolution> {
    options.params.validate()?;
    let started = Instant::now();

    let results = match options.workers {
        Some(workers) if workers > 1 => solve_on_workers(options, workers)?,
        _ => Scenario::ALL
            .iter()
            .map(|s| run_scenario(*s, &options.params, &options.algorithm))
            .collect::<Result<Vec<_>>>()?,
    };

    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "all scenarios solved"
    );
    Ok(ModelSolution { results })
}

fn solve_on_workers(options: &SolveOptions, workers: usize) -> Result<Vec<ScenarioResult>> {
    tracing::info!(workers, "fanning scenarios out across workers");
    on_worker_pool(workers, || {
        #[cfg(feature = "parallel")]
        let scenarios = Scenario::ALL.par_iter();
        #[cfg(not(feature = "parallel"))]
        let scenarios = Scenario::ALL.iter();

        scenarios
            .map(|s| run_scenario(*s, &options.params, &options.algorithm))
            .collect::<Result<Vec<_>>>()
    })
}

/// Run `job` on a fresh pool of `workers` threads; rayon work inside it stays
/// on that pool
#[cfg(feature = "parallel")]
fn on_worker_pool<T, F>(workers: usize, job: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> Result<T> + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("solver-worker-{i}"))
        .build()
        .map_err(|e| SolveError::WorkerPool(e.to_string()))?;
    pool.install(job)
}

#[cfg(not(feature = "parallel"))]
fn on_worker_pool<T, F>(workers: usize, job: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> Result<T> + Send,
{
    tracing::warn!(
        workers,
        "built without the `parallel` feature; running on the current thread"
    );
    job()
}

fn log_finished(result: &ScenarioResult, started: Instant) {
    let (peak_week, peak) = result.series.peak_infected().unwrap_or((0, 0.0));
    tracing::info!(
        scenario = %result.scenario,
        elapsed_secs = started.elapsed().as_secs_f64(),
        welfare = result.welfare,
        peak_week,
        peak_infected = peak,
        deaths = result.series.cumulative_deaths(),
        output_loss = result.series.output_loss(),
        unconverged = result.diagnostics.unconverged,
        "scenario finished"
    );
}
