//! Backward induction over the state grid and forward simulation
//!
//! For each period `t = TT-1, ..., 0` and every grid node the solver maximizes
//!
//! ```text
//! V_t(s, i) = max_x  u(s, i, x) + discount * V_{t+1}(s', i')
//! ```
//!
//! over isolation rates `x ∈ [0, 1]^k`, where `V_{t+1}` is bilinearly
//! interpolated between nodes. The realized path is then simulated from the
//! initial state, re-optimizing at each realized state against `V_{t+1}`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SolveError};
use crate::grid::StateGrid;
use crate::model::{
    Controls, Dynamics, ModelParameters, Policy, Scenario, ScenarioResult, SolveDiagnostics,
    State, TimeSeries,
};
use crate::optimization::{OptimizationResult, OptimizerAlgorithm, maximize};

/// Value and policy tables from backward induction
#[derive(Debug, Clone)]
pub struct ValueTables {
    pub grid: StateGrid,
    /// `controls[t][k]`: optimizer control vector in period `t` at node `k`
    pub controls: Vec<Vec<Vec<f64>>>,
    /// `value[t][k]` for `t` in `0..=TT`
    pub value: Vec<Vec<f64>>,
    pub diagnostics: SolveDiagnostics,
}

/// Solution of one period at every grid node
struct PeriodSolution {
    controls: Vec<Vec<f64>>,
    value: Vec<f64>,
    diagnostics: SolveDiagnostics,
}

fn control_bounds(policy: Policy) -> Vec<(f64, f64)> {
    vec![(0.0, 1.0); policy.num_controls()]
}

/// Maximize the Bellman objective at one state
fn maximize_at(
    dynamics: &Dynamics<'_>,
    policy: Policy,
    grid: &StateGrid,
    next_value: &[f64],
    state: State,
    warm_start: Option<&[f64]>,
    algorithm: &OptimizerAlgorithm,
) -> OptimizationResult {
    let discount = dynamics.params().discount;
    let bounds = control_bounds(policy);
    maximize(algorithm, &bounds, warm_start, |x| {
        let outcome = dynamics.step(state, policy.controls(x));
        outcome.welfare + discount * grid.interpolate(next_value, outcome.next)
    })
}

fn solve_period(
    dynamics: &Dynamics<'_>,
    policy: Policy,
    grid: &StateGrid,
    next_value: &[f64],
    warm: Option<&[Vec<f64>]>,
    algorithm: &OptimizerAlgorithm,
    period: usize,
) -> Result<PeriodSolution> {
    let solve_node = |k: usize| {
        let warm_start = warm.map(|w| w[k].as_slice());
        maximize_at(
            dynamics,
            policy,
            grid,
            next_value,
            grid.node(k),
            warm_start,
            algorithm,
        )
    };

    #[cfg(feature = "parallel")]
    let results: Vec<OptimizationResult> =
        (0..grid.len()).into_par_iter().map(solve_node).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<OptimizationResult> = (0..grid.len()).map(solve_node).collect();

    let mut solution = PeriodSolution {
        controls: Vec::with_capacity(results.len()),
        value: Vec::with_capacity(results.len()),
        diagnostics: SolveDiagnostics::default(),
    };

    for (node, result) in results.into_iter().enumerate() {
        if !result.objective.is_finite() {
            return Err(SolveError::NoFiniteValue { period, node });
        }
        solution.diagnostics.evaluations += result.evaluations;
        solution.diagnostics.maximizations += 1;
        if !result.converged() {
            solution.diagnostics.unconverged += 1;
        }
        solution.value.push(result.objective);
        solution.controls.push(result.point);
    }

    Ok(solution)
}

/// Solve the finite-horizon problem backward from the terminal period
pub fn backward_induction(
    params: &ModelParameters,
    policy: Policy,
    algorithm: &OptimizerAlgorithm,
) -> Result<ValueTables> {
    params.validate()?;

    let grid = StateGrid::from_params(params);
    let dynamics = Dynamics::for_policy(params, policy);
    let horizon = params.horizon;

    let mut value = vec![Vec::new(); horizon + 1];
    let mut controls: Vec<Vec<Vec<f64>>> = vec![Vec::new(); horizon];
    let mut diagnostics = SolveDiagnostics::default();

    value[horizon] = grid.tabulate(|state| dynamics.terminal_value(state));

    for t in (0..horizon).rev() {
        // Next period's policy is a good starting point for this period
        let warm = controls.get(t + 1).map(|c| c.as_slice());
        let period = solve_period(
            &dynamics,
            policy,
            &grid,
            &value[t + 1],
            warm,
            algorithm,
            t,
        )?;

        if period.diagnostics.unconverged > 0 {
            tracing::warn!(
                policy = %policy,
                period = t,
                unconverged = period.diagnostics.unconverged,
                "optimizer hit the iteration cap at some grid nodes"
            );
        }
        tracing::trace!(policy = %policy, period = t, "period solved");

        diagnostics.merge(period.diagnostics);
        value[t] = period.value;
        controls[t] = period.controls;
    }

    Ok(ValueTables {
        grid,
        controls,
        value,
        diagnostics,
    })
}

/// Value of following fixed controls forever, computed with the same grid
/// recursion the optimizer uses
pub fn evaluate_fixed_controls(
    params: &ModelParameters,
    policy: Policy,
    controls: Controls,
) -> Result<Vec<Vec<f64>>> {
    params.validate()?;

    let grid = StateGrid::from_params(params);
    let dynamics = Dynamics::for_policy(params, policy);
    let horizon = params.horizon;

    let mut value = vec![Vec::new(); horizon + 1];
    value[horizon] = grid.tabulate(|state| dynamics.terminal_value(state));
    for t in (0..horizon).rev() {
        let next = &value[t + 1];
        let current = grid.tabulate(|state| {
            let outcome = dynamics.step(state, controls);
            outcome.welfare + params.discount * grid.interpolate(next, outcome.next)
        });
        value[t] = current;
    }

    Ok(value)
}

/// Simulate `horizon` periods from the initial state.
///
/// `choose` picks the controls for period `t` at the realized state.
/// Returns the series and discounted welfare including the terminal value.
pub fn simulate_path<C>(
    dynamics: &Dynamics<'_>,
    horizon: usize,
    mut choose: C,
) -> Result<(TimeSeries, f64)>
where
    C: FnMut(usize, State) -> Result<Controls>,
{
    let params = dynamics.params();
    let mut state = State::initial(params);
    let mut series = TimeSeries::with_capacity(horizon);
    let mut welfare = 0.0;
    let mut discount = 1.0;

    for t in 0..horizon {
        let controls = choose(t, state)?;
        let outcome = dynamics.step(state, controls);
        series.push(state, controls, &outcome);

        welfare += discount * outcome.welfare;
        discount *= params.discount;
        state = outcome.next;
    }
    welfare += discount * dynamics.terminal_value(state);

    Ok((series, welfare))
}

/// Solve one policy scenario and simulate its equilibrium path
pub fn solve_policy(
    params: &ModelParameters,
    policy: Policy,
    algorithm: &OptimizerAlgorithm,
) -> Result<ScenarioResult> {
    let tables = backward_induction(params, policy, algorithm)?;
    let dynamics = Dynamics::for_policy(params, policy);
    let mut diagnostics = tables.diagnostics;

    let mut previous: Option<Vec<f64>> = None;
    let (series, welfare) = simulate_path(&dynamics, params.horizon, |t, state| {
        let result = maximize_at(
            &dynamics,
            policy,
            &tables.grid,
            &tables.value[t + 1],
            state,
            previous.as_deref(),
            algorithm,
        );
        if !result.objective.is_finite() {
            return Err(SolveError::NoFiniteValueOnPath { period: t });
        }
        diagnostics.evaluations += result.evaluations;
        diagnostics.maximizations += 1;
        if !result.converged() {
            diagnostics.unconverged += 1;
        }

        let controls = policy.controls(&result.point);
        previous = Some(result.point);
        Ok(controls)
    })?;

    let policy_table: Vec<Vec<Controls>> = tables
        .controls
        .iter()
        .map(|period| period.iter().map(|x| policy.controls(x)).collect())
        .collect();

    Ok(ScenarioResult {
        scenario: Scenario::Policy(policy),
        params: params.clone(),
        grid: tables.grid,
        policy: policy_table,
        value: tables.value,
        series,
        welfare,
        diagnostics,
    })
}

/// Simulate the epidemic with no government response at all
pub fn simulate_unmitigated(params: &ModelParameters) -> Result<ScenarioResult> {
    params.validate()?;

    let dynamics = Dynamics::unmitigated(params);
    let (series, welfare) = simulate_path(&dynamics, params.horizon, |_, _| Ok(Controls::NONE))?;

    Ok(ScenarioResult {
        scenario: Scenario::NoIntervention,
        params: params.clone(),
        grid: StateGrid::from_params(params),
        policy: Vec::new(),
        value: Vec::new(),
        series,
        welfare,
        diagnostics: SolveDiagnostics::default(),
    })
}
