//! Result bundles produced by a scenario run

use serde::{Deserialize, Serialize};

use super::dynamics::{PeriodOutcome, State};
use super::params::ModelParameters;
use super::policy::{Controls, Scenario};
use crate::grid::StateGrid;

/// Per-period paths along the simulated equilibrium.
///
/// Stocks are measured at the start of each week, flows over the week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
    pub new_infections: Vec<f64>,
    pub deaths: Vec<f64>,
    pub reproduction: Vec<f64>,
    pub output: Vec<f64>,
    pub isolated: Vec<f64>,
    pub isolate_flagged: Vec<f64>,
    pub isolate_unflagged: Vec<f64>,
    pub welfare: Vec<f64>,
}

impl TimeSeries {
    pub fn with_capacity(periods: usize) -> Self {
        Self {
            susceptible: Vec::with_capacity(periods),
            infected: Vec::with_capacity(periods),
            recovered: Vec::with_capacity(periods),
            new_infections: Vec::with_capacity(periods),
            deaths: Vec::with_capacity(periods),
            reproduction: Vec::with_capacity(periods),
            output: Vec::with_capacity(periods),
            isolated: Vec::with_capacity(periods),
            isolate_flagged: Vec::with_capacity(periods),
            isolate_unflagged: Vec::with_capacity(periods),
            welfare: Vec::with_capacity(periods),
        }
    }

    pub fn push(&mut self, state: State, controls: Controls, outcome: &PeriodOutcome) {
        self.susceptible.push(state.susceptible);
        self.infected.push(state.infected);
        self.recovered.push(state.recovered());
        self.new_infections.push(outcome.new_infections);
        self.deaths.push(outcome.deaths);
        self.reproduction.push(outcome.reproduction);
        self.output.push(outcome.output);
        self.isolated.push(outcome.isolated);
        self.isolate_flagged.push(controls.isolate_flagged);
        self.isolate_unflagged.push(controls.isolate_unflagged);
        self.welfare.push(outcome.welfare);
    }

    pub fn len(&self) -> usize {
        self.infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// Week and level of peak prevalence
    pub fn peak_infected(&self) -> Option<(usize, f64)> {
        self.infected
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn cumulative_deaths(&self) -> f64 {
        self.deaths.iter().sum()
    }

    /// Output lost relative to a pandemic-free economy, in person-weeks
    pub fn output_loss(&self) -> f64 {
        self.output.iter().map(|y| 1.0 - y).sum()
    }
}

/// Optimizer bookkeeping for a solve
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveDiagnostics {
    /// Objective evaluations across all periods and grid nodes
    pub evaluations: usize,
    /// Grid-node maximizations that stopped at the iteration cap
    pub unconverged: usize,
    /// Grid-node maximizations performed
    pub maximizations: usize,
}

impl SolveDiagnostics {
    pub fn merge(&mut self, other: SolveDiagnostics) {
        self.evaluations += other.evaluations;
        self.unconverged += other.unconverged;
        self.maximizations += other.maximizations;
    }
}

/// Everything one scenario produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub params: ModelParameters,
    pub grid: StateGrid,
    /// `policy[t][k]`: maximizing controls in period `t` at grid node `k`
    pub policy: Vec<Vec<Controls>>,
    /// `value[t][k]`: value in period `t` at node `k`; `value[TT]` is terminal
    pub value: Vec<Vec<f64>>,
    pub series: TimeSeries,
    /// Discounted welfare along the simulated path, terminal value included
    pub welfare: f64,
    pub diagnostics: SolveDiagnostics,
}

impl ScenarioResult {
    pub fn horizon(&self) -> usize {
        self.series.len()
    }
}

/// Bundles for all five scenarios, in [`Scenario::ALL`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSolution {
    pub results: Vec<ScenarioResult>,
}

impl ModelSolution {
    pub fn get(&self, scenario: Scenario) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.scenario == scenario)
    }
}
