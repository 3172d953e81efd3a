//! One-period epidemic and economic transition
//!
//! The population has unit mass and is split into susceptible, infected and
//! recovered shares. Deaths are a flow out of the infected that is charged in
//! welfare; the dead are carried in the recovered share so the state stays
//! two-dimensional.

use serde::{Deserialize, Serialize};

use super::params::ModelParameters;
use super::policy::{Controls, Policy, Signal};

/// Epidemic state at the start of a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub susceptible: f64,
    pub infected: f64,
}

impl State {
    pub fn new(susceptible: f64, infected: f64) -> Self {
        Self {
            susceptible,
            infected,
        }
    }

    /// State at t = 0: everyone susceptible except the seeded infections
    pub fn initial(params: &ModelParameters) -> Self {
        Self::new(1.0 - params.initial_infected, params.initial_infected)
    }

    pub fn recovered(&self) -> f64 {
        (1.0 - self.susceptible - self.infected).max(0.0)
    }

    /// Clamp into the feasible simplex `s, i >= 0`, `s + i <= 1`
    pub fn feasible(self) -> Self {
        let infected = self.infected.clamp(0.0, 1.0);
        let susceptible = self.susceptible.clamp(0.0, 1.0 - infected);
        Self::new(susceptible, infected)
    }
}

/// Everything that happens within one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodOutcome {
    pub next: State,
    pub new_infections: f64,
    pub deaths: f64,
    pub output: f64,
    /// Share of the population not working normally (quarantined or isolated)
    pub isolated: f64,
    pub reproduction: f64,
    /// Output net of the welfare cost of deaths
    pub welfare: f64,
}

/// Transition law for one scenario
#[derive(Debug, Clone, Copy)]
pub struct Dynamics<'a> {
    params: &'a ModelParameters,
    quarantine_known: bool,
    signal: Option<Signal>,
}

impl<'a> Dynamics<'a> {
    /// Nobody is isolated, not even the symptomatic
    pub fn unmitigated(params: &'a ModelParameters) -> Self {
        Self {
            params,
            quarantine_known: false,
            signal: None,
        }
    }

    pub fn for_policy(params: &'a ModelParameters, policy: Policy) -> Self {
        Self {
            params,
            quarantine_known: true,
            signal: policy.signal(params),
        }
    }

    pub fn params(&self) -> &'a ModelParameters {
        self.params
    }

    pub fn step(&self, state: State, controls: Controls) -> PeriodOutcome {
        let p = self.params;
        let state = state.feasible();
        let s = state.susceptible;
        let i = state.infected;
        let r = state.recovered();

        let known = if self.quarantine_known {
            p.symptomatic_share * i
        } else {
            0.0
        };
        let unknown = i - known;

        // Without a signal everybody lands in the unflagged group
        let (detect, false_positive) = self
            .signal
            .map(|sig| (sig.detect, sig.false_positive))
            .unwrap_or((0.0, 0.0));
        let xf = controls.isolate_flagged.clamp(0.0, 1.0);
        let xu = controls.isolate_unflagged.clamp(0.0, 1.0);
        let active_infected_rate = detect * (1.0 - xf) + (1.0 - detect) * (1.0 - xu);
        let active_healthy_rate = false_positive * (1.0 - xf) + (1.0 - false_positive) * (1.0 - xu);

        let active_infected = unknown * active_infected_rate;
        let active_healthy = (s + r) * active_healthy_rate;

        let infection_prob = 1.0 - (-p.transmission * active_infected).exp();
        let new_infections = s * active_healthy_rate * infection_prob;
        let resolved = p.recovery * i;
        let deaths = p.fatality * resolved;

        let active = active_healthy + active_infected;
        let isolated = (1.0 - active).max(0.0);
        let output = active + p.isolation_productivity * isolated;

        let reproduction = if i > 0.0 {
            p.transmission * s * active_healthy_rate * (active_infected / i) / p.recovery
        } else {
            0.0
        };

        PeriodOutcome {
            next: State::new(s - new_infections, i + new_infections - resolved),
            new_infections,
            deaths,
            output,
            isolated,
            reproduction,
            welfare: output - p.death_cost * deaths,
        }
    }

    /// Continuation value once a cure arrives after the last period
    pub fn terminal_value(&self, state: State) -> f64 {
        let state = state.feasible();
        self.params.steady_state_value()
            - self.params.death_cost * self.params.fatality * state.infected
    }
}
