//! Model parameters
//!
//! All rates are weekly. Defaults reproduce the calibration used for the
//! published figures, except for the grid resolution (20 nodes per axis
//! instead of 40) which keeps a full solve tractable on a laptop.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weekly discount factor implied by a 4% annual rate
pub fn weekly_discount() -> f64 {
    0.96_f64.powf(1.0 / 52.0)
}

/// Full parameterization of one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Number of periods `TT`
    pub horizon: usize,
    /// Grid nodes per state axis (`ndims`)
    pub grid_points: usize,

    /// P(positive test | infected)
    pub theta_i: f64,
    /// P(positive test | not infected)
    pub theta_s: f64,

    // Epidemiology
    pub transmission: f64,
    pub recovery: f64,
    pub fatality: f64,
    /// Share of the infected who show symptoms and are quarantined
    pub symptomatic_share: f64,

    // Economics
    pub discount: f64,
    /// Welfare cost of a death, in units of one person-week of output
    pub death_cost: f64,
    pub isolation_productivity: f64,

    /// Multiplier on `theta_i` when tests follow contact tracing
    pub targeting_gain: f64,
    /// P(traced | infected) when tracing is used without tests
    pub tracing_theta_i: f64,
    /// P(traced | not infected) when tracing is used without tests
    pub tracing_theta_s: f64,

    pub initial_infected: f64,
    /// Upper end of the infected axis of the state grid
    pub infected_grid_max: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            horizon: 52,
            grid_points: 20,
            theta_i: 0.38,
            theta_s: 0.0044,
            transmission: 1.75,
            recovery: 0.7,
            fatality: 0.006,
            symptomatic_share: 0.3,
            discount: weekly_discount(),
            death_cost: 2000.0,
            isolation_productivity: 0.3,
            targeting_gain: 2.0,
            tracing_theta_i: 0.5,
            tracing_theta_s: 0.05,
            initial_infected: 0.001,
            infected_grid_max: 0.4,
        }
    }
}

impl ModelParameters {
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    pub fn signals(mut self, theta_i: f64, theta_s: f64) -> Self {
        self.theta_i = theta_i;
        self.theta_s = theta_s;
        self
    }

    /// Basic reproduction number with nobody isolated
    pub fn basic_reproduction(&self) -> f64 {
        self.transmission / self.recovery
    }

    /// Detection rate of tests that follow contact tracing
    pub fn targeted_theta_i(&self) -> f64 {
        (self.theta_i * self.targeting_gain).min(1.0)
    }

    /// Value of the economy once the epidemic is over, per unit of population
    pub fn steady_state_value(&self) -> f64 {
        1.0 / (1.0 - self.discount)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::EmptyHorizon);
        }
        if self.grid_points < 2 {
            return Err(ConfigError::GridTooCoarse(self.grid_points));
        }

        for (field, value) in [
            ("theta_i", self.theta_i),
            ("theta_s", self.theta_s),
            ("recovery", self.recovery),
            ("fatality", self.fatality),
            ("symptomatic_share", self.symptomatic_share),
            ("isolation_productivity", self.isolation_productivity),
            ("tracing_theta_i", self.tracing_theta_i),
            ("tracing_theta_s", self.tracing_theta_s),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotAProbability { field, value });
            }
        }

        for (field, value) in [
            ("transmission", self.transmission),
            ("recovery", self.recovery),
            ("targeting_gain", self.targeting_gain),
            ("infected_grid_max", self.infected_grid_max),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.death_cost < 0.0 || !self.death_cost.is_finite() {
            return Err(ConfigError::NotPositive {
                field: "death_cost",
                value: self.death_cost,
            });
        }

        if self.theta_s >= self.theta_i {
            return Err(ConfigError::UninformativeSignal {
                field: "test",
                detect: self.theta_i,
                false_positive: self.theta_s,
            });
        }
        if self.tracing_theta_s >= self.tracing_theta_i {
            return Err(ConfigError::UninformativeSignal {
                field: "tracing",
                detect: self.tracing_theta_i,
                false_positive: self.tracing_theta_s,
            });
        }

        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "discount",
                value: self.discount,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.infected_grid_max > 1.0 {
            return Err(ConfigError::NotAProbability {
                field: "infected_grid_max",
                value: self.infected_grid_max,
            });
        }
        if !(self.initial_infected > 0.0 && self.initial_infected <= self.infected_grid_max) {
            return Err(ConfigError::OutOfRange {
                field: "initial_infected",
                value: self.initial_infected,
                min: 0.0,
                max: self.infected_grid_max,
            });
        }

        Ok(())
    }
}
