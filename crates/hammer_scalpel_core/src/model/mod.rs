mod dynamics;
mod params;
mod policy;
mod results;

pub use dynamics::{Dynamics, PeriodOutcome, State};
pub use params::{ModelParameters, weekly_discount};
pub use policy::{Controls, Policy, Scenario, Signal};
pub use results::{ModelSolution, ScenarioResult, SolveDiagnostics, TimeSeries};
