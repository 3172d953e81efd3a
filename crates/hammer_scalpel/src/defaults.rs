//! Result bundles for the default calibration, shipped with the binary
//!
//! These carry the simulated paths only; their policy and value tables are
//! empty. Regenerate with `hammer_scalpel solve` under default parameters and
//! copy `results/*.json` into `data/`.

use hammer_scalpel_core::{Policy, Scenario, ScenarioResult};

fn bundled_json(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::NoIntervention => include_str!("../data/noint.json"),
        Scenario::Policy(Policy::NoTest) => include_str!("../data/notest.json"),
        Scenario::Policy(Policy::UntargetedTest) => include_str!("../data/untargettest.json"),
        Scenario::Policy(Policy::TargetedTest) => include_str!("../data/targettest.json"),
        Scenario::Policy(Policy::Isolate) => include_str!("../data/isolate.json"),
    }
}

/// Stored default result for `scenario`
pub fn default_result(scenario: Scenario) -> Result<ScenarioResult, serde_json::Error> {
    serde_json::from_str(bundled_json(scenario))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hammer_scalpel_core::ModelParameters;

    #[test]
    fn test_every_default_parses_and_matches_its_scenario() {
        for scenario in Scenario::ALL {
            let result = default_result(scenario).unwrap();
            assert_eq!(result.scenario, scenario);
            assert_eq!(result.horizon(), result.params.horizon);
            assert!(result.welfare.is_finite());
        }
    }

    #[test]
    fn test_defaults_use_default_calibration() {
        let defaults = ModelParameters::default();
        for scenario in Scenario::ALL {
            let params = default_result(scenario).unwrap().params;
            assert_eq!(params.horizon, defaults.horizon);
            assert_eq!(params.theta_i, defaults.theta_i);
            assert_eq!(params.theta_s, defaults.theta_s);
            assert!((params.discount - defaults.discount).abs() < 1e-12);
        }
    }

    #[test]
    fn test_testing_beats_no_response() {
        let noint = default_result(Scenario::NoIntervention).unwrap();
        let target = default_result(Scenario::Policy(Policy::TargetedTest)).unwrap();
        assert!(target.welfare > noint.welfare);
        assert!(target.series.cumulative_deaths() < noint.series.cumulative_deaths());
    }
}
