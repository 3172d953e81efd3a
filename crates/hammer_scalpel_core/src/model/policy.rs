//! Government policies and the controls they expose

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::params::ModelParameters;

/// A government response to the epidemic.
///
/// Under every policy people known to be infected (the symptomatic) are
/// quarantined. Policies differ in what else the government observes and
/// therefore in whom it can isolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// No testing: a uniform isolation rate for everyone not known infected
    NoTest,
    /// Random testing with signal precision `(theta_i, theta_s)`
    #[serde(rename = "untargettest")]
    UntargetedTest,
    /// Testing targeted by contact tracing
    #[serde(rename = "targettest")]
    TargetedTest,
    /// No testing, isolation of a share of the traced contacts
    Isolate,
}

impl Policy {
    pub const ALL: [Policy; 4] = [
        Policy::NoTest,
        Policy::UntargetedTest,
        Policy::TargetedTest,
        Policy::Isolate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Policy::NoTest => "notest",
            Policy::UntargetedTest => "untargettest",
            Policy::TargetedTest => "targettest",
            Policy::Isolate => "isolate",
        }
    }

    /// Number of controls the government chooses each period
    pub fn num_controls(self) -> usize {
        match self {
            Policy::NoTest | Policy::Isolate => 1,
            Policy::UntargetedTest | Policy::TargetedTest => 2,
        }
    }

    /// Signal that splits the unknown population into a flagged and an
    /// unflagged group, if the policy has one
    pub fn signal(self, params: &ModelParameters) -> Option<Signal> {
        match self {
            Policy::NoTest => None,
            Policy::UntargetedTest => Some(Signal {
                detect: params.theta_i,
                false_positive: params.theta_s,
            }),
            Policy::TargetedTest => Some(Signal {
                detect: params.targeted_theta_i(),
                false_positive: params.theta_s,
            }),
            Policy::Isolate => Some(Signal {
                detect: params.tracing_theta_i,
                false_positive: params.tracing_theta_s,
            }),
        }
    }

    /// Map the optimizer's control vector onto group isolation rates.
    ///
    /// `x` must hold exactly [`Policy::num_controls`] entries.
    pub fn controls(self, x: &[f64]) -> Controls {
        debug_assert_eq!(x.len(), self.num_controls(), "control vector for {self}");
        match self {
            Policy::NoTest => Controls::uniform(x[0]),
            Policy::UntargetedTest | Policy::TargetedTest => Controls {
                isolate_flagged: x[0],
                isolate_unflagged: x[1],
            },
            Policy::Isolate => Controls {
                isolate_flagged: x[0],
                isolate_unflagged: 0.0,
            },
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "notest" => Ok(Policy::NoTest),
            "untargettest" | "untarget" | "untargeted" => Ok(Policy::UntargetedTest),
            "targettest" | "target" | "targeted" => Ok(Policy::TargetedTest),
            "isolate" => Ok(Policy::Isolate),
            other => Err(format!(
                "unknown policy '{other}' (expected notest, untargettest, targettest or isolate)"
            )),
        }
    }
}

/// One of the five computations the driver runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Scenario {
    /// No government response at all, not even quarantine of the symptomatic
    NoIntervention,
    Policy(Policy),
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::NoIntervention,
        Scenario::Policy(Policy::NoTest),
        Scenario::Policy(Policy::UntargetedTest),
        Scenario::Policy(Policy::TargetedTest),
        Scenario::Policy(Policy::Isolate),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::NoIntervention => "noint",
            Scenario::Policy(p) => p.label(),
        }
    }

    /// Legend text used in figures
    pub fn display_name(self) -> &'static str {
        match self {
            Scenario::NoIntervention => "No intervention",
            Scenario::Policy(Policy::NoTest) => "No testing",
            Scenario::Policy(Policy::UntargetedTest) => "Untargeted testing",
            Scenario::Policy(Policy::TargetedTest) => "Targeted testing",
            Scenario::Policy(Policy::Isolate) => "Isolation",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noint" | "nopolicy" => Ok(Scenario::NoIntervention),
            other => other.parse().map(Scenario::Policy),
        }
    }
}

impl From<Scenario> for String {
    fn from(s: Scenario) -> Self {
        s.label().to_string()
    }
}

impl TryFrom<String> for Scenario {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Policy> for Scenario {
    fn from(p: Policy) -> Self {
        Scenario::Policy(p)
    }
}

/// Binary signal about infection status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    /// P(flagged | infected)
    pub detect: f64,
    /// P(flagged | not infected)
    pub false_positive: f64,
}

/// Isolation rates applied to the flagged and unflagged groups
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub isolate_flagged: f64,
    pub isolate_unflagged: f64,
}

impl Controls {
    pub fn uniform(x: f64) -> Self {
        Self {
            isolate_flagged: x,
            isolate_unflagged: x,
        }
    }

    pub const NONE: Controls = Controls {
        isolate_flagged: 0.0,
        isolate_unflagged: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_labels_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.label().parse::<Policy>(), Ok(policy));
        }
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!("lockdown".parse::<Policy>().is_err());
    }

    #[test]
    fn test_short_aliases() {
        assert_eq!("untarget".parse::<Policy>(), Ok(Policy::UntargetedTest));
        assert_eq!("TARGET".parse::<Policy>(), Ok(Policy::TargetedTest));
    }

    #[test]
    fn test_targeted_signal_is_sharper() {
        let params = ModelParameters::default();
        let untargeted = Policy::UntargetedTest.signal(&params).unwrap();
        let targeted = Policy::TargetedTest.signal(&params).unwrap();
        assert!(targeted.detect > untargeted.detect);
        assert_eq!(targeted.false_positive, untargeted.false_positive);
    }

    #[test]
    fn test_isolate_leaves_unflagged_active() {
        let controls = Policy::Isolate.controls(&[0.8]);
        assert_eq!(controls.isolate_flagged, 0.8);
        assert_eq!(controls.isolate_unflagged, 0.0);
    }

    #[test]
    fn test_controls_match_num_controls() {
        for policy in Policy::ALL {
            let x = vec![0.25; policy.num_controls()];
            let controls = policy.controls(&x);
            assert_eq!(controls.isolate_flagged, 0.25);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "control vector for untargettest")]
    fn test_short_control_vector_rejected() {
        Policy::UntargetedTest.controls(&[0.5]);
    }

    #[test]
    fn test_scenario_serializes_as_label() {
        let json = serde_json::to_string(&Scenario::NoIntervention).unwrap();
        assert_eq!(json, "\"noint\"");
        let json = serde_json::to_string(&Scenario::Policy(Policy::UntargetedTest)).unwrap();
        assert_eq!(json, "\"untargettest\"");
        let back: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Scenario::Policy(Policy::UntargetedTest));
    }
}
