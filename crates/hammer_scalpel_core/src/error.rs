use std::fmt;

use crate::model::Scenario;

/// Errors raised while validating model parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The horizon must contain at least one period
    EmptyHorizon,
    /// The state grid needs at least two nodes per axis
    GridTooCoarse(usize),
    /// A field that must be a probability is outside [0, 1]
    NotAProbability { field: &'static str, value: f64 },
    /// A field that must be strictly positive is not
    NotPositive { field: &'static str, value: f64 },
    /// The false-positive rate of a signal is not below its detection rate
    UninformativeSignal {
        field: &'static str,
        detect: f64,
        false_positive: f64,
    },
    /// A field is outside the open/closed interval it must live in
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyHorizon => write!(f, "horizon must be at least one period"),
            ConfigError::GridTooCoarse(n) => {
                write!(f, "grid needs at least 2 points per axis, got {n}")
            }
            ConfigError::NotAProbability { field, value } => {
                write!(f, "{field} must lie in [0, 1], got {value}")
            }
            ConfigError::NotPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::UninformativeSignal {
                field,
                detect,
                false_positive,
            } => write!(
                f,
                "{field} signal is uninformative (detect={detect}, false_positive={false_positive})"
            ),
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field}={value} outside ({min}, {max}]"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while solving a scenario
#[derive(Debug)]
pub enum SolveError {
    Config(ConfigError),
    /// Every candidate the optimizer tried produced a non-finite objective
    NoFiniteValue { period: usize, node: usize },
    /// The optimizer produced no finite value at a realized state of the
    /// simulated path
    NoFiniteValueOnPath { period: usize },
    /// The worker pool for parallel scenarios could not be created
    WorkerPool(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Config(e) => write!(f, "invalid parameters: {e}"),
            SolveError::NoFiniteValue { period, node } => write!(
                f,
                "optimizer found no finite value at period {period}, grid node {node}"
            ),
            SolveError::NoFiniteValueOnPath { period } => write!(
                f,
                "optimizer found no finite value on the simulated path at period {period}"
            ),
            SolveError::WorkerPool(msg) => write!(f, "failed to build worker pool: {msg}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        SolveError::Config(e)
    }
}

/// Errors from the on-disk result store
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Serialize(serde_json::Error),
    /// No stored bundle exists for this scenario yet
    Missing(Scenario),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {e}"),
            StorageError::Parse(e) => write!(f, "failed to parse stored result: {e}"),
            StorageError::Serialize(e) => write!(f, "failed to serialize result: {e}"),
            StorageError::Missing(scenario) => write!(
                f,
                "no stored result for scenario '{scenario}', run `solve` first"
            ),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Parse(e) | StorageError::Serialize(e) => Some(e),
            StorageError::Missing(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Policy;
    use std::error::Error;

    #[test]
    fn test_path_failure_names_period_only() {
        let msg = SolveError::NoFiniteValueOnPath { period: 7 }.to_string();
        assert!(msg.contains("period 7"));
        assert!(!msg.contains("node"));

        let msg = SolveError::NoFiniteValue { period: 3, node: 12 }.to_string();
        assert!(msg.contains("grid node 12"));
    }

    #[test]
    fn test_config_error_is_source() {
        let err = SolveError::from(ConfigError::EmptyHorizon);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid parameters"));
    }

    #[test]
    fn test_missing_points_to_solve() {
        let err = StorageError::Missing(Scenario::Policy(Policy::NoTest));
        assert!(err.to_string().contains("'notest', run `solve` first"));
    }
}
