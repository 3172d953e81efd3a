//! Run configuration: an optional YAML file layered under CLI flags

use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};

use hammer_scalpel_core::{ModelParameters, OptimizerAlgorithm, SolveOptions};

/// Get the default output directory path (~/.hammer_scalpel/)
pub fn default_out_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hammer_scalpel")
}

/// Contents of a `--config` file. Missing fields take their defaults.
///
/// ```yaml
/// workers: 5
/// algorithm: auto
/// params:
///   horizon: 52
///   grid_points: 20
///   theta_i: 0.38
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub params: ModelParameters,
    pub algorithm: OptimizerAlgorithm,
    pub workers: Option<usize>,
}

impl RunConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Read the file at `path`, or use defaults when no file is given
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .map_err(|e| eyre!("parsing config file {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            params: self.params.clone(),
            algorithm: self.algorithm,
            workers: self.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "workers: 4\nparams:\n  horizon: 26\n  theta_i: 0.5\n";
        let config = RunConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.workers, Some(4));
        assert_eq!(config.params.horizon, 26);
        assert_eq!(config.params.theta_i, 0.5);
        assert_eq!(config.params.grid_points, ModelParameters::default().grid_points);
        assert_eq!(config.algorithm, OptimizerAlgorithm::Auto);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        assert_eq!(RunConfig::load(None).unwrap(), RunConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, "algorithm: auto\nparams:\n  grid_points: 8\n").unwrap();

        let config = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(config.params.grid_points, 8);
        assert_eq!(config.solve_options().params.grid_points, 8);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = RunConfig::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }

    #[test]
    fn test_to_yaml_names_fields() {
        let yaml = RunConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("horizon"));
        assert!(yaml.contains("workers"));
    }
}
