//! On-disk store of result bundles
//!
//! Directory structure:
//! <root>/
//!   noint.json
//!   notest.json
//!   untargettest.json
//!   targettest.json
//!   isolate.json
//!
//! Figures can be rebuilt from a populated store without re-solving.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::model::{ModelSolution, Scenario, ScenarioResult};

/// Write bytes to a file atomically using write-then-rename pattern.
fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Result bundles stored as one JSON file per scenario
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, scenario: Scenario) -> PathBuf {
        self.root.join(format!("{}.json", scenario.label()))
    }

    pub fn exists(&self, scenario: Scenario) -> bool {
        self.path(scenario).is_file()
    }

    pub fn save(&self, result: &ScenarioResult) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path(result.scenario);
        let json = serde_json::to_vec_pretty(result).map_err(StorageError::Serialize)?;
        atomic_write_bytes(&path, &json)?;
        tracing::debug!(scenario = %result.scenario, path = %path.display(), "stored result");
        Ok(path)
    }

    pub fn load(&self, scenario: Scenario) -> Result<ScenarioResult, StorageError> {
        let path = self.path(scenario);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::Missing(scenario));
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        serde_json::from_slice(&content).map_err(StorageError::Parse)
    }

    pub fn save_solution(&self, solution: &ModelSolution) -> Result<(), StorageError> {
        for result in &solution.results {
            self.save(result)?;
        }
        Ok(())
    }

    pub fn load_solution(&self) -> Result<ModelSolution, StorageError> {
        let results = Scenario::ALL
            .iter()
            .map(|s| self.load(*s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ModelSolution { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelParameters, Policy};
    use crate::solver::simulate_unmitigated;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noint.json");

        atomic_write_bytes(&path, b"{}").unwrap();
        atomic_write_bytes(&path, b"[]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("results"));
        let result = simulate_unmitigated(&ModelParameters::default().horizon(8)).unwrap();

        assert_eq!(store.root(), dir.path().join("results"));
        let path = store.save(&result).unwrap();
        assert!(path.ends_with("noint.json"));
        assert!(store.exists(Scenario::NoIntervention));

        let loaded = store.load(Scenario::NoIntervention).unwrap();
        assert_eq!(loaded, result);
    }

    #[test]
    fn test_missing_scenario() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let err = store.load(Scenario::Policy(Policy::Isolate)).unwrap_err();
        assert!(matches!(err, StorageError::Missing(Scenario::Policy(Policy::Isolate))));
        assert!(err.to_string().contains("isolate"));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        fs::write(store.path(Scenario::NoIntervention), "not json").unwrap();
        assert!(matches!(
            store.load(Scenario::NoIntervention),
            Err(StorageError::Parse(_))
        ));
    }
}
