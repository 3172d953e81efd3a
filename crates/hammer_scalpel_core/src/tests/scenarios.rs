//! Tests for the scenario drivers
//!
//! These tests verify that:
//! - `solve_model` returns all five scenarios in a fixed order
//! - Fanning scenarios out across workers gives the same results as solving
//!   them one after another
//! - `withpolicy` and `nopolicy` tag their results correctly
//! - A dedicated worker pool for one policy does not change its solution
//! - A solution survives a trip through the result store

use tempfile::tempdir;

use crate::model::{ModelParameters, Policy, Scenario};
use crate::optimization::OptimizerAlgorithm;
use crate::scenarios::{SolveOptions, nopolicy, run_scenario, solve_model, withpolicy};
use crate::storage::ResultStore;

fn tiny_options(workers: Option<usize>) -> SolveOptions {
    SolveOptions {
        params: ModelParameters::default().horizon(3).grid_points(4),
        algorithm: OptimizerAlgorithm::grid_search(3),
        workers,
    }
}

#[test]
fn test_solve_model_order() {
    let solution = solve_model(&tiny_options(None)).unwrap();
    let order: Vec<Scenario> = solution.results.iter().map(|r| r.scenario).collect();
    assert_eq!(order, Scenario::ALL.to_vec());
}

#[test]
fn test_workers_match_sequential() {
    let sequential = solve_model(&tiny_options(None)).unwrap();
    let fanned_out = solve_model(&tiny_options(Some(3))).unwrap();
    assert_eq!(sequential, fanned_out);
}

#[test]
fn test_single_worker_is_sequential() {
    let one = solve_model(&tiny_options(Some(1))).unwrap();
    let none = solve_model(&tiny_options(None)).unwrap();
    assert_eq!(one, none);
}

#[test]
fn test_drivers_tag_results() {
    let options = tiny_options(None);
    let baseline = nopolicy(&options.params).unwrap();
    assert_eq!(baseline.scenario, Scenario::NoIntervention);

    let targeted =
        withpolicy(Policy::TargetedTest, &options.params, &options.algorithm, None).unwrap();
    assert_eq!(targeted.scenario, Scenario::Policy(Policy::TargetedTest));

    let via_scenario = run_scenario(
        Scenario::Policy(Policy::TargetedTest),
        &options.params,
        &options.algorithm,
    )
    .unwrap();
    assert_eq!(via_scenario, targeted);
}

#[test]
fn test_withpolicy_workers_match_caller_pool() {
    let options = tiny_options(None);
    for policy in [Policy::NoTest, Policy::UntargetedTest] {
        let caller = withpolicy(policy, &options.params, &options.algorithm, None).unwrap();
        let pooled = withpolicy(policy, &options.params, &options.algorithm, Some(3)).unwrap();
        assert_eq!(caller, pooled, "{policy}");
    }
}

#[test]
fn test_invalid_options_fail_before_solving() {
    let mut options = tiny_options(Some(2));
    options.params.discount = 1.0;
    assert!(solve_model(&options).is_err());
}

#[test]
fn test_solution_round_trips_through_store() {
    let dir = tempdir().unwrap();
    let store = ResultStore::new(dir.path());
    let solution = solve_model(&tiny_options(None)).unwrap();

    store.save_solution(&solution).unwrap();
    for scenario in Scenario::ALL {
        assert!(store.exists(scenario), "{scenario}");
    }
    assert_eq!(store.load_solution().unwrap(), solution);
}
