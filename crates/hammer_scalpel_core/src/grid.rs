//! Cartesian state grid with bilinear interpolation
//!
//! Nodes are stored susceptible-major: node `k` sits at
//! `(susceptible[k / n_i], infected[k % n_i])`.

use serde::{Deserialize, Serialize};

use crate::model::{ModelParameters, State};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateGrid {
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
}

/// Evenly spaced nodes on `[min, max]`
fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![(min + max) / 2.0];
    }
    let step = (max - min) / (n - 1) as f64;
    (0..n)
        .map(|k| if k == n - 1 { max } else { min + step * k as f64 })
        .collect()
}

/// Bracketing lower index and weight on the upper node, with clamping
fn locate(axis: &[f64], x: f64) -> (usize, f64) {
    let n = axis.len();
    if n == 1 {
        return (0, 0.0);
    }
    let min = axis[0];
    let max = axis[n - 1];
    let x = x.clamp(min, max);
    let step = (max - min) / (n - 1) as f64;
    let pos = (x - min) / step;
    let idx = (pos.floor() as usize).min(n - 2);
    (idx, (pos - idx as f64).clamp(0.0, 1.0))
}

impl StateGrid {
    pub fn new(points_per_axis: usize, infected_max: f64) -> Self {
        Self {
            susceptible: linspace(0.0, 1.0, points_per_axis),
            infected: linspace(0.0, infected_max, points_per_axis),
        }
    }

    pub fn from_params(params: &ModelParameters) -> Self {
        Self::new(params.grid_points, params.infected_grid_max)
    }

    pub fn len(&self) -> usize {
        self.susceptible.len() * self.infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, s_idx: usize, i_idx: usize) -> usize {
        s_idx * self.infected.len() + i_idx
    }

    /// State at node `k`, clamped to the feasible simplex
    pub fn node(&self, k: usize) -> State {
        let n_i = self.infected.len();
        State::new(self.susceptible[k / n_i], self.infected[k % n_i]).feasible()
    }

    pub fn nodes(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.len()).map(|k| self.node(k))
    }

    /// Evaluate `f` at every node
    pub fn tabulate(&self, f: impl Fn(State) -> f64) -> Vec<f64> {
        self.nodes().map(f).collect()
    }

    /// Bilinear interpolation of node `values` at `state`.
    ///
    /// States outside the grid box are clamped to its boundary.
    pub fn interpolate(&self, values: &[f64], state: State) -> f64 {
        debug_assert_eq!(values.len(), self.len());

        let (si, sw) = locate(&self.susceptible, state.susceptible);
        let (ii, iw) = locate(&self.infected, state.infected);

        if self.susceptible.len() == 1 || self.infected.len() == 1 {
            return values[self.index(si, ii)];
        }

        let v00 = values[self.index(si, ii)];
        let v01 = values[self.index(si, ii + 1)];
        let v10 = values[self.index(si + 1, ii)];
        let v11 = values[self.index(si + 1, ii + 1)];

        (1.0 - sw) * ((1.0 - iw) * v00 + iw * v01) + sw * ((1.0 - iw) * v10 + iw * v11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_evenly_spaced() {
        let grid = StateGrid::new(5, 0.4);
        assert_eq!(grid.susceptible, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        for (k, x) in grid.infected.iter().enumerate() {
            assert!((x - 0.1 * k as f64).abs() < 1e-12);
        }
        assert_eq!(grid.len(), 25);
    }

    #[test]
    fn test_node_ordering() {
        let grid = StateGrid::new(3, 0.2);
        let node = grid.node(grid.index(1, 2));
        assert_eq!(node.susceptible, 0.5);
        assert!((node.infected - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_infeasible_nodes_are_clamped() {
        let grid = StateGrid::new(3, 0.4);
        // s = 1.0, i = 0.4 is outside the simplex
        let node = grid.node(grid.index(2, 2));
        assert!((node.susceptible - 0.6).abs() < 1e-12);
        assert!((node.infected - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_reproduces_nodes() {
        let grid = StateGrid::new(4, 0.3);
        let values: Vec<f64> = (0..grid.len()).map(|k| (k * k) as f64).collect();
        for s_idx in 0..4 {
            for i_idx in 0..4 {
                let state = State::new(grid.susceptible[s_idx], grid.infected[i_idx]);
                let k = grid.index(s_idx, i_idx);
                assert!((grid.interpolate(&values, state) - values[k]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_interpolation_exact_for_bilinear_functions() {
        let grid = StateGrid::new(6, 0.4);
        let f = |s: f64, i: f64| 2.0 + 3.0 * s - 5.0 * i + 7.0 * s * i;
        let values: Vec<f64> = (0..grid.len())
            .map(|k| {
                let n_i = grid.infected.len();
                f(grid.susceptible[k / n_i], grid.infected[k % n_i])
            })
            .collect();

        for (s, i) in [(0.13, 0.07), (0.5, 0.33), (0.99, 0.01), (0.0, 0.4)] {
            let got = grid.interpolate(&values, State::new(s, i));
            assert!((got - f(s, i)).abs() < 1e-9, "at ({s}, {i}): {got}");
        }
    }

    #[test]
    fn test_interpolation_clamps_outside_box() {
        let grid = StateGrid::new(3, 0.2);
        let values: Vec<f64> = (0..grid.len()).map(|k| k as f64).collect();
        let inside = grid.interpolate(&values, State::new(1.0, 0.2));
        let outside = grid.interpolate(&values, State::new(1.5, 0.9));
        assert_eq!(inside, outside);
        let below = grid.interpolate(&values, State::new(-1.0, -1.0));
        assert_eq!(below, values[0]);
    }
}
