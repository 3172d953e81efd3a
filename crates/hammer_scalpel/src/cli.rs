use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hammer_scalpel_core::{OptimizerAlgorithm, Policy};

use crate::config::RunConfig;

/// Nodes per control for `--algorithm grid`
pub const GRID_SEARCH_SIZE: usize = 9;

#[derive(Parser, Debug)]
#[command(name = "hammer_scalpel")]
#[command(about = "Optimal isolation policy with imperfect testing during an epidemic")]
pub struct Cli {
    /// Directory for results, figures and the log (default: ~/.hammer_scalpel/)
    #[arg(short, long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// YAML file with model parameters and solver settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Solve the baseline and all four policies, then draw figures 5-7
    Solve {
        #[command(flatten)]
        tuning: TuningArgs,

        /// Store results without drawing figures
        #[arg(long)]
        no_figures: bool,
    },
    /// Simulate the epidemic with no government response
    Nopolicy {
        /// Number of weeks to simulate
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Solve the model under one policy
    Withpolicy {
        /// notest, untargettest, targettest or isolate
        policy: Policy,

        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Redraw one figure from stored results or the shipped defaults
    Figure {
        #[arg(value_parser = clap::value_parser!(u8).range(5..=7))]
        number: u8,
    },
    /// Redraw figures 5, 6 and 7 from stored results or the shipped defaults
    Figures,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    NelderMead,
    Grid,
    Auto,
}

impl From<AlgorithmArg> for OptimizerAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::NelderMead => OptimizerAlgorithm::nelder_mead(),
            AlgorithmArg::Grid => OptimizerAlgorithm::grid_search(GRID_SEARCH_SIZE),
            AlgorithmArg::Auto => OptimizerAlgorithm::Auto,
        }
    }
}

/// Flags that override values from the config file
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct TuningArgs {
    /// Solve the five scenarios on this many worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Number of weeks (TT)
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Grid nodes per state axis
    #[arg(long)]
    pub grid_points: Option<usize>,

    /// P(positive test | infected)
    #[arg(long)]
    pub theta_i: Option<f64>,

    /// P(positive test | not infected)
    #[arg(long)]
    pub theta_s: Option<f64>,

    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,
}

impl TuningArgs {
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(horizon) = self.horizon {
            config.params.horizon = horizon;
        }
        if let Some(grid_points) = self.grid_points {
            config.params.grid_points = grid_points;
        }
        if let Some(theta_i) = self.theta_i {
            config.params.theta_i = theta_i;
        }
        if let Some(theta_s) = self.theta_s {
            config.params.theta_s = theta_s;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm.into();
        }
    }
}
