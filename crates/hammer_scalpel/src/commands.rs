//! Command handlers behind the CLI

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;

use hammer_scalpel_core::{
    ModelSolution, ResultStore, ScenarioResult, nopolicy, solve_model, withpolicy,
};

use crate::cli::{Cli, Command};
use crate::config::RunConfig;
use crate::figures::{FIGURES, create_figure, create_stored_figure, figure_spec};

/// Output locations under the chosen output directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub results: ResultStore,
    pub figures: PathBuf,
}

impl OutputLayout {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            results: ResultStore::new(out_dir.join("results")),
            figures: out_dir.join("figures"),
        }
    }
}

pub fn run(cli: Cli, out_dir: &Path) -> color_eyre::Result<()> {
    let layout = OutputLayout::new(out_dir);
    let mut config = RunConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Solve { tuning, no_figures } => {
            tuning.apply(&mut config);
            let solution = solve_model(&config.solve_options()).wrap_err("solving the model")?;
            layout
                .results
                .save_solution(&solution)
                .wrap_err("storing results")?;
            print_summary(&solution.results);
            println!("results stored in {}", layout.results.root().display());

            if !no_figures {
                for path in draw_all(&solution, &layout.figures)? {
                    println!("wrote {}", path.display());
                }
            }
        }
        Command::Nopolicy { horizon } => {
            if let Some(horizon) = horizon {
                config.params.horizon = horizon;
            }
            let result = nopolicy(&config.params).wrap_err("simulating the baseline")?;
            layout.results.save(&result).wrap_err("storing results")?;
            print_summary(std::slice::from_ref(&result));
        }
        Command::Withpolicy { policy, tuning } => {
            tuning.apply(&mut config);
            let result = withpolicy(policy, &config.params, &config.algorithm, config.workers)
                .wrap_err_with(|| format!("solving policy {policy}"))?;
            layout.results.save(&result).wrap_err("storing results")?;
            print_summary(std::slice::from_ref(&result));
        }
        Command::Figure { number } => {
            let spec = figure_spec(number)
                .ok_or_else(|| color_eyre::eyre::eyre!("no figure {number}"))?;
            let path = create_stored_figure(&layout.results, spec, &layout.figures)?;
            println!("wrote {}", path.display());
        }
        Command::Figures => {
            for spec in FIGURES {
                let path = create_stored_figure(&layout.results, spec, &layout.figures)?;
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}

/// Draw figures 5-7 from a solution held in memory
pub fn draw_all(solution: &ModelSolution, figures_dir: &Path) -> color_eyre::Result<Vec<PathBuf>> {
    FIGURES
        .iter()
        .map(|spec| {
            create_figure(
                *spec,
                |scenario| {
                    solution.get(scenario).ok_or_else(|| {
                        color_eyre::eyre::eyre!("solution has no result for {scenario}")
                    })
                },
                figures_dir,
            )
        })
        .collect()
}

fn print_summary(results: &[ScenarioResult]) {
    println!(
        "{:<14} {:>12} {:>6} {:>10} {:>10} {:>12}",
        "scenario", "welfare", "peak", "peak inf", "deaths", "output loss"
    );
    for result in results {
        let (peak_week, peak) = result.series.peak_infected().unwrap_or((0, 0.0));
        println!(
            "{:<14} {:>12.3} {:>6} {:>10.4} {:>10.5} {:>12.3}",
            result.scenario.label(),
            result.welfare,
            peak_week,
            peak,
            result.series.cumulative_deaths(),
            result.series.output_loss(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TuningArgs;
    use crate::figures::load_or_default;
    use hammer_scalpel_core::{Policy, Scenario};
    use tempfile::tempdir;

    fn tiny_tuning() -> TuningArgs {
        TuningArgs {
            horizon: Some(3),
            grid_points: Some(4),
            ..Default::default()
        }
    }

    fn cli(command: Command) -> Cli {
        Cli {
            out_dir: None,
            config: None,
            log_level: "info".to_string(),
            command,
        }
    }

    #[test]
    fn test_solve_stores_results_and_figures() {
        let dir = tempdir().unwrap();
        run(
            cli(Command::Solve {
                tuning: tiny_tuning(),
                no_figures: false,
            }),
            dir.path(),
        )
        .unwrap();

        let layout = OutputLayout::new(dir.path());
        for scenario in Scenario::ALL {
            assert!(layout.results.exists(scenario), "{scenario}");
        }
        for spec in FIGURES {
            assert!(layout.figures.join(spec.file_name()).exists());
        }
    }

    #[test]
    fn test_figures_on_empty_dir_use_shipped_defaults() {
        let dir = tempdir().unwrap();
        run(cli(Command::Figures), dir.path()).unwrap();

        let layout = OutputLayout::new(dir.path());
        for spec in FIGURES {
            assert!(layout.figures.join(spec.file_name()).exists());
        }
        assert!(!layout.results.root().exists());
    }

    #[test]
    fn test_figure_prefers_stored_results() {
        let dir = tempdir().unwrap();
        run(cli(Command::Nopolicy { horizon: Some(4) }), dir.path()).unwrap();
        run(
            cli(Command::Withpolicy {
                policy: Policy::NoTest,
                tuning: tiny_tuning(),
            }),
            dir.path(),
        )
        .unwrap();
        run(
            cli(Command::Withpolicy {
                policy: Policy::UntargetedTest,
                tuning: tiny_tuning(),
            }),
            dir.path(),
        )
        .unwrap();

        run(cli(Command::Figure { number: 5 }), dir.path()).unwrap();
        let layout = OutputLayout::new(dir.path());
        assert!(layout.figures.join("fig5.svg").exists());
        let noint = load_or_default(&layout.results, Scenario::NoIntervention).unwrap();
        assert_eq!(noint.horizon(), 4);
    }
}
