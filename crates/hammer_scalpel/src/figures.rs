//! Comparison figures
//!
//! Each figure stacks three panels over the week axis: infected share, the
//! reproduction number and output relative to the pre-pandemic level.
//!
//! | Figure | Scenarios |
//! |---|---|
//! | 5 | no intervention, no tests, untargeted tests |
//! | 6 | no tests, untargeted tests, targeted tests |
//! | 7 | untargeted tests, targeted tests, tracing only |

use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail};
use plotters::prelude::*;

use hammer_scalpel_core::{Policy, ResultStore, Scenario, ScenarioResult, StorageError, TimeSeries};

use crate::defaults::default_result;

const FIGURE_SIZE: (u32, u32) = (900, 1100);
const SERIES_COLORS: [RGBColor; 3] = [BLUE, RED, RGBColor(0, 140, 60)];

/// Which scenarios a figure compares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSpec {
    pub number: u8,
    pub title: &'static str,
    pub scenarios: [Scenario; 3],
}

impl FigureSpec {
    pub fn file_name(&self) -> String {
        format!("fig{}.svg", self.number)
    }
}

pub const FIGURES: [FigureSpec; 3] = [
    FigureSpec {
        number: 5,
        title: "Figure 5: the hammer",
        scenarios: [
            Scenario::NoIntervention,
            Scenario::Policy(Policy::NoTest),
            Scenario::Policy(Policy::UntargetedTest),
        ],
    },
    FigureSpec {
        number: 6,
        title: "Figure 6: the scalpel",
        scenarios: [
            Scenario::Policy(Policy::NoTest),
            Scenario::Policy(Policy::UntargetedTest),
            Scenario::Policy(Policy::TargetedTest),
        ],
    },
    FigureSpec {
        number: 7,
        title: "Figure 7: tests versus tracing",
        scenarios: [
            Scenario::Policy(Policy::UntargetedTest),
            Scenario::Policy(Policy::TargetedTest),
            Scenario::Policy(Policy::Isolate),
        ],
    },
];

pub fn figure_spec(number: u8) -> Option<FigureSpec> {
    FIGURES.iter().copied().find(|f| f.number == number)
}

fn infected(series: &TimeSeries) -> &[f64] {
    &series.infected
}

fn reproduction(series: &TimeSeries) -> &[f64] {
    &series.reproduction
}

fn output(series: &TimeSeries) -> &[f64] {
    &series.output
}

type Panel = (&'static str, fn(&TimeSeries) -> &[f64]);

const PANELS: [Panel; 3] = [
    ("Infected share", infected),
    ("Reproduction number", reproduction),
    ("Output (pre-pandemic = 1)", output),
];

/// Padded y-range covering every series of a panel
fn y_range<'a>(values: impl Iterator<Item = &'a [f64]>) -> (f64, f64) {
    let (lo, hi) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-3);
    (lo - pad, hi + pad)
}

/// Draw three scenarios into one SVG file
fn render(title: &str, results: [&ScenarioResult; 3], out_path: &Path) -> color_eyre::Result<()> {
    for result in results {
        if result.series.is_empty() {
            bail!("{} has no simulated periods to plot", result.scenario);
        }
    }
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let weeks = results.iter().map(|r| r.series.len()).max().unwrap_or(1);
    let x_max = (weeks.max(2) - 1) as f64;

    let root = SVGBackend::new(out_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(title, ("sans-serif", 26))?;
    let areas = body.split_evenly((3, 1));

    for (area, (caption, extract)) in areas.iter().zip(PANELS) {
        let (y_lo, y_hi) = y_range(results.iter().map(|r| extract(&r.series)));

        let mut chart = ChartBuilder::on(area)
            .caption(caption, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("week")
            .light_line_style(WHITE.mix(0.0))
            .draw()?;

        for (result, color) in results.iter().zip(SERIES_COLORS) {
            let points = extract(&result.series)
                .iter()
                .enumerate()
                .map(|(t, &v)| (t as f64, v));
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                .label(result.scenario.display_name())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()
        .wrap_err_with(|| format!("writing {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "figure written");
    Ok(())
}

/// No intervention vs. no tests vs. untargeted tests
pub fn create_fig5(
    noint: &ScenarioResult,
    notest: &ScenarioResult,
    untarget: &ScenarioResult,
    out_path: &Path,
) -> color_eyre::Result<()> {
    render(FIGURES[0].title, [noint, notest, untarget], out_path)
}

/// No tests vs. untargeted tests vs. targeted tests
pub fn create_fig6(
    notest: &ScenarioResult,
    untarget: &ScenarioResult,
    target: &ScenarioResult,
    out_path: &Path,
) -> color_eyre::Result<()> {
    render(FIGURES[1].title, [notest, untarget, target], out_path)
}

/// Untargeted tests vs. targeted tests vs. tracing only
pub fn create_fig7(
    untarget: &ScenarioResult,
    target: &ScenarioResult,
    isolate: &ScenarioResult,
    out_path: &Path,
) -> color_eyre::Result<()> {
    render(FIGURES[2].title, [untarget, target, isolate], out_path)
}

/// Draw a figure from whichever bundles `lookup` provides
pub fn create_figure<'a>(
    spec: FigureSpec,
    mut lookup: impl FnMut(Scenario) -> color_eyre::Result<&'a ScenarioResult>,
    out_dir: &Path,
) -> color_eyre::Result<PathBuf> {
    let [a, b, c] = spec.scenarios;
    let (a, b, c) = (lookup(a)?, lookup(b)?, lookup(c)?);
    let out_path = out_dir.join(spec.file_name());
    match spec.number {
        5 => create_fig5(a, b, c, &out_path)?,
        6 => create_fig6(a, b, c, &out_path)?,
        _ => create_fig7(a, b, c, &out_path)?,
    }
    Ok(out_path)
}

/// Load a bundle from the store, falling back to the shipped default result
/// when the store has none for `scenario`
pub fn load_or_default(
    store: &ResultStore,
    scenario: Scenario,
) -> color_eyre::Result<ScenarioResult> {
    match store.load(scenario) {
        Ok(result) => Ok(result),
        Err(StorageError::Missing(_)) => {
            tracing::info!(%scenario, "no stored result, using the shipped default");
            default_result(scenario)
                .wrap_err_with(|| format!("parsing shipped default result for {scenario}"))
        }
        Err(e) => Err(e).wrap_err_with(|| format!("loading stored result for {scenario}")),
    }
}

/// Redraw a figure from bundles in the result store, or from the shipped
/// defaults for scenarios that were never solved
pub fn create_stored_figure(
    store: &ResultStore,
    spec: FigureSpec,
    out_dir: &Path,
) -> color_eyre::Result<PathBuf> {
    let bundles = spec
        .scenarios
        .iter()
        .map(|s| load_or_default(store, *s))
        .collect::<color_eyre::Result<Vec<_>>>()
        .wrap_err_with(|| format!("loading results for figure {}", spec.number))?;
    create_figure(
        spec,
        |scenario| {
            bundles
                .iter()
                .find(|r| r.scenario == scenario)
                .ok_or_else(|| color_eyre::eyre::eyre!("no stored result for {scenario}"))
        },
        out_dir,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hammer_scalpel_core::ModelParameters;
    use hammer_scalpel_core::solver::simulate_unmitigated;
    use tempfile::tempdir;

    fn bundle(scenario: Scenario, horizon: usize) -> ScenarioResult {
        let params = ModelParameters::default().horizon(horizon);
        ScenarioResult {
            scenario,
            ..simulate_unmitigated(&params).unwrap()
        }
    }

    #[test]
    fn test_figure_specs() {
        assert_eq!(figure_spec(6).unwrap().file_name(), "fig6.svg");
        assert!(figure_spec(4).is_none());
        assert_eq!(FIGURES[2].scenarios[2], Scenario::Policy(Policy::Isolate));
    }

    #[test]
    fn test_y_range_pads_flat_series() {
        let flat = [1.0, 1.0, 1.0];
        let (lo, hi) = y_range(std::iter::once(&flat[..]));
        assert!(lo < 1.0 && hi > 1.0);
        assert_eq!(y_range(std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn test_create_fig5_writes_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fig5.svg");
        let noint = bundle(Scenario::NoIntervention, 10);
        let notest = bundle(Scenario::Policy(Policy::NoTest), 10);
        // Unequal lengths are plotted over their own lengths
        let untarget = bundle(Scenario::Policy(Policy::UntargetedTest), 6);

        create_fig5(&noint, &notest, &untarget, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Infected share"));
    }

    #[test]
    fn test_empty_series_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fig7.svg");
        let full = bundle(Scenario::Policy(Policy::UntargetedTest), 5);
        let empty = ScenarioResult {
            series: TimeSeries::default(),
            ..bundle(Scenario::Policy(Policy::Isolate), 5)
        };

        let err = create_fig7(&full, &full, &empty, &path).unwrap_err();
        assert!(err.to_string().contains("isolate"));
        assert!(!path.exists());
    }

    #[test]
    fn test_stored_figure() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("results"));
        for scenario in FIGURES[1].scenarios {
            store.save(&bundle(scenario, 8)).unwrap();
        }

        let path = create_stored_figure(&store, FIGURES[1], &dir.path().join("figures")).unwrap();
        assert!(path.ends_with("fig6.svg"));
        assert!(path.exists());

        // The baseline was never stored, so figure 5 uses the shipped one
        let path = create_stored_figure(&store, FIGURES[0], dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_stored_result_wins_over_default() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let solved = bundle(Scenario::Policy(Policy::NoTest), 4);
        store.save(&solved).unwrap();

        let loaded = load_or_default(&store, Scenario::Policy(Policy::NoTest)).unwrap();
        assert_eq!(loaded, solved);

        let fallback = load_or_default(&store, Scenario::NoIntervention).unwrap();
        assert_eq!(fallback, default_result(Scenario::NoIntervention).unwrap());
    }

    #[test]
    fn test_corrupt_stored_result_is_an_error() {
        let dir = tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        std::fs::write(store.path(Scenario::NoIntervention), "{").unwrap();

        let err = create_stored_figure(&store, FIGURES[0], dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("noint"));
    }
}
