//! Command-line front end for the hammer and scalpel model
//!
//! Solves the scenarios with `hammer_scalpel_core`, stores each result bundle
//! under the output directory and draws the comparison figures as SVG.
//! Figures can be drawn without solving anything from the default results
//! shipped in `data/`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod defaults;
pub mod figures;
pub mod logging;

pub use cli::Cli;
pub use commands::run;
pub use config::{RunConfig, default_out_dir};
pub use figures::{create_fig5, create_fig6, create_fig7, create_stored_figure};
pub use logging::init_logging;
