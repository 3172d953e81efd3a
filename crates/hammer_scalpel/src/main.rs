use clap::Parser;
use hammer_scalpel::{Cli, default_out_dir, init_logging, run};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let out_dir = cli.out_dir.clone().unwrap_or_else(default_out_dir);

    let _log_guard = init_logging(&out_dir, &cli.log_level)?;
    tracing::info!(out_dir = %out_dir.display(), "starting");

    let result = run(cli, &out_dir);
    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    result
}
