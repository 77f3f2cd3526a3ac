//! Command-line grid generator: load a rule file, solve, print the result.

mod config;
mod logging;
mod output;

use anyhow::Context;
use clap::Parser;
use config::AppConfig;
use log::info;
use tileweave_solver::Solver;
use tileweave_tiles::load_from_file;

fn main() -> anyhow::Result<()> {
    let app_config = AppConfig::parse();
    logging::init_logger(&app_config);

    info!("loading rules from {}", app_config.rule_file.display());
    let tiles = load_from_file(&app_config.rule_file).with_context(|| {
        format!("failed to load rules from {}", app_config.rule_file.display())
    })?;
    info!(
        "loaded {} tiles with {} rotation(s) each",
        tiles.num_tiles(),
        tiles.rotations()
    );

    let solver = Solver::new(app_config.solver_config())?;
    let solved = solver.solve(&tiles).context("grid generation failed")?;

    let rendered = output::render(&solved, &tiles);
    println!("{rendered}");

    if let Some(path) = &app_config.output_path {
        std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote grid to {}", path.display());
    }
    Ok(())
}
