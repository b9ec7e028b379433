//! pathviz: animated BFS/DFS on a terminal grid.

mod app;
mod cli;

use std::fs::File;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use pathviz_sim::Simulation;

use cli::Cli;

fn init_logging(cli: &Cli) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            env_logger::Builder::from_env(env)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // stderr would scribble over the terminal UI
        None if !cli.headless => {}
        None => env_logger::Builder::from_env(env).init(),
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.to_config();
    let mut sim = Simulation::new(&config).context("invalid configuration")?;
    log::info!(
        "grid {}x{}, {} search, step delay {}ms",
        config.rows,
        config.columns,
        config.algorithm,
        config.step_delay_ms
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("failed to start the tokio runtime")?;

    if cli.headless {
        let ok = app::headless(&rt, &mut sim);
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    app::interactive(&rt, &mut sim, &config.palette, !cli.no_mouse)?;
    Ok(ExitCode::SUCCESS)
}
