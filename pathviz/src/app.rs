//! Interactive and headless drivers for a [`Simulation`].

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::runtime::Runtime;

use pathviz_core::{Command, Palette};
use pathviz_crossterm::TerminalDriver;
use pathviz_paths::Outcome;
use pathviz_sim::Simulation;

/// Input poll timeout; also the frame interval.
const FRAME: Duration = Duration::from_millis(16);

/// Run the terminal UI until the user quits.
pub fn interactive(
    rt: &Runtime,
    sim: &mut Simulation,
    palette: &Palette,
    mouse: bool,
) -> Result<()> {
    // searches are spawned from this thread
    let _guard = rt.enter();

    let mut driver = TerminalDriver::new().with_mouse(mouse);
    driver
        .init()
        .map_err(|e| anyhow!("{e}"))
        .context("failed to set up the terminal")?;
    let result = frame_loop(sim, &mut driver, palette);
    driver.close();
    sim.cancel();
    result
}

fn frame_loop(sim: &mut Simulation, driver: &mut TerminalDriver, palette: &Palette) -> Result<()> {
    loop {
        let grid = sim.grid().clone();
        driver
            .draw(&grid, palette, &sim.status().to_string())
            .map_err(|e| anyhow!("draw failed: {e}"))?;
        let cmds = driver
            .poll(&grid, FRAME)
            .map_err(|e| anyhow!("input failed: {e}"))?;
        for cmd in cmds {
            if cmd == Command::Quit {
                return Ok(());
            }
            sim.apply(cmd);
        }
    }
}

/// Run every search once, print the final grid and a line per start.
/// Returns whether every search reached the end.
pub fn headless(rt: &Runtime, sim: &mut Simulation) -> bool {
    let reports = rt.block_on(async {
        sim.run();
        sim.wait_all().await
    });

    print!("{}", sim.grid());
    let end = sim.grid().end();
    if reports.is_empty() {
        println!("no start cells");
        return false;
    }
    let mut all_found = true;
    for (start, report) in &reports {
        match &report.outcome {
            Outcome::Found(route) => println!(
                "{start} -> {end}: {} hops, {} cells expanded",
                route.len().saturating_sub(1),
                report.expanded
            ),
            Outcome::Exhausted => {
                all_found = false;
                println!("{start} -> {end}: unreachable, {} cells expanded", report.expanded);
            }
            Outcome::Cancelled => {
                all_found = false;
                println!("{start} -> {end}: cancelled");
            }
        }
    }
    all_found
}
