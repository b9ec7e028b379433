//! Command-line flags and their mapping onto [`SimConfig`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use pathviz_core::{Algorithm, Pos};
use pathviz_sim::{ResetPolicy, SimConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AlgoArg {
    Bfs,
    Dfs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResetArg {
    /// Refuse to reset while searches run
    Block,
    /// Cancel running searches, then reset
    Cancel,
}

/// Animate breadth-first and depth-first searches on a grid in the terminal
#[derive(Parser, Debug)]
#[command(name = "pathviz", version, about)]
pub struct Cli {
    /// Number of grid rows
    #[arg(long, default_value_t = 20)]
    pub rows: i32,

    /// Number of grid columns
    #[arg(long, default_value_t = 20)]
    pub columns: i32,

    /// Terminal columns per cell
    #[arg(long, default_value_t = 2)]
    pub cell_width: u32,

    /// Terminal rows per cell
    #[arg(long, default_value_t = 1)]
    pub cell_height: u32,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value_t = AlgoArg::Bfs)]
    pub algorithm: AlgoArg,

    /// Allow diagonal steps
    #[arg(short, long)]
    pub diagonals: bool,

    /// Pause after each enqueued neighbour, in milliseconds
    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,

    /// What reset does while searches are running
    #[arg(long, value_enum, default_value_t = ResetArg::Cancel)]
    pub reset_policy: ResetArg,

    /// Start cell as ROW,COL (repeatable)
    #[arg(short, long = "start", value_parser = parse_pos)]
    pub starts: Vec<Pos>,

    /// End cell as ROW,COL
    #[arg(short, long, value_parser = parse_pos)]
    pub end: Option<Pos>,

    /// Fraction of cells to turn into walls at startup (0.0 to 1.0)
    #[arg(short, long, default_value_t = 0.0)]
    pub walls: f64,

    /// Seed for random endpoints and walls
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run once without the terminal UI and print the result
    #[arg(long)]
    pub headless: bool,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not capture the mouse
    #[arg(long)]
    pub no_mouse: bool,
}

impl Cli {
    pub fn to_config(&self) -> SimConfig {
        SimConfig {
            rows: self.rows,
            columns: self.columns,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            algorithm: match self.algorithm {
                AlgoArg::Bfs => Algorithm::Bfs,
                AlgoArg::Dfs => Algorithm::Dfs,
            },
            diagonals: self.diagonals,
            step_delay_ms: self.delay_ms,
            reset_policy: match self.reset_policy {
                ResetArg::Block => ResetPolicy::Block,
                ResetArg::Cancel => ResetPolicy::Cancel,
            },
            starts: self.starts.clone(),
            end: self.end,
            random_endpoints: true,
            wall_density: self.walls,
            seed: self.seed,
            ..SimConfig::default()
        }
    }
}

/// Parse `ROW,COL`.
fn parse_pos(s: &str) -> Result<Pos, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got `{s}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row `{row}`: {e}"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("bad column `{col}`: {e}"))?;
    Ok(Pos::new(row, col))
}
