//! Process-start configuration: [`SimConfig`], [`ResetPolicy`], [`ConfigError`].

use std::fmt;
use std::time::Duration;

use pathviz_core::{Algorithm, Dims, MAX_PATHFINDERS, Palette, Pos};

/// What `reset` does while searches are still running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResetPolicy {
    /// Refuse to reset until every run has finished.
    Block,
    /// Cancel running searches, then reset. A cancelled run stops at its
    /// next suspension point.
    #[default]
    Cancel,
}

/// Simulation settings, fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub rows: i32,
    pub columns: i32,
    /// Drawn width of one cell, in renderer units.
    pub cell_width: u32,
    /// Drawn height of one cell, in renderer units.
    pub cell_height: u32,
    pub algorithm: Algorithm,
    pub diagonals: bool,
    /// Pause after each enqueued neighbour, in milliseconds.
    pub step_delay_ms: u64,
    pub reset_policy: ResetPolicy,
    pub starts: Vec<Pos>,
    pub end: Option<Pos>,
    /// Place one random start and a random end when none are configured.
    pub random_endpoints: bool,
    /// Fraction of cells turned into walls at startup.
    pub wall_density: f64,
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 20,
            cell_width: 2,
            cell_height: 1,
            algorithm: Algorithm::Bfs,
            diagonals: false,
            step_delay_ms: 20,
            reset_policy: ResetPolicy::Cancel,
            starts: Vec::new(),
            end: None,
            random_endpoints: true,
            wall_density: 0.0,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.rows, self.columns)
    }

    #[inline]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Drawing area `(width, height)` in renderer units, or `None` if it
    /// does not fit in a `u32`.
    pub fn extent(&self) -> Option<(u32, u32)> {
        let columns = u32::try_from(self.columns).ok()?;
        let rows = u32::try_from(self.rows).ok()?;
        Some((
            columns.checked_mul(self.cell_width)?,
            rows.checked_mul(self.cell_height)?,
        ))
    }

    /// Check the settings before a simulation is built from them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = self.dims();
        if dims.is_empty() {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.extent().is_none() {
            return Err(ConfigError::ExtentOverflow);
        }
        if !(0.0..=1.0).contains(&self.wall_density) {
            return Err(ConfigError::WallDensity(self.wall_density));
        }
        if self.starts.len() > MAX_PATHFINDERS {
            return Err(ConfigError::TooManyStarts(self.starts.len()));
        }
        for &p in &self.starts {
            if !dims.contains(p) {
                return Err(ConfigError::OutOfBounds { what: "start", pos: p });
            }
        }
        if let Some(end) = self.end {
            if !dims.contains(end) {
                return Err(ConfigError::OutOfBounds { what: "end", pos: end });
            }
            if self.starts.contains(&end) {
                return Err(ConfigError::StartIsEnd(end));
            }
        }
        Ok(())
    }
}

/// Rejected configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    EmptyGrid { rows: i32, columns: i32 },
    ZeroCellSize,
    /// Rows or columns times the cell size does not fit the drawing area.
    ExtentOverflow,
    WallDensity(f64),
    TooManyStarts(usize),
    OutOfBounds { what: &'static str, pos: Pos },
    StartIsEnd(Pos),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, columns } => {
                write!(f, "grid must be at least 1x1, got {rows}x{columns}")
            }
            Self::ZeroCellSize => f.write_str("cell width and height must be non-zero"),
            Self::ExtentOverflow => f.write_str("grid extent overflows the drawing area"),
            Self::WallDensity(d) => write!(f, "wall density {d} is outside 0.0..=1.0"),
            Self::TooManyStarts(n) => {
                write!(f, "{n} start cells requested, at most {MAX_PATHFINDERS} supported")
            }
            Self::OutOfBounds { what, pos } => write!(f, "{what} cell {pos} is outside the grid"),
            Self::StartIsEnd(p) => write!(f, "cell {p} is both a start and the end"),
        }
    }
}

impl std::error::Error for ConfigError {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{"rows": 5, "columns": 7, "algorithm": "dfs", "reset_policy": "block"}"#;
        let c: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.dims(), Dims::new(5, 7));
        assert_eq!(c.algorithm, Algorithm::Dfs);
        assert_eq!(c.reset_policy, ResetPolicy::Block);
        assert_eq!(c.step_delay_ms, 20);
        assert_eq!(c.palette, Palette::default());
    }

    #[test]
    fn config_round_trip() {
        let c = SimConfig {
            starts: vec![Pos::new(0, 0), Pos::new(3, 3)],
            end: Some(Pos::new(9, 9)),
            seed: Some(42),
            ..SimConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
