//! Input vocabulary: [`Command`] and [`Algorithm`].
//!
//! Front-ends translate keys and clicks into `Command`s; the controller
//! applies them to the grid and its searches.

use std::fmt;

use crate::geom::Pos;

/// Frontier discipline of a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    /// Breadth-first: FIFO frontier, minimal hop count.
    #[default]
    Bfs,
    /// Depth-first: LIFO frontier, no optimality guarantee.
    Dfs,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
        })
    }
}

/// A user request forwarded into the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set (`true`) or clear (`false`) a wall.
    ToggleWall { pos: Pos, value: bool },
    /// Add or remove a start cell.
    SetStart { pos: Pos, enabled: bool },
    /// Move the end cell.
    SetEnd { pos: Pos },
    /// Start every idle search.
    Run,
    /// Clear search and wall state.
    Reset,
    /// Clear search state, keeping walls.
    ClearSearch,
    SetAlgorithm(Algorithm),
    ToggleDiagonals,
    /// Pick random start and end cells.
    Randomize,
    Quit,
}
