//! **pathviz-core**: grid and cell model for the pathfinding visualiser.
//!
//! This crate provides the types every other *pathviz* crate builds on:
//! geometry, atomically updated cells, the shareable grid with its
//! adjacency rules, the colour palette, and the input command vocabulary.

pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use cell::{Cell, Flags, MAX_PATHFINDERS, Marker, PathfinderId, VisualState};
pub use geom::{Dims, Pos};
pub use grid::{CellSize, CellView, Grid};
pub use messages::{Algorithm, Command};
pub use style::{Color, Palette};
