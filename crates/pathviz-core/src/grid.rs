//! The [`Grid`] type: a fixed-size, shareable collection of [`Cell`]s.
//!
//! A `Grid` is `Sync`: wrap it in an `Arc` and hand clones to the renderer,
//! the controller and every running search. Cells mutate through atomics,
//! so no method needs `&mut self`.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cell::{Cell, Marker, PathfinderId, VisualState};
use crate::geom::{DIAGONAL, Dims, ORTHOGONAL, Pos};

// ---------------------------------------------------------------------------
// CellSize / CellView
// ---------------------------------------------------------------------------

/// Drawn size of one cell, in whatever unit the renderer uses (pixels,
/// terminal columns).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Everything a renderer needs to draw one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub pos: Pos,
    pub size: CellSize,
    pub state: VisualState,
    pub marker: Marker,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A `rows × columns` grid with exactly one end cell and any number of
/// start cells.
pub struct Grid {
    dims: Dims,
    cell_size: CellSize,
    cells: Box<[Cell]>,
    end: AtomicUsize,
}

impl Grid {
    /// Create a grid with unit-sized cells. Dimensions are clamped to at
    /// least 1×1. The end cell starts at the bottom-right corner.
    pub fn new(rows: i32, columns: i32) -> Self {
        Self::with_extent(rows, columns, columns.max(1) as u32, rows.max(1) as u32)
    }

    /// Create a grid whose cells split a `width × height` drawing area.
    pub fn with_extent(rows: i32, columns: i32, width: u32, height: u32) -> Self {
        let dims = Dims::new(rows.max(1), columns.max(1));
        let cell_size = CellSize::new(
            (width / dims.columns as u32).max(1),
            (height / dims.rows as u32).max(1),
        );
        let cells: Box<[Cell]> = dims.iter().map(Cell::new).collect();
        let end = dims.len() - 1;
        cells[end].set_end();
        Self {
            dims,
            cell_size,
            cells,
            end: AtomicUsize::new(end),
        }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.dims.rows
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.dims.columns
    }

    #[inline]
    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        self.dims.contains(p)
    }

    /// The cell at `p`, or `None` when out of bounds.
    #[inline]
    pub fn cell(&self, p: Pos) -> Option<&Cell> {
        self.dims.index(p).map(|i| &self.cells[i])
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Position of the end cell.
    pub fn end(&self) -> Pos {
        self.dims.pos(self.end.load(Ordering::Acquire))
    }

    /// Positions of all start cells, row-major.
    pub fn starts(&self) -> Vec<Pos> {
        self.cells
            .iter()
            .filter(|c| c.is_start())
            .map(Cell::pos)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Adjacency
    // -----------------------------------------------------------------------

    /// In-bounds, non-wall neighbours of `p`.
    ///
    /// Order is fixed: up, down, left, right, then (when `diagonals` is set)
    /// up-left, up-right, down-left, down-right. Searches rely on it for
    /// tie-breaking.
    pub fn neighbors(&self, p: Pos, diagonals: bool) -> Vec<Pos> {
        let mut buf = Vec::with_capacity(8);
        self.neighbors_into(p, diagonals, &mut buf);
        buf
    }

    /// Like [`neighbors`](Grid::neighbors), appending into `buf`.
    pub fn neighbors_into(&self, p: Pos, diagonals: bool, buf: &mut Vec<Pos>) {
        let diag: &[Pos] = if diagonals { &DIAGONAL } else { &[] };
        for &d in ORTHOGONAL.iter().chain(diag) {
            let n = p + d;
            if self.cell(n).is_some_and(|c| !c.is_wall()) {
                buf.push(n);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Set or clear a wall. Silently refused on start, end, path and
    /// out-of-bounds cells. Returns whether the edit was applied.
    pub fn toggle_wall(&self, p: Pos, value: bool) -> bool {
        let applied = self.cell(p).is_some_and(|c| c.set_wall(value));
        if !applied {
            log::debug!("wall edit at {p} refused");
        }
        applied
    }

    /// Designate or undesignate a start cell. Refused on walls, the end
    /// cell, and out-of-bounds positions.
    pub fn set_start(&self, p: Pos, enabled: bool) -> bool {
        let applied = self.cell(p).is_some_and(|c| c.set_start(enabled));
        if !applied {
            log::debug!("start edit at {p} (enabled={enabled}) refused");
        }
        applied
    }

    /// Move the end marker to `p`. Refused on walls, start cells and
    /// out-of-bounds positions; the previous end is kept in that case.
    pub fn set_end(&self, p: Pos) -> bool {
        let Some(i) = self.dims.index(p) else {
            log::debug!("end edit at {p} out of bounds");
            return false;
        };
        if !self.cells[i].set_end() {
            log::debug!("end edit at {p} refused");
            return false;
        }
        let prev = self.end.swap(i, Ordering::AcqRel);
        if prev != i {
            self.cells[prev].clear_end();
        }
        true
    }

    /// Clear visited, visiting, path and wall state on every cell. Start and
    /// end designations are kept.
    pub fn reset(&self) {
        for c in self.cells.iter() {
            c.reset();
        }
    }

    /// Clear visited, visiting and path state, keeping walls.
    pub fn clear_search(&self) {
        for c in self.cells.iter() {
            c.clear_search();
        }
    }

    /// Remove `id` from every cell's visited mask.
    pub fn forget(&self, id: PathfinderId) {
        for c in self.cells.iter() {
            c.forget(id);
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Call `visitor` once per cell in row-major order.
    pub fn render<F: FnMut(CellView)>(&self, mut visitor: F) {
        for c in self.cells.iter() {
            visitor(CellView {
                pos: c.pos(),
                size: self.cell_size,
                state: c.visual_state(),
                marker: c.marker(),
            });
        }
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: VisualState) -> usize {
        self.cells
            .iter()
            .filter(|c| c.visual_state() == state)
            .count()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("dims", &self.dims)
            .field("cell_size", &self.cell_size)
            .field("end", &self.end())
            .finish_non_exhaustive()
    }
}

/// One character per cell: `S`/`E` markers, `*` path, `o` visited,
/// `+` visiting, `#` wall, `.` empty.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.dims.rows {
            for col in 0..self.dims.columns {
                let Some(c) = self.cell(Pos::new(row, col)) else {
                    continue;
                };
                let ch = match (c.marker(), c.visual_state()) {
                    (Marker::Start, _) => 'S',
                    (Marker::End, _) => 'E',
                    (_, VisualState::Path) => '*',
                    (_, VisualState::Visited) => 'o',
                    (_, VisualState::Visiting) => '+',
                    (_, VisualState::Wall) => '#',
                    (_, VisualState::Default) => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_row_major_and_default() {
        let g = Grid::new(3, 4);
        assert_eq!(g.dims(), Dims::new(3, 4));
        let ps: Vec<Pos> = g.cells().map(Cell::pos).collect();
        assert_eq!(ps[0], Pos::new(0, 0));
        assert_eq!(ps[5], Pos::new(1, 1));
        assert_eq!(g.count(VisualState::Default), 12);
        assert_eq!(g.end(), Pos::new(2, 3));
    }

    #[test]
    fn degenerate_dims_are_clamped() {
        let g = Grid::new(0, -3);
        assert_eq!(g.dims(), Dims::new(1, 1));
        assert_eq!(g.end(), Pos::new(0, 0));
        assert!(g.neighbors(Pos::new(0, 0), true).is_empty());
    }

    #[test]
    fn cell_size_from_extent() {
        let g = Grid::with_extent(20, 20, 600, 600);
        assert_eq!(g.cell_size(), CellSize::new(30, 30));
    }

    #[test]
    fn neighbors_fixed_order() {
        let g = Grid::new(3, 3);
        let c = Pos::new(1, 1);
        assert_eq!(
            g.neighbors(c, false),
            vec![Pos::new(0, 1), Pos::new(2, 1), Pos::new(1, 0), Pos::new(1, 2)]
        );
        assert_eq!(
            g.neighbors(c, true),
            vec![
                Pos::new(0, 1),
                Pos::new(2, 1),
                Pos::new(1, 0),
                Pos::new(1, 2),
                Pos::new(0, 0),
                Pos::new(0, 2),
                Pos::new(2, 0),
                Pos::new(2, 2),
            ]
        );
    }

    #[test]
    fn neighbors_respect_bounds_and_walls() {
        let g = Grid::new(3, 3);
        assert_eq!(
            g.neighbors(Pos::new(0, 0), false),
            vec![Pos::new(1, 0), Pos::new(0, 1)]
        );
        // bottom-right corner: no off-by-one at rows/columns
        assert_eq!(
            g.neighbors(Pos::new(2, 2), true),
            vec![Pos::new(1, 2), Pos::new(2, 1), Pos::new(1, 1)]
        );
        g.toggle_wall(Pos::new(1, 0), true);
        assert_eq!(g.neighbors(Pos::new(0, 0), false), vec![Pos::new(0, 1)]);
    }

    #[test]
    fn neighbors_only_in_bounds_everywhere() {
        for (rows, cols) in [(1, 1), (1, 5), (4, 1), (3, 7)] {
            let g = Grid::new(rows, cols);
            for p in g.dims() {
                for n in g.neighbors(p, true) {
                    assert!(g.contains(n), "{n} escaped {rows}x{cols}");
                    assert!(p.is_adjacent(n, true));
                }
            }
        }
    }

    #[test]
    fn wall_toggle_guards() {
        let g = Grid::new(3, 3);
        assert!(g.toggle_wall(Pos::new(0, 1), true));
        assert!(g.cell(Pos::new(0, 1)).unwrap().is_wall());
        assert!(g.toggle_wall(Pos::new(0, 1), false));
        assert!(!g.cell(Pos::new(0, 1)).unwrap().is_wall());

        assert!(!g.toggle_wall(g.end(), true));
        g.set_start(Pos::new(0, 0), true);
        assert!(!g.toggle_wall(Pos::new(0, 0), true));
        g.cell(Pos::new(1, 1)).unwrap().mark_path();
        assert!(!g.toggle_wall(Pos::new(1, 1), true));
        assert!(!g.toggle_wall(Pos::new(9, 9), true));
    }

    #[test]
    fn exactly_one_end() {
        let g = Grid::new(3, 3);
        assert!(g.set_end(Pos::new(0, 2)));
        assert_eq!(g.end(), Pos::new(0, 2));
        let ends = g.cells().filter(|c| c.is_end()).count();
        assert_eq!(ends, 1);

        g.toggle_wall(Pos::new(1, 1), true);
        assert!(!g.set_end(Pos::new(1, 1)));
        assert!(!g.set_end(Pos::new(5, 5)));
        assert_eq!(g.end(), Pos::new(0, 2));

        g.set_start(Pos::new(0, 0), true);
        assert!(!g.set_end(Pos::new(0, 0)));
        assert_eq!(g.cells().filter(|c| c.is_end()).count(), 1);
    }

    #[test]
    fn starts_are_listed() {
        let g = Grid::new(3, 3);
        assert!(g.set_start(Pos::new(2, 0), true));
        assert!(g.set_start(Pos::new(0, 1), true));
        assert!(!g.set_start(g.end(), true));
        assert_eq!(g.starts(), vec![Pos::new(0, 1), Pos::new(2, 0)]);
        assert!(g.set_start(Pos::new(0, 1), false));
        assert_eq!(g.starts(), vec![Pos::new(2, 0)]);
    }

    #[test]
    fn reset_clears_everything_but_markers() {
        let g = Grid::new(3, 3);
        let id = PathfinderId::new(0).unwrap();
        g.set_start(Pos::new(0, 0), true);
        g.set_end(Pos::new(0, 2));
        g.toggle_wall(Pos::new(1, 1), true);
        g.cell(Pos::new(1, 0)).unwrap().mark_visiting();
        g.cell(Pos::new(2, 0)).unwrap().mark_visited(id);
        g.cell(Pos::new(2, 1)).unwrap().mark_path();

        g.reset();
        assert_eq!(g.count(VisualState::Default), 9);
        assert!(g.cells().all(|c| c.visited_mask() == 0));
        assert_eq!(g.starts(), vec![Pos::new(0, 0)]);
        assert_eq!(g.end(), Pos::new(0, 2));
    }

    #[test]
    fn render_visits_every_cell_once() {
        let g = Grid::with_extent(2, 3, 6, 2);
        g.toggle_wall(Pos::new(0, 1), true);
        let mut seen = Vec::new();
        g.render(|v| seen.push(v));
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[1].state, VisualState::Wall);
        assert_eq!(seen[5].marker, Marker::End);
        assert!(seen.iter().all(|v| v.size == CellSize::new(2, 1)));
    }

    #[test]
    fn display_snapshot() {
        let g = Grid::new(2, 3);
        g.set_start(Pos::new(0, 0), true);
        g.toggle_wall(Pos::new(0, 1), true);
        assert_eq!(g.to_string(), "S#.\n..E\n");
    }
}
