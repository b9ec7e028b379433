//! Geometry primitives: [`Pos`] and [`Dims`].
//!
//! Positions are `(row, col)` pairs. Rows grow down, columns grow right.

use std::fmt;
use std::ops::Add;

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A grid coordinate. Signed so that neighbour offsets can step outside the
/// grid and be rejected by a bounds check instead of wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

/// Orthogonal neighbour offsets: rows first, then columns.
pub const ORTHOGONAL: [Pos; 4] = [
    Pos::new(-1, 0),
    Pos::new(1, 0),
    Pos::new(0, -1),
    Pos::new(0, 1),
];

/// Diagonal neighbour offsets, checked after [`ORTHOGONAL`].
pub const DIAGONAL: [Pos; 4] = [
    Pos::new(-1, -1),
    Pos::new(-1, 1),
    Pos::new(1, -1),
    Pos::new(1, 1),
];

impl Pos {
    /// Create a new position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a position shifted by `(drow, dcol)`.
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Whether `other` is one step away (orthogonally, or diagonally when
    /// `diagonals` is set).
    pub fn is_adjacent(self, other: Pos, diagonals: bool) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        match (dr, dc) {
            (1, 0) | (0, 1) => true,
            (1, 1) => diagonals,
            _ => false,
        }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Add for Pos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

// ---------------------------------------------------------------------------
// Dims
// ---------------------------------------------------------------------------

/// Grid dimensions. Valid positions are `0 <= row < rows` and
/// `0 <= col < columns`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dims {
    pub rows: i32,
    pub columns: i32,
}

impl Dims {
    #[inline]
    pub const fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.rows as usize) * (self.columns as usize)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.rows <= 0 || self.columns <= 0
    }

    /// Strict bounds check.
    #[inline]
    pub fn contains(self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.columns
    }

    /// Row-major flat index of `p`, or `None` when out of bounds.
    #[inline]
    pub fn index(self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.columns as usize + p.col as usize)
    }

    /// Inverse of [`index`](Dims::index). `i` must be below [`len`](Dims::len).
    #[inline]
    pub fn pos(self, i: usize) -> Pos {
        let cols = self.columns.max(1) as usize;
        Pos::new((i / cols) as i32, (i % cols) as i32)
    }

    /// Row-major iterator over every position.
    pub fn iter(self) -> DimsIter {
        DimsIter {
            dims: self,
            next: 0,
        }
    }
}

impl IntoIterator for Dims {
    type Item = Pos;
    type IntoIter = DimsIter;

    fn into_iter(self) -> DimsIter {
        self.iter()
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Row-major iterator over the positions of a [`Dims`].
#[derive(Clone, Debug)]
pub struct DimsIter {
    dims: Dims,
    next: usize,
}

impl Iterator for DimsIter {
    type Item = Pos;

    #[inline]
    fn next(&mut self) -> Option<Pos> {
        if self.next >= self.dims.len() {
            return None;
        }
        let p = self.dims.pos(self.next);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.dims.len().saturating_sub(self.next);
        (n, Some(n))
    }
}

impl ExactSizeIterator for DimsIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_bounds() {
        let d = Dims::new(3, 4);
        assert!(d.contains(Pos::new(2, 3)));
        assert!(!d.contains(Pos::new(3, 0)));
        assert!(!d.contains(Pos::new(0, 4)));
        assert!(!d.contains(Pos::new(-1, 0)));
    }

    #[test]
    fn index_is_row_major() {
        let d = Dims::new(3, 4);
        assert_eq!(d.index(Pos::new(0, 0)), Some(0));
        assert_eq!(d.index(Pos::new(1, 2)), Some(6));
        assert_eq!(d.index(Pos::new(2, 3)), Some(11));
        assert_eq!(d.index(Pos::new(3, 3)), None);
        assert_eq!(d.pos(6), Pos::new(1, 2));
    }

    #[test]
    fn iter_visits_all_in_order() {
        let d = Dims::new(2, 3);
        let ps: Vec<Pos> = d.iter().collect();
        assert_eq!(ps.len(), 6);
        assert_eq!(ps[0], Pos::new(0, 0));
        assert_eq!(ps[3], Pos::new(1, 0));
        assert_eq!(d.iter().len(), 6);
    }

    #[test]
    fn empty_dims() {
        let d = Dims::new(0, 5);
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
        assert_eq!(d.iter().count(), 0);
    }

    #[test]
    fn adjacency() {
        let p = Pos::new(2, 2);
        assert!(p.is_adjacent(Pos::new(1, 2), false));
        assert!(!p.is_adjacent(Pos::new(1, 1), false));
        assert!(p.is_adjacent(Pos::new(1, 1), true));
        assert!(!p.is_adjacent(p, true));
        assert!(!p.is_adjacent(Pos::new(0, 2), true));
    }
}
