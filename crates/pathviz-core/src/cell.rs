//! The [`Cell`] type: one grid location with atomically updated state.
//!
//! All mutable state lives in two atomic words: a flag byte and a 64-bit
//! `visited_by` mask. Every mutation is a single atomic operation, so the
//! renderer and any number of concurrent searches can share a cell without
//! locks.

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::geom::Pos;

// ---------------------------------------------------------------------------
// PathfinderId
// ---------------------------------------------------------------------------

/// Number of distinct searches that can share one grid.
pub const MAX_PATHFINDERS: usize = 64;

/// Identity of a search, used as a bit index into [`Cell`]'s visited mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderId(u8);

impl PathfinderId {
    /// Returns `None` if `index` is not below [`MAX_PATHFINDERS`].
    pub const fn new(index: usize) -> Option<Self> {
        if index < MAX_PATHFINDERS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    const fn bit(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for PathfinderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Snapshot of a cell's flag byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Flags(pub u8);

impl Flags {
    pub const NONE: Self = Self(0);
    pub const WALL: Self = Self(1 << 0);
    pub const VISITING: Self = Self(1 << 1);
    pub const VISITED: Self = Self(1 << 2);
    pub const PATH: Self = Self(1 << 3);
    pub const START: Self = Self(1 << 4);
    pub const END: Self = Self(1 << 5);

    /// Flags that forbid turning the cell into a wall.
    pub const PROTECTED: Self = Self(Self::PATH.0 | Self::START.0 | Self::END.0);
    /// Flags written by a search.
    pub const SEARCH: Self = Self(Self::VISITING.0 | Self::VISITED.0 | Self::PATH.0);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Flags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Flags {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// VisualState / Marker
// ---------------------------------------------------------------------------

/// How a cell should be drawn, resolved by precedence
/// path > visited > visiting > wall > default.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualState {
    Path,
    Visited,
    Visiting,
    Wall,
    Default,
}

impl VisualState {
    /// Resolve the drawn state from a flag snapshot.
    pub const fn resolve(flags: Flags) -> Self {
        if flags.contains(Flags::PATH) {
            Self::Path
        } else if flags.contains(Flags::VISITED) {
            Self::Visited
        } else if flags.contains(Flags::VISITING) {
            Self::Visiting
        } else if flags.contains(Flags::WALL) {
            Self::Wall
        } else {
            Self::Default
        }
    }
}

/// Start/end designation of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    #[default]
    None,
    Start,
    End,
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single grid location.
///
/// The position is fixed at creation and is the cell's identity.
pub struct Cell {
    pos: Pos,
    flags: AtomicU8,
    visited_by: AtomicU64,
}

impl Cell {
    /// Create an unvisited, non-wall cell at `pos`.
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            flags: AtomicU8::new(0),
            visited_by: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Current flag snapshot.
    #[inline]
    pub fn flags(&self) -> Flags {
        Flags(self.flags.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.flags().contains(Flags::WALL)
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.flags().contains(Flags::PATH)
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.flags().contains(Flags::VISITED)
    }

    #[inline]
    pub fn is_visiting(&self) -> bool {
        self.flags().contains(Flags::VISITING)
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.flags().contains(Flags::START)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.flags().contains(Flags::END)
    }

    /// The state a renderer should draw.
    #[inline]
    pub fn visual_state(&self) -> VisualState {
        VisualState::resolve(self.flags())
    }

    pub fn marker(&self) -> Marker {
        let f = self.flags();
        if f.contains(Flags::END) {
            Marker::End
        } else if f.contains(Flags::START) {
            Marker::Start
        } else {
            Marker::None
        }
    }

    // -----------------------------------------------------------------------
    // visited_by
    // -----------------------------------------------------------------------

    /// Whether search `id` has processed this cell.
    #[inline]
    pub fn visited_by(&self, id: PathfinderId) -> bool {
        self.visited_by.load(Ordering::Acquire) & id.bit() != 0
    }

    /// Raw visited mask.
    #[inline]
    pub fn visited_mask(&self) -> u64 {
        self.visited_by.load(Ordering::Acquire)
    }

    /// Record `id` as having processed this cell and raise the visited flag.
    /// Returns `false` if `id` had already been recorded.
    pub fn mark_visited(&self, id: PathfinderId) -> bool {
        let prev = self.visited_by.fetch_or(id.bit(), Ordering::AcqRel);
        self.flags.fetch_or(Flags::VISITED.0, Ordering::AcqRel);
        prev & id.bit() == 0
    }

    pub fn mark_visiting(&self) {
        self.flags.fetch_or(Flags::VISITING.0, Ordering::AcqRel);
    }

    pub fn mark_path(&self) {
        self.flags.fetch_or(Flags::PATH.0, Ordering::AcqRel);
    }

    // -----------------------------------------------------------------------
    // Controller-side edits
    // -----------------------------------------------------------------------

    /// Set or clear the wall flag. Refused on start, end and path cells.
    pub fn set_wall(&self, value: bool) -> bool {
        self.update(|f| {
            if f.intersects(Flags::PROTECTED) {
                None
            } else if value {
                Some(f | Flags::WALL)
            } else {
                Some(Flags(f.0 & !Flags::WALL.0))
            }
        })
    }

    /// Raise or drop the start marker. Raising is refused on walls and on
    /// the end cell.
    pub(crate) fn set_start(&self, enabled: bool) -> bool {
        self.update(|f| {
            if !enabled {
                return f
                    .contains(Flags::START)
                    .then(|| Flags(f.0 & !Flags::START.0));
            }
            if f.intersects(Flags::WALL | Flags::END | Flags::START) {
                None
            } else {
                Some(f | Flags::START)
            }
        })
    }

    /// Raise the end marker. Refused on walls and start cells.
    pub(crate) fn set_end(&self) -> bool {
        self.update(|f| {
            if f.intersects(Flags::WALL | Flags::START) {
                None
            } else {
                Some(f | Flags::END)
            }
        })
    }

    pub(crate) fn clear_end(&self) {
        self.flags.fetch_and(!Flags::END.0, Ordering::AcqRel);
    }

    /// Clear search and wall state, keeping start/end markers.
    pub fn reset(&self) {
        self.flags
            .fetch_and(Flags::START.0 | Flags::END.0, Ordering::AcqRel);
        self.visited_by.store(0, Ordering::Release);
    }

    /// Clear search state only, keeping walls and markers.
    pub fn clear_search(&self) {
        self.flags.fetch_and(!Flags::SEARCH.0, Ordering::AcqRel);
        self.visited_by.store(0, Ordering::Release);
    }

    /// Drop `id` from the visited mask.
    pub fn forget(&self, id: PathfinderId) {
        self.visited_by.fetch_and(!id.bit(), Ordering::AcqRel);
    }

    fn update(&self, f: impl Fn(Flags) -> Option<Flags>) -> bool {
        self.flags
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                f(Flags(raw)).map(|n| n.0)
            })
            .is_ok()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("pos", &self.pos)
            .field("flags", &self.flags())
            .field("visited_by", &format_args!("{:#x}", self.visited_mask()))
            .finish()
    }
}
