//! Paced, cancellable grid searches for the pathfinding visualiser.
//!
//! Searches expand *routes* rather than cells: every frontier entry is a
//! [`Trail`] back to the start, so the winning route needs no separate
//! parent map. Trails share their common prefixes. Two frontier disciplines are provided:
//!
//! - **BFS** ([`bfs`], FIFO [`Queue`]): minimum hop count on unweighted grids
//! - **DFS** ([`dfs`], LIFO [`Stack`]): no optimality guarantee
//!
//! [`Pathfinder`] wraps a search in a tokio task with a [`RunState`] and a
//! [`CancelToken`], so several searches can animate over one shared grid.

mod bfs;
mod context;
mod dfs;
mod pathfinder;
mod search;
mod traits;

pub use bfs::{Queue, bfs};
pub use context::CancelToken;
pub use dfs::{Stack, dfs};
pub use pathfinder::{Pathfinder, RunRequest, RunState};
pub use search::{Outcome, Report, SearchParams, search};
pub use traits::{Frontier, Route, Trail};
