//! The paced traversal shared by BFS and DFS.
//!
//! Both algorithms run the same loop; only the [`Frontier`] differs. The
//! loop suspends after every enqueued neighbour so a renderer can show the
//! search spreading, and it never holds a lock across that suspension.

use std::time::Duration;

use pathviz_core::{Grid, PathfinderId, Pos};

use crate::context::CancelToken;
use crate::traits::{Frontier, Route, Trail};

/// Endpoints and pacing for one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub start: Pos,
    pub end: Pos,
    pub diagonals: bool,
    pub step_delay: Duration,
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The end cell was reached; the route is start-first.
    Found(Route),
    /// Every reachable cell was expanded without reaching the end.
    Exhausted,
    /// The run observed its cancellation token.
    Cancelled,
}

/// Result of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    /// Cells marked visited by this run.
    pub expanded: usize,
}

impl Report {
    /// Number of cell-to-cell steps on the found route.
    pub fn hops(&self) -> Option<usize> {
        match &self.outcome {
            Outcome::Found(route) => Some(route.len().saturating_sub(1)),
            _ => None,
        }
    }
}

/// Run a search from `params.start` to `params.end` on `grid`.
pub async fn search<F: Frontier>(
    grid: &Grid,
    id: PathfinderId,
    params: SearchParams,
    mut frontier: F,
    cancel: &CancelToken,
) -> Report {
    let mut expanded = 0;
    let mut nbuf = Vec::with_capacity(8);

    frontier.push(Trail::start(params.start));

    while let Some(trail) = frontier.pop() {
        if cancel.is_cancelled() {
            break;
        }
        let current = trail.pos();
        let Some(cell) = grid.cell(current) else {
            continue;
        };
        if cell.visited_by(id) || cell.is_wall() {
            continue;
        }

        if current == params.end {
            for p in trail.iter_rev() {
                if let Some(c) = grid.cell(p) {
                    c.mark_path();
                }
            }
            return Report {
                outcome: Outcome::Found(trail.to_route()),
                expanded,
            };
        }

        cell.mark_visited(id);
        expanded += 1;

        nbuf.clear();
        grid.neighbors_into(current, params.diagonals, &mut nbuf);
        for &n in &nbuf {
            let Some(nc) = grid.cell(n) else {
                continue;
            };
            if nc.visited_by(id) {
                continue;
            }
            nc.mark_visiting();
            frontier.push(trail.extend(n));

            if cancel.pause(params.step_delay).await {
                return Report {
                    outcome: Outcome::Cancelled,
                    expanded,
                };
            }
        }
    }

    let outcome = if cancel.is_cancelled() {
        Outcome::Cancelled
    } else {
        Outcome::Exhausted
    };
    Report { outcome, expanded }
}
