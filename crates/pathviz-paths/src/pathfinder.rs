//! [`Pathfinder`]: a stateful, restartable search runner.
//!
//! Each run is a tokio task. `start` returns immediately; callers observe
//! progress through the grid's cell states and the pathfinder's
//! [`RunState`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use pathviz_core::{Algorithm, Grid, PathfinderId, Pos};

use crate::bfs::bfs;
use crate::context::CancelToken;
use crate::dfs::dfs;
use crate::search::{Outcome, Report, SearchParams};
use crate::traits::Route;

// ---------------------------------------------------------------------------
// RunState
// ---------------------------------------------------------------------------

/// Lifecycle of a pathfinder: `Idle → Running → {Found, Exhausted, Cancelled}`.
/// A finished pathfinder may be started again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
    Found = 2,
    Exhausted = 3,
    Cancelled = 4,
}

impl RunState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Running,
            2 => Self::Found,
            3 => Self::Exhausted,
            4 => Self::Cancelled,
            _ => Self::Idle,
        }
    }

    fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Found(_) => Self::Found,
            Outcome::Exhausted => Self::Exhausted,
            Outcome::Cancelled => Self::Cancelled,
        }
    }

    /// Whether this is a terminal state of a run.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Found | Self::Exhausted | Self::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// RunRequest
// ---------------------------------------------------------------------------

/// What to search for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunRequest {
    pub start: Pos,
    pub end: Pos,
    pub algorithm: Algorithm,
    pub diagonals: bool,
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    route: Mutex<Option<Route>>,
}

/// Runs one search at a time over a shared [`Grid`].
///
/// Dropping a pathfinder cancels its in-flight run.
#[derive(Debug)]
pub struct Pathfinder {
    id: PathfinderId,
    step_delay: Duration,
    shared: Arc<Shared>,
    cancel: CancelToken,
    task: Option<JoinHandle<Report>>,
}

impl Pathfinder {
    /// Create an idle pathfinder. `id` must be unique among pathfinders
    /// sharing a grid.
    pub fn new(id: PathfinderId, step_delay: Duration) -> Self {
        Self {
            id,
            step_delay,
            shared: Arc::new(Shared {
                state: AtomicU8::new(RunState::Idle as u8),
                route: Mutex::new(None),
            }),
            cancel: CancelToken::new(),
            task: None,
        }
    }

    #[inline]
    pub fn id(&self) -> PathfinderId {
        self.id
    }

    #[inline]
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Change the pacing used by subsequent runs.
    pub fn set_step_delay(&mut self, delay: Duration) {
        self.step_delay = delay;
    }

    #[inline]
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Route found by the last successful run.
    pub fn route(&self) -> Option<Route> {
        self.shared.route.lock().ok().and_then(|r| r.clone())
    }

    /// Spawn a run on the current tokio runtime and return immediately.
    ///
    /// Returns `false` without side effects if a run is already in progress
    /// or no runtime is available.
    pub fn start(&mut self, grid: &Arc<Grid>, req: RunRequest) -> bool {
        let Ok(rt) = Handle::try_current() else {
            log::warn!("pathfinder {}: no tokio runtime, run refused", self.id);
            return false;
        };
        let claimed = self.shared.state.fetch_update(Ordering::AcqRel, Ordering::Acquire, |s| {
            (s != RunState::Running as u8).then_some(RunState::Running as u8)
        });
        if claimed.is_err() {
            log::debug!("pathfinder {}: already running", self.id);
            return false;
        }
        if let Ok(mut route) = self.shared.route.lock() {
            *route = None;
        }

        self.cancel = CancelToken::new();
        let cancel = self.cancel.clone();
        let shared = Arc::clone(&self.shared);
        let grid = Arc::clone(grid);
        let id = self.id;
        let params = SearchParams {
            start: req.start,
            end: req.end,
            diagonals: req.diagonals,
            step_delay: self.step_delay,
        };
        let algorithm = req.algorithm;

        log::info!(
            "pathfinder {id}: {algorithm} {} -> {} (diagonals={}, delay={:?})",
            req.start,
            req.end,
            req.diagonals,
            params.step_delay
        );

        self.task = Some(rt.spawn(async move {
            let report = match algorithm {
                Algorithm::Bfs => bfs(&grid, id, params, &cancel).await,
                Algorithm::Dfs => dfs(&grid, id, params, &cancel).await,
            };
            match &report.outcome {
                Outcome::Found(route) => {
                    log::info!(
                        "pathfinder {id}: found {} hops after expanding {} cells",
                        route.len().saturating_sub(1),
                        report.expanded
                    );
                    if let Ok(mut r) = shared.route.lock() {
                        *r = Some(route.clone());
                    }
                }
                Outcome::Exhausted => {
                    log::info!(
                        "pathfinder {id}: end unreachable, {} cells expanded",
                        report.expanded
                    );
                }
                Outcome::Cancelled => log::debug!("pathfinder {id}: cancelled"),
            }
            shared
                .state
                .store(RunState::from_outcome(&report.outcome) as u8, Ordering::Release);
            report
        }));
        true
    }

    /// Ask the in-flight run, if any, to stop at its next suspension point.
    pub fn cancel(&self) {
        if self.is_running() {
            self.cancel.cancel();
        }
    }

    /// Whether the current run was asked to stop. A cancelled run stays
    /// [`RunState::Running`] until its task reaches a suspension point.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the current run to finish and return its report.
    ///
    /// Returns `None` if no run was started since the last `wait`, or if the
    /// task was aborted by the runtime.
    pub async fn wait(&mut self) -> Option<Report> {
        let task = self.task.take()?;
        match task.await {
            Ok(report) => Some(report),
            Err(e) => {
                log::warn!("pathfinder {}: task failed: {e}", self.id);
                None
            }
        }
    }
}

impl Drop for Pathfinder {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::VisualState;

    fn pf(i: usize, delay: Duration) -> Pathfinder {
        Pathfinder::new(PathfinderId::new(i).unwrap(), delay)
    }

    fn req(start: Pos, end: Pos) -> RunRequest {
        RunRequest {
            start,
            end,
            algorithm: Algorithm::Bfs,
            diagonals: false,
        }
    }

    #[test]
    fn start_without_runtime_is_refused() {
        let g = Arc::new(Grid::new(3, 3));
        let mut p = pf(0, Duration::ZERO);
        assert!(!p.start(&g, req(Pos::new(0, 0), Pos::new(2, 2))));
        assert_eq!(p.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn run_reaches_found() {
        let g = Arc::new(Grid::new(5, 5));
        let mut p = pf(0, Duration::ZERO);
        assert_eq!(p.state(), RunState::Idle);
        assert!(p.start(&g, req(Pos::new(0, 0), Pos::new(4, 4))));
        let report = p.wait().await.unwrap();
        assert_eq!(report.hops(), Some(8));
        assert_eq!(p.state(), RunState::Found);
        assert_eq!(p.route().map(|r| r.len()), Some(9));
        assert_eq!(g.count(VisualState::Path), 9);
    }

    #[tokio::test]
    async fn run_reaches_exhausted() {
        let g = Arc::new(Grid::new(3, 3));
        g.toggle_wall(Pos::new(1, 2), true);
        g.toggle_wall(Pos::new(2, 1), true);
        let mut p = pf(0, Duration::ZERO);
        p.start(&g, req(Pos::new(0, 0), Pos::new(2, 2)));
        p.wait().await;
        assert_eq!(p.state(), RunState::Exhausted);
        assert_eq!(p.route(), None);
    }

    #[tokio::test]
    async fn restart_while_running_is_a_no_op() {
        let g = Arc::new(Grid::new(5, 5));
        let mut p = pf(0, Duration::from_millis(50));
        assert!(p.start(&g, req(Pos::new(0, 0), Pos::new(4, 4))));
        assert!(p.is_running());
        assert!(!p.start(&g, req(Pos::new(4, 4), Pos::new(0, 0))));
        assert!(!p.start(&g, req(Pos::new(0, 0), Pos::new(4, 4))));
        assert!(p.is_running());

        assert!(!p.is_cancelled());
        p.cancel();
        assert!(p.is_cancelled());
        assert!(p.is_running());
        let report = p.wait().await.unwrap();
        assert_eq!(report.outcome, Outcome::Cancelled);
        assert_eq!(p.state(), RunState::Cancelled);
        // the second request never ran, so nothing was marked from (4, 4)
        assert!(!g.cell(Pos::new(3, 4)).unwrap().is_visited());
        assert_eq!(g.count(VisualState::Path), 0);
    }

    #[tokio::test]
    async fn finished_pathfinder_can_run_again() {
        let g = Arc::new(Grid::new(4, 4));
        let mut p = pf(0, Duration::ZERO);
        p.start(&g, req(Pos::new(0, 0), Pos::new(3, 3)));
        p.wait().await;
        g.clear_search();
        assert!(p.start(&g, req(Pos::new(3, 0), Pos::new(0, 3))));
        let report = p.wait().await.unwrap();
        assert_eq!(report.hops(), Some(6));
    }

    #[tokio::test]
    async fn wait_without_run_is_none() {
        let mut p = pf(0, Duration::ZERO);
        assert!(p.wait().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_runs_share_a_grid() {
        let g = Arc::new(Grid::new(8, 8));
        let mut a = pf(0, Duration::from_micros(100));
        let mut b = pf(1, Duration::from_micros(100));
        a.start(&g, req(Pos::new(0, 0), Pos::new(7, 7)));
        b.start(
            &g,
            RunRequest {
                start: Pos::new(7, 0),
                end: Pos::new(7, 7),
                algorithm: Algorithm::Dfs,
                diagonals: false,
            },
        );
        let ra = a.wait().await.unwrap();
        let rb = b.wait().await.unwrap();
        assert_eq!(ra.hops(), Some(14));
        assert!(matches!(rb.outcome, Outcome::Found(_)));
        let (ia, ib) = (a.id(), b.id());
        assert!(g.cell(Pos::new(0, 0)).unwrap().visited_by(ia));
        assert!(g.cell(Pos::new(7, 0)).unwrap().visited_by(ib));
    }

    #[tokio::test]
    async fn drop_cancels_the_run() {
        let g = Arc::new(Grid::new(6, 6));
        let mut p = pf(0, Duration::from_millis(20));
        p.start(&g, req(Pos::new(0, 0), Pos::new(5, 5)));
        let task = p.task.take().unwrap();
        drop(p);
        let report = task.await.unwrap();
        assert_eq!(report.outcome, Outcome::Cancelled);
    }
}
