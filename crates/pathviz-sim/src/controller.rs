//! [`Simulation`] owns the grid and one [`Pathfinder`] per start cell.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use pathviz_core::{Algorithm, Command, Grid, MAX_PATHFINDERS, PathfinderId, Pos};
use pathviz_paths::{Pathfinder, Report, RunRequest, RunState};

use crate::config::{ConfigError, ResetPolicy, SimConfig};
use crate::layout::{random_open_cell, scatter_walls};

// ---------------------------------------------------------------------------
// IdPool
// ---------------------------------------------------------------------------

/// Hands out [`PathfinderId`]s round-robin so a freed id is not reused
/// while a cancelled run may still be winding down.
#[derive(Debug)]
struct IdPool {
    free: u64,
    cursor: usize,
}

impl IdPool {
    fn new() -> Self {
        Self {
            free: u64::MAX,
            cursor: 0,
        }
    }

    fn take(&mut self) -> Option<PathfinderId> {
        for step in 0..MAX_PATHFINDERS {
            let i = (self.cursor + step) % MAX_PATHFINDERS;
            if self.free & (1 << i) != 0 {
                self.free &= !(1 << i);
                self.cursor = (i + 1) % MAX_PATHFINDERS;
                return PathfinderId::new(i);
            }
        }
        None
    }

    fn give_back(&mut self, id: PathfinderId) {
        self.free |= 1 << id.index();
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Snapshot of the simulation for a caption or status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub algorithm: Algorithm,
    pub diagonals: bool,
    pub starts: usize,
    pub running: usize,
    pub found: usize,
    pub exhausted: usize,
    pub cancelled: usize,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | diagonals {} | starts {} | running {} | found {} | unreachable {}",
            self.algorithm,
            if self.diagonals { "on" } else { "off" },
            self.starts,
            self.running,
            self.found,
            self.exhausted,
        )
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// The controller between a front-end and the search engine.
///
/// Every edit is validated and silently ignored when invalid; methods
/// return whether the edit took effect.
pub struct Simulation {
    grid: Arc<Grid>,
    pathfinders: BTreeMap<Pos, Pathfinder>,
    ids: IdPool,
    algorithm: Algorithm,
    diagonals: bool,
    step_delay: Duration,
    reset_policy: ResetPolicy,
    rng: StdRng,
}

impl Simulation {
    /// Build a simulation from a validated configuration.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (width, height) = config.extent().ok_or(ConfigError::ExtentOverflow)?;
        let grid = Arc::new(Grid::with_extent(config.rows, config.columns, width, height));
        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!("simulation {} seeded with {seed}", grid.dims());

        let mut sim = Self {
            grid,
            pathfinders: BTreeMap::new(),
            ids: IdPool::new(),
            algorithm: config.algorithm,
            diagonals: config.diagonals,
            step_delay: config.step_delay(),
            reset_policy: config.reset_policy,
            rng: StdRng::seed_from_u64(seed),
        };

        let end = config.end.or_else(|| sim.end_clear_of(&config.starts));
        if let Some(end) = end {
            sim.set_end(end);
        }
        for &p in &config.starts {
            sim.set_start(p, true);
        }
        if config.starts.is_empty() && config.end.is_none() && config.random_endpoints {
            sim.place_random_endpoints();
        }
        if config.wall_density > 0.0 {
            let n = scatter_walls(&sim.grid, config.wall_density, &mut sim.rng);
            log::debug!("scattered {n} walls");
        }
        Ok(sim)
    }

    /// When the built-in end sits on one of `starts`, the last cell in
    /// row-major order that is not a start.
    fn end_clear_of(&self, starts: &[Pos]) -> Option<Pos> {
        if !starts.contains(&self.grid.end()) {
            return None;
        }
        let dims = self.grid.dims();
        (0..dims.len())
            .rev()
            .map(|i| dims.pos(i))
            .find(|p| !starts.contains(p))
    }

    /// Shared handle to the grid, for renderers.
    #[inline]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn diagonals(&self) -> bool {
        self.diagonals
    }

    #[inline]
    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    /// The pathfinder bound to start cell `p`.
    pub fn pathfinder(&self, p: Pos) -> Option<&Pathfinder> {
        self.pathfinders.get(&p)
    }

    pub fn is_running(&self) -> bool {
        self.pathfinders.values().any(Pathfinder::is_running)
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    pub fn toggle_wall(&mut self, p: Pos, value: bool) -> bool {
        self.grid.toggle_wall(p, value)
    }

    /// Add (`enabled`) or remove a start cell and its pathfinder. Removing a
    /// start cancels its run.
    pub fn set_start(&mut self, p: Pos, enabled: bool) -> bool {
        if enabled {
            self.add_start(p)
        } else {
            self.remove_start(p)
        }
    }

    fn add_start(&mut self, p: Pos) -> bool {
        if self.pathfinders.contains_key(&p) {
            return false;
        }
        let Some(id) = self.ids.take() else {
            log::warn!("no pathfinder id left for start {p}; {MAX_PATHFINDERS} in use");
            return false;
        };
        if !self.grid.set_start(p, true) {
            self.ids.give_back(id);
            return false;
        }
        self.grid.forget(id);
        self.pathfinders.insert(p, Pathfinder::new(id, self.step_delay));
        log::debug!("start {p} bound to pathfinder {id}");
        true
    }

    fn remove_start(&mut self, p: Pos) -> bool {
        let Some(pf) = self.pathfinders.remove(&p) else {
            return false;
        };
        self.grid.set_start(p, false);
        let id = pf.id();
        // dropping the pathfinder cancels its run
        drop(pf);
        self.grid.forget(id);
        self.ids.give_back(id);
        log::debug!("start {p} removed, pathfinder {id} released");
        true
    }

    pub fn set_end(&mut self, p: Pos) -> bool {
        self.grid.set_end(p)
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn toggle_diagonals(&mut self) {
        self.diagonals = !self.diagonals;
    }

    /// Change pacing for every pathfinder's next run.
    pub fn set_step_delay(&mut self, delay: Duration) {
        self.step_delay = delay;
        for pf in self.pathfinders.values_mut() {
            pf.set_step_delay(delay);
        }
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Start every pathfinder that is not already running. Must be called
    /// within a tokio runtime. Returns how many runs were started.
    ///
    /// When nothing is running the previous search marks are cleared first;
    /// otherwise only the restarted pathfinders' visit records are dropped.
    /// Runs that were cancelled but have not stopped yet are replaced.
    pub fn run(&mut self) -> usize {
        self.replace_cancelled();
        if !self.is_running() {
            self.grid.clear_search();
        }
        let end = self.grid.end();
        let req = |start| RunRequest {
            start,
            end,
            algorithm: self.algorithm,
            diagonals: self.diagonals,
        };
        let mut started = 0;
        for (&start, pf) in self.pathfinders.iter_mut() {
            if pf.is_running() {
                continue;
            }
            self.grid.forget(pf.id());
            if pf.start(&self.grid, req(start)) {
                started += 1;
            }
        }
        if started == 0 {
            log::debug!("run requested, nothing to start");
        }
        started
    }

    /// Swap each pathfinder whose run was cancelled but is still winding
    /// down for a fresh one under a new id, so the stale task cannot touch
    /// the new run's visit records.
    fn replace_cancelled(&mut self) {
        let stale: Vec<Pos> = self
            .pathfinders
            .iter()
            .filter(|(_, pf)| pf.is_running() && pf.is_cancelled())
            .map(|(&p, _)| p)
            .collect();
        for p in stale {
            let Some(id) = self.ids.take() else {
                log::warn!("no pathfinder id left to restart {p}; {MAX_PATHFINDERS} in use");
                continue;
            };
            self.grid.forget(id);
            let fresh = Pathfinder::new(id, self.step_delay);
            if let Some(old) = self.pathfinders.insert(p, fresh) {
                let old_id = old.id();
                drop(old);
                self.ids.give_back(old_id);
                log::debug!("start {p}: cancelled pathfinder {old_id} replaced by {id}");
            }
        }
    }

    /// Cancel every in-flight run.
    pub fn cancel(&self) {
        for pf in self.pathfinders.values() {
            pf.cancel();
        }
    }

    /// Wait for all runs to finish. Returns each start cell with its report.
    pub async fn wait_all(&mut self) -> Vec<(Pos, Report)> {
        let mut out = Vec::new();
        for (&p, pf) in self.pathfinders.iter_mut() {
            if let Some(report) = pf.wait().await {
                out.push((p, report));
            }
        }
        out
    }

    /// Whether the reset policy lets the grid be cleared right now.
    /// Under [`ResetPolicy::Cancel`] this also cancels running searches.
    fn may_clear(&self, what: &str) -> bool {
        if !self.is_running() {
            return true;
        }
        match self.reset_policy {
            ResetPolicy::Block => {
                log::debug!("{what} refused while searches are running");
                false
            }
            ResetPolicy::Cancel => {
                self.cancel();
                true
            }
        }
    }

    /// Clear search and wall state. Start and end cells are kept.
    pub fn reset(&mut self) -> bool {
        if !self.may_clear("reset") {
            return false;
        }
        self.grid.reset();
        true
    }

    /// Clear search marks, keeping walls.
    pub fn clear_search(&mut self) -> bool {
        if !self.may_clear("clear") {
            return false;
        }
        self.grid.clear_search();
        true
    }

    /// Replace every start with one random start and move the end to a
    /// random open cell.
    pub fn randomize(&mut self) -> bool {
        if !self.may_clear("randomize") {
            return false;
        }
        let starts: Vec<Pos> = self.pathfinders.keys().copied().collect();
        for p in starts {
            self.remove_start(p);
        }
        self.grid.clear_search();
        self.place_random_endpoints()
    }

    fn place_random_endpoints(&mut self) -> bool {
        let Some(end) = random_open_cell(&self.grid, &mut self.rng, &[]) else {
            return false;
        };
        self.set_end(end);
        let end = self.grid.end();
        let Some(start) = random_open_cell(&self.grid, &mut self.rng, &[end]) else {
            return false;
        };
        log::debug!("random endpoints: start {start}, end {end}");
        self.set_start(start, true)
    }

    /// Apply a front-end command. Returns whether it changed anything.
    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::ToggleWall { pos, value } => self.toggle_wall(pos, value),
            Command::SetStart { pos, enabled } => self.set_start(pos, enabled),
            Command::SetEnd { pos } => self.set_end(pos),
            Command::Run => self.run() > 0,
            Command::Reset => self.reset(),
            Command::ClearSearch => self.clear_search(),
            Command::SetAlgorithm(a) => {
                self.set_algorithm(a);
                true
            }
            Command::ToggleDiagonals => {
                self.toggle_diagonals();
                true
            }
            Command::Randomize => self.randomize(),
            Command::Quit => {
                self.cancel();
                false
            }
        }
    }

    /// Counts of pathfinders by state.
    pub fn status(&self) -> Status {
        let mut s = Status {
            algorithm: self.algorithm,
            diagonals: self.diagonals,
            starts: self.pathfinders.len(),
            ..Status::default()
        };
        for pf in self.pathfinders.values() {
            match pf.state() {
                RunState::Running => s.running += 1,
                RunState::Found => s.found += 1,
                RunState::Exhausted => s.exhausted += 1,
                RunState::Cancelled => s.cancelled += 1,
                RunState::Idle => {}
            }
        }
        s
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("grid", &self.grid)
            .field("starts", &self.pathfinders.keys().collect::<Vec<_>>())
            .field("algorithm", &self.algorithm)
            .field("diagonals", &self.diagonals)
            .field("reset_policy", &self.reset_policy)
            .finish_non_exhaustive()
    }
}
