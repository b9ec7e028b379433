use std::collections::VecDeque;

use pathviz_core::{Grid, PathfinderId};

use crate::context::CancelToken;
use crate::search::{Report, SearchParams, search};
use crate::traits::{Frontier, Trail};

/// First-in-first-out frontier.
#[derive(Debug, Default)]
pub struct Queue {
    trails: VecDeque<Trail>,
}

impl Frontier for Queue {
    #[inline]
    fn push(&mut self, trail: Trail) {
        self.trails.push_back(trail);
    }

    #[inline]
    fn pop(&mut self) -> Option<Trail> {
        self.trails.pop_front()
    }

    #[inline]
    fn len(&self) -> usize {
        self.trails.len()
    }
}

/// Breadth-first search. On an unweighted grid the found route has the
/// minimum number of steps.
pub async fn bfs(
    grid: &Grid,
    id: PathfinderId,
    params: SearchParams,
    cancel: &CancelToken,
) -> Report {
    search(grid, id, params, Queue::default(), cancel).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use pathviz_core::{Pos, VisualState};

    use super::*;
    use crate::search::Outcome;

    fn id(i: usize) -> PathfinderId {
        PathfinderId::new(i).unwrap()
    }

    fn params(start: Pos, end: Pos, diagonals: bool) -> SearchParams {
        SearchParams {
            start,
            end,
            diagonals,
            step_delay: Duration::ZERO,
        }
    }

    async fn run_bfs(g: &Grid, i: usize, start: Pos, end: Pos, diagonals: bool) -> Report {
        bfs(g, id(i), params(start, end, diagonals), &CancelToken::new()).await
    }

    /// Hop distance computed from wall flags alone, without `Grid::neighbors`.
    fn reference_hops(grid: &Grid, start: Pos, end: Pos) -> Option<usize> {
        let mut dist = HashMap::from([(start, 0usize)]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            if p == end {
                return dist.get(&p).copied();
            }
            let d = dist[&p];
            for (dr, dc) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
                let n = p.shift(dr, dc);
                let open = grid.cell(n).is_some_and(|c| !c.is_wall());
                if open && !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn path_cells(grid: &Grid) -> Vec<Pos> {
        grid.cells().filter(|c| c.is_path()).map(|c| c.pos()).collect()
    }

    fn assert_connected(route: &[Pos], diagonals: bool) {
        for w in route.windows(2) {
            assert!(w[0].is_adjacent(w[1], diagonals), "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn queue_is_fifo() {
        let mut q = Queue::default();
        q.push(Trail::start(Pos::new(0, 0)));
        q.push(Trail::start(Pos::new(1, 1)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop().map(|t| t.pos()), Some(Pos::new(0, 0)));
        assert_eq!(q.pop().map(|t| t.pos()), Some(Pos::new(1, 1)));
        assert!(q.is_empty());
    }

    #[tokio::test]
    async fn open_5x5_takes_8_hops() {
        let g = Grid::new(5, 5);
        let r = run_bfs(&g, 0, Pos::new(0, 0), Pos::new(4, 4), false).await;
        assert_eq!(r.hops(), Some(8));
        let Outcome::Found(route) = &r.outcome else {
            panic!("expected a route, got {:?}", r.outcome);
        };
        assert_eq!(route.first(), Some(&Pos::new(0, 0)));
        assert_eq!(route.last(), Some(&Pos::new(4, 4)));
        assert_connected(route, false);
        assert_eq!(path_cells(&g).len(), 9);
    }

    #[tokio::test]
    async fn first_level_expands_in_neighbor_order() {
        let g = Grid::new(5, 5);
        let r = run_bfs(&g, 0, Pos::new(2, 2), Pos::new(4, 4), false).await;
        // down is enumerated before right, so the route leaves through (3, 2)
        let Outcome::Found(route) = r.outcome else {
            panic!("no route");
        };
        assert_eq!(route[1], Pos::new(3, 2));
    }

    #[tokio::test]
    async fn diagonals_shorten_the_route() {
        let g = Grid::new(5, 5);
        let r = run_bfs(&g, 0, Pos::new(0, 0), Pos::new(4, 4), true).await;
        assert_eq!(r.hops(), Some(4));
        if let Outcome::Found(route) = &r.outcome {
            assert_connected(route, true);
        }
    }

    #[tokio::test]
    async fn wall_row_forces_the_gap() {
        let g = Grid::new(5, 5);
        for col in 0..4 {
            g.toggle_wall(Pos::new(2, col), true);
        }
        let r = run_bfs(&g, 0, Pos::new(0, 0), Pos::new(4, 4), false).await;
        let Outcome::Found(route) = &r.outcome else {
            panic!("expected a route");
        };
        assert!(route.contains(&Pos::new(2, 4)));
        assert_eq!(r.hops(), reference_hops(&g, Pos::new(0, 0), Pos::new(4, 4)));
        assert!(g.cell(Pos::new(2, 4)).unwrap().is_path());
    }

    #[tokio::test]
    async fn matches_reference_on_a_maze() {
        let g = Grid::new(6, 7);
        let walls = [
            (0, 1), (1, 1), (2, 1), (3, 1),
            (1, 3), (2, 3), (3, 3), (4, 3), (5, 3),
            (0, 5), (1, 5), (2, 5), (4, 5),
        ];
        for (r, c) in walls {
            g.toggle_wall(Pos::new(r, c), true);
        }
        let (start, end) = (Pos::new(0, 0), Pos::new(0, 6));
        let expected = reference_hops(&g, start, end);
        assert!(expected.is_some());
        let r = bfs(&g, id(0), params(start, end, false), &CancelToken::new()).await;
        assert_eq!(r.hops(), expected);
        if let Outcome::Found(route) = &r.outcome {
            assert_connected(route, false);
            assert!(route.iter().all(|p| !g.cell(*p).unwrap().is_wall()));
        }
    }

    #[tokio::test]
    async fn enclosed_end_is_exhausted() {
        let g = Grid::new(5, 5);
        for p in [Pos::new(1, 2), Pos::new(3, 2), Pos::new(2, 1), Pos::new(2, 3)] {
            g.toggle_wall(p, true);
        }
        let r = run_bfs(&g, 0, Pos::new(0, 0), Pos::new(2, 2), false).await;
        assert_eq!(r.outcome, Outcome::Exhausted);
        assert!(path_cells(&g).is_empty());
        // every open cell outside the enclosure was expanded
        assert_eq!(r.expanded, 25 - 4 - 1);
        assert_eq!(g.count(VisualState::Path), 0);
    }

    #[tokio::test]
    async fn start_equals_end() {
        let g = Grid::new(3, 3);
        let p = Pos::new(1, 1);
        let r = bfs(&g, id(0), params(p, p, false), &CancelToken::new()).await;
        assert_eq!(r.outcome, Outcome::Found(vec![p]));
        assert_eq!(r.hops(), Some(0));
    }

    #[tokio::test]
    async fn out_of_bounds_start_is_exhausted() {
        let g = Grid::new(3, 3);
        let r = run_bfs(&g, 0, Pos::new(7, 7), Pos::new(0, 0), false).await;
        assert_eq!(r.outcome, Outcome::Exhausted);
        assert_eq!(r.expanded, 0);
    }

    #[tokio::test]
    async fn pacing_does_not_change_the_result() {
        let fast = Grid::new(4, 4);
        let slow = Grid::new(4, 4);
        let mut p = params(Pos::new(0, 0), Pos::new(3, 3), false);
        let a = bfs(&fast, id(0), p, &CancelToken::new()).await;
        p.step_delay = Duration::from_millis(1);
        let b = bfs(&slow, id(0), p, &CancelToken::new()).await;
        assert_eq!(a, b);
        assert_eq!(fast.to_string(), slow.to_string());
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_run() {
        let g = Grid::new(5, 5);
        let cancel = CancelToken::new();
        cancel.cancel();
        let r = bfs(&g, id(0), params(Pos::new(0, 0), Pos::new(4, 4), false), &cancel).await;
        assert_eq!(r.outcome, Outcome::Cancelled);
        assert!(path_cells(&g).is_empty());
    }

    #[tokio::test]
    async fn visits_are_recorded_per_id() {
        let g = Grid::new(3, 3);
        run_bfs(&g, 5, Pos::new(0, 0), Pos::new(2, 2), false).await;
        let origin = g.cell(Pos::new(0, 0)).unwrap();
        assert!(origin.visited_by(id(5)));
        assert!(!origin.visited_by(id(6)));

        // a second id searches the same grid independently
        let r = run_bfs(&g, 6, Pos::new(0, 0), Pos::new(2, 2), false).await;
        assert_eq!(r.hops(), Some(4));
    }
}
