use pathviz_core::{Grid, PathfinderId};

use crate::context::CancelToken;
use crate::search::{Report, SearchParams, search};
use crate::traits::{Frontier, Trail};

/// Last-in-first-out frontier.
#[derive(Debug, Default)]
pub struct Stack {
    trails: Vec<Trail>,
}

impl Frontier for Stack {
    #[inline]
    fn push(&mut self, trail: Trail) {
        self.trails.push(trail);
    }

    #[inline]
    fn pop(&mut self) -> Option<Trail> {
        self.trails.pop()
    }

    #[inline]
    fn len(&self) -> usize {
        self.trails.len()
    }
}

/// Depth-first search. Always terminates, but the route it finds is not
/// necessarily the shortest.
pub async fn dfs(
    grid: &Grid,
    id: PathfinderId,
    params: SearchParams,
    cancel: &CancelToken,
) -> Report {
    search(grid, id, params, Stack::default(), cancel).await
}
