use std::sync::Arc;

use pathviz_core::Pos;

/// A route from the start cell to a frontier cell, start first.
pub type Route = Vec<Pos>;

struct Step {
    pos: Pos,
    len: usize,
    parent: Option<Arc<Step>>,
}

impl Drop for Step {
    // unlink iteratively; a recursive drop of a long chain overflows the stack
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut step) => next = step.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// A partial route held in the frontier.
///
/// Trails extending the same route share its cells, so a frontier of `n`
/// trails costs `O(n)` memory however long the routes grow. Cloning is cheap.
#[derive(Clone)]
pub struct Trail(Arc<Step>);

impl Trail {
    /// A one-cell trail.
    pub fn start(pos: Pos) -> Self {
        Self(Arc::new(Step {
            pos,
            len: 1,
            parent: None,
        }))
    }

    /// This trail followed by `pos`.
    pub fn extend(&self, pos: Pos) -> Self {
        Self(Arc::new(Step {
            pos,
            len: self.0.len + 1,
            parent: Some(Arc::clone(&self.0)),
        }))
    }

    /// The last cell.
    #[inline]
    pub fn pos(&self) -> Pos {
        self.0.pos
    }

    /// Number of cells, start included.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len
    }

    /// Cells from the last back to the start.
    pub fn iter_rev(&self) -> impl Iterator<Item = Pos> + '_ {
        std::iter::successors(Some(&*self.0), |s| s.parent.as_deref()).map(|s| s.pos)
    }

    /// Materialise the route, start first.
    pub fn to_route(&self) -> Route {
        let mut route: Route = self.iter_rev().collect();
        route.reverse();
        route
    }
}

impl std::fmt::Debug for Trail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trail")
            .field("pos", &self.pos())
            .field("len", &self.len())
            .finish()
    }
}

/// Ordering discipline for the trails a search has yet to expand.
pub trait Frontier: Send {
    /// Add a trail.
    fn push(&mut self, trail: Trail);

    /// Remove the next trail to expand.
    fn pop(&mut self) -> Option<Trail>;

    /// Number of pending trails.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
