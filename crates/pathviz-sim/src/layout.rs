//! Random layout helpers: wall scattering and open-cell picking.

use rand::Rng;

use pathviz_core::{Grid, Pos};

/// Turn roughly `density` (0.0–1.0) of the editable cells into walls.
///
/// Protected cells (start, end, path) are skipped. Returns the number of
/// walls placed.
pub fn scatter_walls(grid: &Grid, density: f64, rng: &mut impl Rng) -> usize {
    let density = density.clamp(0.0, 1.0);
    if density == 0.0 {
        return 0;
    }
    let mut placed = 0;
    for p in grid.dims() {
        if rng.random_bool(density) && grid.toggle_wall(p, true) {
            placed += 1;
        }
    }
    placed
}

/// Pick a random non-wall cell that is not in `exclude`.
///
/// Tries random probes first, then falls back to a scan so a nearly full
/// grid still yields a cell when one exists.
pub fn random_open_cell(grid: &Grid, rng: &mut impl Rng, exclude: &[Pos]) -> Option<Pos> {
    let usable = |p: Pos| {
        !exclude.contains(&p) && grid.cell(p).is_some_and(|c| !c.is_wall())
    };
    for _ in 0..1000 {
        let p = Pos::new(
            rng.random_range(0..grid.rows()),
            rng.random_range(0..grid.columns()),
        );
        if usable(p) {
            return Some(p);
        }
    }
    let open: Vec<Pos> = grid.dims().iter().filter(|&p| usable(p)).collect();
    if open.is_empty() {
        None
    } else {
        Some(open[rng.random_range(0..open.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scatter_skips_protected_cells() {
        let g = Grid::new(10, 10);
        g.set_start(Pos::new(0, 0), true);
        let mut rng = StdRng::seed_from_u64(7);
        let placed = scatter_walls(&g, 1.0, &mut rng);
        assert_eq!(placed, 98);
        assert!(!g.cell(Pos::new(0, 0)).unwrap().is_wall());
        assert!(!g.cell(g.end()).unwrap().is_wall());
    }

    #[test]
    fn zero_density_places_nothing() {
        let g = Grid::new(4, 4);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(scatter_walls(&g, 0.0, &mut rng), 0);
        assert!(g.cells().all(|c| !c.is_wall()));
    }

    #[test]
    fn open_cell_avoids_walls_and_exclusions() {
        let g = Grid::new(3, 3);
        // the end cell at (2, 2) cannot become a wall and stays open
        for p in g.dims() {
            if p != Pos::new(1, 1) && p != Pos::new(2, 0) {
                g.toggle_wall(p, true);
            }
        }
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(
                random_open_cell(&g, &mut rng, &[Pos::new(2, 0), g.end()]),
                Some(Pos::new(1, 1))
            );
        }
        assert_eq!(
            random_open_cell(&g, &mut rng, &[Pos::new(2, 0), Pos::new(1, 1), g.end()]),
            None
        );
    }
}
