use tracing::debug;

use super::grid::{GridError, SparseGrid};
use super::tile::Tile;
use crate::random::RandomSource;

/// Clamped, half-open tile bounds of the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub x_min: u32,
    pub x_end: u32,
    pub y_min: u32,
    pub y_end: u32,
}

impl TileWindow {
    pub fn tile_count(&self) -> usize {
        (self.x_end - self.x_min) as usize * (self.y_end - self.y_min) as usize
    }
}

/// Square window of tiles around the focal point, rebuilt only when the focal tile moves.
#[derive(Debug, Clone)]
pub struct VisibilityWindow {
    radius: u32,
    focal_tile: Option<(i64, i64)>,
    bounds: Option<TileWindow>,
    tiles: Vec<Tile>,
}

impl VisibilityWindow {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            focal_tile: None,
            bounds: None,
            tiles: Vec::new(),
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn focal_tile(&self) -> Option<(i64, i64)> {
        self.focal_tile
    }

    pub fn bounds(&self) -> Option<TileWindow> {
        self.bounds
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Forgets the focal tile so the next `recompute` rescans even if it lands on the same
    /// tile.
    pub fn invalidate(&mut self) {
        self.focal_tile = None;
    }

    /// Returns `Ok(true)` when the visible set was rebuilt.
    pub fn recompute(
        &mut self,
        focal_x: f32,
        focal_y: f32,
        grid: &mut SparseGrid,
        rng: &mut dyn RandomSource,
    ) -> Result<bool, GridError> {
        let focal_tile = (
            (focal_x / grid.tile_width()).round() as i64,
            (focal_y / grid.tile_height()).round() as i64,
        );
        if self.focal_tile == Some(focal_tile) {
            return Ok(false);
        }

        let radius = i64::from(self.radius);
        let window = TileWindow {
            x_min: clamp_tile(focal_tile.0 - radius, grid.x_tiles()),
            x_end: clamp_tile(focal_tile.0 + radius, grid.x_tiles()),
            y_min: clamp_tile(focal_tile.1 - radius, grid.y_tiles()),
            y_end: clamp_tile(focal_tile.1 + radius, grid.y_tiles()),
        };

        let mut tiles = Vec::with_capacity(window.tile_count());
        for y in window.y_min..window.y_end {
            for x in window.x_min..window.x_end {
                tiles.push(grid.get(x, y, rng)?);
            }
        }

        self.tiles = tiles;
        self.bounds = Some(window);
        self.focal_tile = Some(focal_tile);
        debug!(
            tile_x = focal_tile.0,
            tile_y = focal_tile.1,
            visible_tiles = self.tiles.len(),
            materialized = grid.materialized_count(),
            "visibility_recomputed"
        );
        Ok(true)
    }
}

fn clamp_tile(value: i64, total: u32) -> u32 {
    value.clamp(0, i64::from(total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{DrawSequence, FixedDraw};

    #[test]
    fn window_is_clamped_and_scanned_row_major() {
        let mut grid = SparseGrid::new(10, 10, 50.0, 50.0);
        let mut window = VisibilityWindow::new(2);
        let rebuilt = window
            .recompute(0.0, 0.0, &mut grid, &mut FixedDraw(0.5))
            .expect("recompute");

        assert!(rebuilt);
        assert_eq!(
            window.bounds(),
            Some(TileWindow {
                x_min: 0,
                x_end: 2,
                y_min: 0,
                y_end: 2,
            })
        );
        let coords: Vec<(u32, u32)> = window.tiles().iter().map(|t| (t.tx, t.ty)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn interior_window_spans_twice_the_radius() {
        let mut grid = SparseGrid::new(20, 20, 50.0, 50.0);
        let mut window = VisibilityWindow::new(3);
        window
            .recompute(500.0, 500.0, &mut grid, &mut FixedDraw(0.5))
            .expect("recompute");

        assert_eq!(window.focal_tile(), Some((10, 10)));
        assert_eq!(window.tiles().len(), 36);
        let first = window.tiles().first().expect("first");
        let last = window.tiles().last().expect("last");
        assert_eq!((first.tx, first.ty), (7, 7));
        assert_eq!((last.tx, last.ty), (12, 12));
    }

    #[test]
    fn unchanged_focal_tile_skips_the_scan() {
        let mut grid = SparseGrid::new(20, 20, 50.0, 50.0);
        let mut window = VisibilityWindow::new(2);
        let mut draws = DrawSequence::new(vec![0.5]);
        window
            .recompute(500.0, 500.0, &mut grid, &mut draws)
            .expect("first");
        let consumed = draws.consumed();

        // 510 / 50 rounds to the same tile.
        let rebuilt = window
            .recompute(510.0, 490.0, &mut grid, &mut draws)
            .expect("second");
        assert!(!rebuilt);
        assert_eq!(draws.consumed(), consumed);
    }

    #[test]
    fn moving_focus_replaces_the_visible_set() {
        let mut grid = SparseGrid::new(20, 20, 50.0, 50.0);
        let mut window = VisibilityWindow::new(1);
        window
            .recompute(100.0, 100.0, &mut grid, &mut FixedDraw(0.5))
            .expect("first");
        window
            .recompute(400.0, 100.0, &mut grid, &mut FixedDraw(0.5))
            .expect("second");

        let coords: Vec<(u32, u32)> = window.tiles().iter().map(|t| (t.tx, t.ty)).collect();
        assert_eq!(coords, vec![(7, 1), (8, 1), (7, 2), (8, 2)]);
        assert_eq!(grid.materialized_count(), 8);
    }

    #[test]
    fn invalidate_forces_a_rescan() {
        let mut grid = SparseGrid::new(10, 10, 50.0, 50.0);
        let mut window = VisibilityWindow::new(1);
        window
            .recompute(100.0, 100.0, &mut grid, &mut FixedDraw(0.5))
            .expect("first");
        window.invalidate();
        let rebuilt = window
            .recompute(100.0, 100.0, &mut grid, &mut FixedDraw(0.5))
            .expect("second");
        assert!(rebuilt);
    }

    #[test]
    fn focus_outside_the_grid_yields_an_empty_window() {
        let mut grid = SparseGrid::new(10, 10, 50.0, 50.0);
        let mut window = VisibilityWindow::new(2);
        window
            .recompute(5000.0, 5000.0, &mut grid, &mut FixedDraw(0.5))
            .expect("recompute");
        assert!(window.tiles().is_empty());
    }
}
