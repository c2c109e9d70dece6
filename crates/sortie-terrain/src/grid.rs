//! Ground-height sources: a flat plane and a regular heightmap grid.

use sortie_core::types::Position;

/// Ground-height query consumed by the simulation.
pub trait GroundHeight: Send + Sync {
    /// Ground elevation at world (x, z). `None` when the point is not covered.
    fn height_at(&self, x: f64, z: f64) -> Option<f64>;

    /// Ground elevation directly below a position.
    fn height_below(&self, pos: &Position) -> Option<f64> {
        self.height_at(pos.x, pos.z)
    }
}

/// Infinite flat ground at a fixed elevation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround {
    pub elevation: f64,
}

impl FlatGround {
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl GroundHeight for FlatGround {
    fn height_at(&self, _x: f64, _z: f64) -> Option<f64> {
        Some(self.elevation)
    }
}

/// Regular heightmap grid with bilinear interpolation.
///
/// Samples are row-major: row index grows with z, column index with x.
/// Sample (row, col) sits at `(origin_x + col * cell_size, origin_z + row * cell_size)`.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    origin_x: f64,
    origin_z: f64,
    cell_size: f64,
    width: usize,
    depth: usize,
    heights: Vec<f64>,
}

impl HeightGrid {
    /// Create a grid from pre-loaded samples.
    /// Returns `None` if the sample count does not match the dimensions.
    pub fn new(
        origin_x: f64,
        origin_z: f64,
        cell_size: f64,
        width: usize,
        depth: usize,
        heights: Vec<f64>,
    ) -> Option<Self> {
        if width < 2 || depth < 2 || cell_size <= 0.0 || heights.len() != width * depth {
            return None;
        }
        Some(Self {
            origin_x,
            origin_z,
            cell_size,
            width,
            depth,
            heights,
        })
    }

    /// Build a grid by sampling a height function at every grid point.
    pub fn from_fn(
        origin_x: f64,
        origin_z: f64,
        cell_size: f64,
        width: usize,
        depth: usize,
        f: impl Fn(f64, f64) -> f64,
    ) -> Option<Self> {
        let mut heights = Vec::with_capacity(width * depth);
        for row in 0..depth {
            for col in 0..width {
                let x = origin_x + col as f64 * cell_size;
                let z = origin_z + row as f64 * cell_size;
                heights.push(f(x, z));
            }
        }
        Self::new(origin_x, origin_z, cell_size, width, depth, heights)
    }

    /// Convert world (x, z) to fractional (row, col). `None` outside the grid.
    fn world_to_grid(&self, x: f64, z: f64) -> Option<(f64, f64)> {
        let col = (x - self.origin_x) / self.cell_size;
        let row = (z - self.origin_z) / self.cell_size;
        let max_col = (self.width - 1) as f64;
        let max_row = (self.depth - 1) as f64;
        if !col.is_finite() || !row.is_finite() {
            return None;
        }
        if col < 0.0 || row < 0.0 || col > max_col || row > max_row {
            return None;
        }
        Some((row, col))
    }

    fn sample(&self, row: usize, col: usize) -> f64 {
        self.heights[row * self.width + col]
    }

    /// Bilinear interpolation at fractional row/col.
    fn bilinear(&self, row: f64, col: f64) -> f64 {
        let r0 = row.floor() as usize;
        let c0 = col.floor() as usize;
        let r1 = (r0 + 1).min(self.depth - 1);
        let c1 = (c0 + 1).min(self.width - 1);

        let fr = row - r0 as f64;
        let fc = col - c0 as f64;

        let top = self.sample(r0, c0) * (1.0 - fc) + self.sample(r0, c1) * fc;
        let bot = self.sample(r1, c0) * (1.0 - fc) + self.sample(r1, c1) * fc;
        top * (1.0 - fr) + bot * fr
    }
}

impl GroundHeight for HeightGrid {
    fn height_at(&self, x: f64, z: f64) -> Option<f64> {
        let (row, col) = self.world_to_grid(x, z)?;
        Some(self.bilinear(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5×5 grid with 10-unit cells centered on the origin, peak in the middle.
    fn make_test_grid() -> HeightGrid {
        #[rustfmt::skip]
        let heights = vec![
            0.0,  0.0,  0.0,  0.0, 0.0,
            0.0, 10.0, 10.0, 10.0, 0.0,
            0.0, 10.0, 20.0, 10.0, 0.0,
            0.0, 10.0, 10.0, 10.0, 0.0,
            0.0,  0.0,  0.0,  0.0, 0.0,
        ];
        HeightGrid::new(-20.0, -20.0, 10.0, 5, 5, heights).unwrap()
    }

    #[test]
    fn test_height_at_sample_point() {
        let grid = make_test_grid();
        let h = grid.height_at(0.0, 0.0).unwrap();
        assert!((h - 20.0).abs() < 1e-9, "Peak should be 20, got {h}");
    }

    #[test]
    fn test_height_bilinear_between_samples() {
        let grid = make_test_grid();
        // Halfway between the peak (20) and its neighbor (10).
        let h = grid.height_at(5.0, 0.0).unwrap();
        assert!((h - 15.0).abs() < 1e-9, "Expected 15, got {h}");
    }

    #[test]
    fn test_height_outside_grid_is_none() {
        let grid = make_test_grid();
        assert!(grid.height_at(50.0, 0.0).is_none());
        assert!(grid.height_at(0.0, -20.1).is_none());
        assert!(grid.height_at(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_grid_edges_are_covered() {
        let grid = make_test_grid();
        assert_eq!(grid.height_at(20.0, 20.0), Some(0.0));
        assert_eq!(grid.height_at(-20.0, -20.0), Some(0.0));
    }

    #[test]
    fn test_new_rejects_mismatched_samples() {
        assert!(HeightGrid::new(0.0, 0.0, 1.0, 3, 3, vec![0.0; 8]).is_none());
        assert!(HeightGrid::new(0.0, 0.0, 0.0, 3, 3, vec![0.0; 9]).is_none());
    }

    #[test]
    fn test_from_fn_samples_function() {
        let grid = HeightGrid::from_fn(0.0, 0.0, 1.0, 11, 11, |x, z| x + z).unwrap();
        let h = grid.height_at(2.5, 3.5).unwrap();
        assert!((h - 6.0).abs() < 1e-9, "Linear surface should interpolate exactly, got {h}");
    }

    #[test]
    fn test_flat_ground_everywhere() {
        let ground = FlatGround::new(7.0);
        assert_eq!(ground.height_at(1e6, -1e6), Some(7.0));
        assert_eq!(ground.height_below(&Position::new(0.0, 50.0, 0.0)), Some(7.0));
    }
}
