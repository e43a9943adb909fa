//! Point cloud of a regular grid sampled with `io_test`, a quick way
//! to inspect the volume of a scene without tracing any rays.

// others
use rayon::prelude::*;
// sqtrace
use crate::core::error::{Result, SqError};
use crate::core::geometry::Point3f;
use crate::core::scene::Scene;
use crate::core::sqtrace::Float;

/// Cubic sampling grid, identical along all three axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Grid {
    pub min: Float,
    pub max: Float,
    pub step: Float,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            min: -10.0,
            max: 10.0,
            step: 0.5,
        }
    }
}

impl Grid {
    /// Number of samples along one axis, both ends included.
    pub fn resolution(&self) -> Result<usize> {
        if !(self.step > 0.0) || !(self.max >= self.min) {
            return Err(SqError::InvalidValue(format!("sampling grid {:?}", self)));
        }
        // tolerate round-off when (max - min) is a multiple of step
        Ok(((self.max - self.min) / self.step + 1e-9).floor() as usize + 1)
    }
    fn coordinate(&self, i: usize) -> Float {
        self.min + self.step * i as Float
    }
}

/// All grid points strictly inside some object of the scene, ordered
/// by x, then y, then z.
pub fn inside_points(scene: &Scene, grid: &Grid) -> Result<Vec<Point3f>> {
    let n: usize = grid.resolution()?;
    let points: Vec<Point3f> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let x = grid.coordinate(i);
            (0..n).flat_map(move |j| {
                let y = grid.coordinate(j);
                (0..n).map(move |k| Point3f::new(x, y, grid.coordinate(k)))
            })
        })
        .filter(|p| scene.io_test(p))
        .collect();
    Ok(points)
}
