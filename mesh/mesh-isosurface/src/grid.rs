//! Dense 3D scalar grid.

use std::borrow::Cow;

use nalgebra::{Point3, Vector3};

use crate::error::{IsosurfaceError, IsosurfaceResult};

/// A dense 3D grid of scalar samples.
///
/// Samples sit on lattice points `origin + (ix*sx, iy*sy, iz*sz)`. The
/// storage is row-major with **x varying slowest and z fastest**, so the
/// sample for `(ix, iy, iz)` lives at `(ix * ny + iy) * nz + iz`.
///
/// Values may be owned or borrowed, so a parsed volume can be meshed without
/// copying its samples.
#[derive(Debug, Clone)]
pub struct ScalarGrid<'a> {
    /// Grid values, x slowest.
    values: Cow<'a, [f64]>,
    /// Grid dimensions (nx, ny, nz).
    dimensions: (usize, usize, usize),
    /// Position of sample (0, 0, 0).
    origin: Point3<f64>,
    /// Distance between neighbouring samples along each axis.
    spacing: Vector3<f64>,
}

impl ScalarGrid<'static> {
    /// Create a zero-filled grid with its origin at (0, 0, 0).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_isosurface::ScalarGrid;
    /// use nalgebra::Vector3;
    ///
    /// let grid = ScalarGrid::new((10, 10, 10), Vector3::new(0.5, 0.5, 0.5));
    /// assert_eq!(grid.dimensions(), (10, 10, 10));
    /// assert_eq!(grid.len(), 1000);
    /// ```
    #[must_use]
    pub fn new(dimensions: (usize, usize, usize), spacing: Vector3<f64>) -> Self {
        let (nx, ny, nz) = dimensions;
        Self {
            values: Cow::Owned(vec![0.0; nx * ny * nz]),
            dimensions,
            origin: Point3::origin(),
            spacing,
        }
    }

    /// Create a grid by sampling `f` at every lattice point.
    ///
    /// `f` receives the world-space position of the sample.
    #[must_use]
    pub fn from_fn<F>(
        dimensions: (usize, usize, usize),
        origin: Point3<f64>,
        spacing: Vector3<f64>,
        mut f: F,
    ) -> Self
    where
        F: FnMut(Point3<f64>) -> f64,
    {
        let (nx, ny, nz) = dimensions;
        let mut values = Vec::with_capacity(nx * ny * nz);
        for ix in 0..nx {
            for iy in 0..ny {
                for iz in 0..nz {
                    values.push(f(lattice_point(origin, spacing, ix, iy, iz)));
                }
            }
        }

        Self {
            values: Cow::Owned(values),
            dimensions,
            origin,
            spacing,
        }
    }
}

impl<'a> ScalarGrid<'a> {
    /// Wrap existing samples without copying.
    ///
    /// # Errors
    ///
    /// Returns [`IsosurfaceError::SampleCount`] when `values.len()` differs
    /// from `nx * ny * nz`.
    pub fn from_slice(
        values: &'a [f64],
        dimensions: (usize, usize, usize),
        spacing: Vector3<f64>,
    ) -> IsosurfaceResult<Self> {
        let (nx, ny, nz) = dimensions;
        if values.len() != nx * ny * nz {
            return Err(IsosurfaceError::SampleCount {
                expected: nx * ny * nz,
                actual: values.len(),
            });
        }

        Ok(Self {
            values: Cow::Borrowed(values),
            dimensions,
            origin: Point3::origin(),
            spacing,
        })
    }

    /// Move the grid so sample (0, 0, 0) sits at `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: Point3<f64>) -> Self {
        self.origin = origin;
        self
    }

    /// Grid dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.dimensions
    }

    /// Position of sample (0, 0, 0).
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Distance between samples along each axis.
    #[must_use]
    pub fn spacing(&self) -> Vector3<f64> {
        self.spacing
    }

    /// Raw samples in storage order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at grid coordinates.
    ///
    /// Returns 0.0 if coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        if self.in_bounds(ix, iy, iz) {
            self.values[self.index(ix, iy, iz)]
        } else {
            0.0
        }
    }

    /// Set the value at grid coordinates.
    ///
    /// Does nothing if coordinates are out of bounds. A borrowed grid is
    /// copied on first write.
    pub fn set(&mut self, ix: usize, iy: usize, iz: usize, value: f64) {
        if self.in_bounds(ix, iy, iz) {
            let idx = self.index(ix, iy, iz);
            self.values.to_mut()[idx] = value;
        }
    }

    /// World-space position of a lattice point.
    #[must_use]
    pub fn position(&self, ix: usize, iy: usize, iz: usize) -> Point3<f64> {
        lattice_point(self.origin, self.spacing, ix, iy, iz)
    }

    /// Smallest and largest finite sample, or `None` if there are none.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Total number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the grid holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn in_bounds(&self, ix: usize, iy: usize, iz: usize) -> bool {
        ix < self.dimensions.0 && iy < self.dimensions.1 && iz < self.dimensions.2
    }

    /// Convert 3D coordinates to linear index.
    fn index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (ix * self.dimensions.1 + iy) * self.dimensions.2 + iz
    }
}

fn lattice_point(
    origin: Point3<f64>,
    spacing: Vector3<f64>,
    ix: usize,
    iy: usize,
    iz: usize,
) -> Point3<f64> {
    Point3::new(
        spacing.x.mul_add(ix as f64, origin.x),
        spacing.y.mul_add(iy as f64, origin.y),
        spacing.z.mul_add(iz as f64, origin.z),
    )
}
