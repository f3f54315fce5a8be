//! Volumetric grid and length units.

use std::fmt;

use nalgebra::{Matrix3, Point3, Vector3};

/// Bohr radius in Angstrom.
pub const BOHR_TO_ANGSTROM: f64 = 0.529_177;

/// Length unit of a cube file's coordinates.
///
/// Cube files flag Angstrom by writing negative voxel counts; otherwise all
/// lengths are in Bohr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    /// Atomic units.
    #[default]
    Bohr,
    /// Angstrom.
    Angstrom,
}

impl LengthUnit {
    /// Factor converting a length in this unit to Angstrom.
    #[must_use]
    pub const fn to_angstrom(self) -> f64 {
        match self {
            Self::Bohr => BOHR_TO_ANGSTROM,
            Self::Angstrom => 1.0,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bohr => f.write_str("Bohr"),
            Self::Angstrom => f.write_str("Angstrom"),
        }
    }
}

/// Scalar field sampled on the cube file's voxel lattice.
///
/// Samples are stored x slowest, z fastest: the value for `(ix, iy, iz)` is
/// at `(ix * ny + iy) * nz + iz`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VolumetricGrid {
    pub(crate) origin: Point3<f64>,
    /// Rows are the voxel vectors of the x, y and z axes.
    pub(crate) basis: Matrix3<f64>,
    pub(crate) dimensions: (usize, usize, usize),
    pub(crate) unit: LengthUnit,
    pub(crate) values: Vec<f64>,
}

impl VolumetricGrid {
    /// Build a grid from parts.
    ///
    /// Returns `None` when `values.len()` differs from `nx * ny * nz` or an
    /// axis has no samples.
    #[must_use]
    pub fn new(
        origin: Point3<f64>,
        basis: Matrix3<f64>,
        dimensions: (usize, usize, usize),
        unit: LengthUnit,
        values: Vec<f64>,
    ) -> Option<Self> {
        let (nx, ny, nz) = dimensions;
        if nx == 0 || ny == 0 || nz == 0 || values.len() != nx * ny * nz {
            return None;
        }
        Some(Self {
            origin,
            basis,
            dimensions,
            unit,
            values,
        })
    }

    /// Position of the first sample.
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Voxel vector of `axis` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 2`.
    #[must_use]
    pub fn voxel_vector(&self, axis: usize) -> Vector3<f64> {
        self.basis.row(axis).transpose()
    }

    /// Matrix whose rows are the three voxel vectors.
    #[must_use]
    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    /// Sample counts `(nx, ny, nz)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.dimensions
    }

    /// Unit of every length in the file.
    #[must_use]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Voxel edge length per axis: the diagonal of the basis.
    ///
    /// Off-diagonal entries are ignored, so the lattice is treated as
    /// orthogonal.
    #[must_use]
    pub fn voxel_size(&self) -> Vector3<f64> {
        self.basis.diagonal()
    }

    /// Extent of the sampled box: `(n - 1) * voxel_size` per axis.
    #[must_use]
    pub fn simulation_box_size(&self) -> Vector3<f64> {
        let (nx, ny, nz) = self.dimensions;
        let size = self.voxel_size();
        Vector3::new(
            (nx - 1) as f64 * size.x,
            (ny - 1) as f64 * size.y,
            (nz - 1) as f64 * size.z,
        )
    }

    /// Flattened samples.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the grid, returning its samples.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Sample at lattice coordinates, `None` out of bounds.
    #[must_use]
    pub fn value(&self, ix: usize, iy: usize, iz: usize) -> Option<f64> {
        let (nx, ny, nz) = self.dimensions;
        if ix >= nx || iy >= ny || iz >= nz {
            return None;
        }
        self.values.get((ix * ny + iy) * nz + iz).copied()
    }

    /// Smallest and largest finite sample.
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
}
