//! Error types for isosurface extraction.

use thiserror::Error;

/// Result type for isosurface operations.
pub type IsosurfaceResult<T> = Result<T, IsosurfaceError>;

/// Errors that can occur during isosurface extraction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsosurfaceError {
    /// The requested level lies outside the range of the field, so no
    /// surface exists.
    #[error("isosurface level {level} is outside the field range [{min}, {max}]")]
    EmptyIsosurface {
        /// Requested level.
        level: f64,
        /// Smallest field value.
        min: f64,
        /// Largest field value.
        max: f64,
    },

    /// The level is NaN or infinite.
    #[error("invalid isosurface level: {0}")]
    InvalidLevel(f64),

    /// Marching cubes needs at least two samples along every axis.
    #[error("grid too small for marching cubes: {nx}x{ny}x{nz} (need at least 2 per axis)")]
    GridTooSmall {
        /// Samples along x.
        nx: usize,
        /// Samples along y.
        ny: usize,
        /// Samples along z.
        nz: usize,
    },

    /// Spacing must be finite and positive on every axis.
    #[error("invalid voxel spacing ({x}, {y}, {z})")]
    InvalidSpacing {
        /// Spacing along x.
        x: f64,
        /// Spacing along y.
        y: f64,
        /// Spacing along z.
        z: f64,
    },

    /// The sample count does not match the grid dimensions.
    #[error("grid holds {actual} samples, dimensions need {expected}")]
    SampleCount {
        /// `nx * ny * nz`.
        expected: usize,
        /// Samples supplied.
        actual: usize,
    },

    /// The surface needs more vertices than a `u32` index can address.
    #[error("isosurface has too many vertices for 32-bit indices")]
    TooManyVertices,
}
