//! Isosurface extraction from dense scalar grids.
//!
//! This crate turns a sampled scalar field (electron density, signed
//! distance, ...) into a triangle mesh approximating the surface where the
//! field equals a chosen level. It uses the marching cubes algorithm over
//! the voxel lattice.
//!
//! # Overview
//!
//! 1. Wrap the samples in a [`ScalarGrid`] (owned or borrowed), giving the
//!    per-axis spacing
//! 2. Call [`marching_cubes`] with the isosurface level
//! 3. Receive an [`IndexedMesh`](mesh_types::IndexedMesh) whose vertices are
//!    shared between neighbouring cells
//!
//! Samples are stored with the **x index varying slowest and z fastest**,
//! matching the order voxel data is written in cube files.
//!
//! # Example
//!
//! ```
//! use mesh_isosurface::{ScalarGrid, marching_cubes};
//! use mesh_types::MeshTopology;
//! use nalgebra::Vector3;
//!
//! // A single hot voxel in the middle of a 3x3x3 grid
//! let mut grid = ScalarGrid::new((3, 3, 3), Vector3::new(1.0, 1.0, 1.0));
//! grid.set(1, 1, 1, 1.0);
//!
//! let mesh = marching_cubes(&grid, 0.5).unwrap();
//! assert_eq!(mesh.vertex_count(), 6);
//! assert_eq!(mesh.face_count(), 8);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod grid;
mod marching_cubes;
mod tables;

pub use error::{IsosurfaceError, IsosurfaceResult};
pub use grid::ScalarGrid;
pub use marching_cubes::marching_cubes;
