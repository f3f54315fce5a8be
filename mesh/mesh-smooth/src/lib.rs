//! Neighbour-average smoothing for triangle meshes.
//!
//! Marching cubes produces visibly faceted surfaces on coarse grids. This
//! crate relaxes them with the simple Laplacian filter: in every round each
//! vertex moves to the average of itself and its 1-ring neighbours, all
//! computed from the previous round's positions.
//!
//! ```text
//! v' = (v + sum(neighbours)) / (1 + n)
//! ```
//!
//! Topology is never changed; only vertex positions move. Zero rounds leave
//! the mesh bit-for-bit untouched.
//!
//! # Example
//!
//! ```
//! use mesh_smooth::{SmoothParams, smooth_simple};
//! use mesh_types::unit_cube;
//!
//! let mut mesh = unit_cube();
//! let before = mesh.surface_area();
//!
//! let report = smooth_simple(&mut mesh, &SmoothParams::new().with_iterations(2));
//! assert_eq!(report.iterations_performed, 2);
//! assert!(mesh.surface_area() < before);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod simple;

pub use adjacency::VertexNeighbors;
pub use simple::{SmoothParams, SmoothReport, smooth_simple};
