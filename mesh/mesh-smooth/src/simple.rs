//! Simple Laplacian smoothing.

use mesh_types::IndexedMesh;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::adjacency::VertexNeighbors;

/// Parameters for [`smooth_simple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmoothParams {
    /// Number of smoothing rounds.
    ///
    /// Default: `1`
    pub iterations: u32,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

impl SmoothParams {
    /// Create default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rounds.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Outcome of [`smooth_simple`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothReport {
    /// Number of rounds applied.
    pub iterations_performed: u32,

    /// Largest distance any vertex moved in a single round.
    pub max_displacement: f64,
}

/// Smooth `mesh` in place.
///
/// Each round replaces every vertex with the average of itself and its
/// unique 1-ring neighbours, using the positions from the previous round.
/// Isolated vertices keep their position. Faces are not touched.
///
/// With `iterations == 0` the mesh is returned exactly as it was.
pub fn smooth_simple(mesh: &mut IndexedMesh, params: &SmoothParams) -> SmoothReport {
    let mut report = SmoothReport {
        iterations_performed: 0,
        max_displacement: 0.0,
    };

    if params.iterations == 0 || mesh.vertices.is_empty() || mesh.faces.is_empty() {
        debug!(iterations = params.iterations, "Skipping smoothing");
        return report;
    }

    info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        iterations = params.iterations,
        "Starting mesh smoothing"
    );

    let neighbors = VertexNeighbors::from_mesh(mesh);
    let mut positions: Vec<Point3<f64>> = mesh.vertices.iter().map(|v| v.position).collect();

    for round in 0..params.iterations {
        let next = smooth_round(&positions, &neighbors);

        let moved = positions
            .par_iter()
            .zip(next.par_iter())
            .map(|(a, b)| (b - a).norm())
            .reduce(|| 0.0, f64::max);

        debug!(round, max_displacement = moved, "Smoothing round");

        report.max_displacement = report.max_displacement.max(moved);
        report.iterations_performed += 1;
        positions = next;
    }

    for (vertex, position) in mesh.vertices.iter_mut().zip(positions) {
        vertex.position = position;
    }

    info!(
        iterations = report.iterations_performed,
        max_displacement = report.max_displacement,
        "Mesh smoothing complete"
    );

    report
}

/// One round of neighbour averaging.
fn smooth_round(positions: &[Point3<f64>], neighbors: &VertexNeighbors) -> Vec<Point3<f64>> {
    positions
        .par_iter()
        .enumerate()
        .map(|(i, position)| {
            let ring = neighbors.of(i);
            if ring.is_empty() {
                return *position;
            }

            let sum: Vector3<f64> = ring
                .iter()
                .map(|&n| positions[n as usize].coords)
                .sum::<Vector3<f64>>()
                + position.coords;

            Point3::from(sum / (ring.len() + 1) as f64)
        })
        .collect()
}
