//! Marching cubes over a [`ScalarGrid`].

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::error::{IsosurfaceError, IsosurfaceResult};
use crate::grid::ScalarGrid;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, TRIANGLE_TABLE, edge_axis};

/// Lattice edge identified by its lower lattice point and axis.
type EdgeKey = (usize, usize, usize, usize);

/// Extract the isosurface `field == level` as a triangle mesh.
///
/// A sample counts as inside when it is strictly greater than `level`.
/// Vertices are placed by linear interpolation along lattice edges, in the
/// grid's world coordinates (`origin + index * spacing`). A vertex on an
/// edge shared by several cells is emitted once.
///
/// Faces are wound counter-clockwise seen from the low-value side, so for a
/// density blob the normals point outward.
///
/// # Errors
///
/// - [`IsosurfaceError::GridTooSmall`] if any axis has fewer than 2 samples
/// - [`IsosurfaceError::InvalidSpacing`] if a spacing is not finite and positive
/// - [`IsosurfaceError::InvalidLevel`] if `level` is NaN or infinite
/// - [`IsosurfaceError::EmptyIsosurface`] if `level` is outside the field's
///   value range
/// - [`IsosurfaceError::TooManyVertices`] if the result cannot be indexed with `u32`
///
/// A level inside the range that produces no triangles (for example the
/// field maximum) yields an empty mesh, not an error.
///
/// # Example
///
/// ```
/// use mesh_isosurface::{ScalarGrid, marching_cubes, IsosurfaceError};
/// use nalgebra::{Point3, Vector3};
///
/// let grid = ScalarGrid::from_fn(
///     (8, 8, 8),
///     Point3::new(-3.5, -3.5, -3.5),
///     Vector3::new(1.0, 1.0, 1.0),
///     |p| -p.coords.norm(),
/// );
///
/// let mesh = marching_cubes(&grid, -2.0).unwrap();
/// assert!(mesh.is_watertight());
///
/// let err = marching_cubes(&grid, 1.0).unwrap_err();
/// assert!(matches!(err, IsosurfaceError::EmptyIsosurface { .. }));
/// ```
pub fn marching_cubes(grid: &ScalarGrid<'_>, level: f64) -> IsosurfaceResult<IndexedMesh> {
    let (nx, ny, nz) = grid.dimensions();
    if nx < 2 || ny < 2 || nz < 2 {
        return Err(IsosurfaceError::GridTooSmall { nx, ny, nz });
    }

    let spacing = grid.spacing();
    if spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(IsosurfaceError::InvalidSpacing {
            x: spacing.x,
            y: spacing.y,
            z: spacing.z,
        });
    }

    if !level.is_finite() {
        return Err(IsosurfaceError::InvalidLevel(level));
    }

    let (min, max) = grid.value_range().unwrap_or((f64::NAN, f64::NAN));
    if !(min <= level && level <= max) {
        return Err(IsosurfaceError::EmptyIsosurface { level, min, max });
    }

    debug!(nx, ny, nz, level, min, max, "Starting marching cubes");

    let mut builder = SurfaceBuilder::new(grid, level);

    for ix in 0..nx - 1 {
        for iy in 0..ny - 1 {
            for iz in 0..nz - 1 {
                builder.process_cell(ix, iy, iz)?;
            }
        }
    }

    let mesh = builder.finish();

    info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        level,
        "Extracted isosurface"
    );

    Ok(mesh)
}

/// Accumulates triangles cell by cell, sharing vertices along lattice edges.
struct SurfaceBuilder<'g, 'a> {
    grid: &'g ScalarGrid<'a>,
    level: f64,
    mesh: IndexedMesh,
    edge_vertices: HashMap<EdgeKey, u32>,
}

impl<'g, 'a> SurfaceBuilder<'g, 'a> {
    fn new(grid: &'g ScalarGrid<'a>, level: f64) -> Self {
        Self {
            grid,
            level,
            mesh: IndexedMesh::new(),
            edge_vertices: HashMap::new(),
        }
    }

    fn process_cell(&mut self, ix: usize, iy: usize, iz: usize) -> IsosurfaceResult<()> {
        let mut values = [0.0; 8];
        let mut case = 0usize;

        for (corner, offset) in CORNER_OFFSETS.iter().enumerate() {
            let value = self
                .grid
                .get(ix + offset[0], iy + offset[1], iz + offset[2]);
            values[corner] = value;
            if value > self.level {
                case |= 1 << corner;
            }
        }

        for triangle in &TRIANGLE_TABLE[case] {
            let mut face = [0u32; 3];
            for (slot, &edge) in face.iter_mut().zip(triangle) {
                *slot = self.edge_vertex((ix, iy, iz), edge, &values)?;
            }
            self.mesh.faces.push(face);
        }

        Ok(())
    }

    /// Index of the vertex on a cell edge, creating it on first use.
    fn edge_vertex(
        &mut self,
        cell: (usize, usize, usize),
        edge: u8,
        values: &[f64; 8],
    ) -> IsosurfaceResult<u32> {
        let [a, b] = EDGE_CORNERS[usize::from(edge)];
        let axis = edge_axis(edge);
        let offset = CORNER_OFFSETS[usize::from(a)];
        let lower = (cell.0 + offset[0], cell.1 + offset[1], cell.2 + offset[2]);

        match self.edge_vertices.entry((lower.0, lower.1, lower.2, axis)) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let index = u32::try_from(self.mesh.vertices.len())
                    .map_err(|_| IsosurfaceError::TooManyVertices)?;

                let (va, vb) = (values[usize::from(a)], values[usize::from(b)]);
                let t = (self.level - va) / (vb - va);
                let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };

                let mut step = Vector3::zeros();
                step[axis] = self.grid.spacing()[axis] * t;
                let position = self.grid.position(lower.0, lower.1, lower.2) + step;

                self.mesh.vertices.push(Vertex::new(position));
                Ok(*entry.insert(index))
            }
        }
    }

    fn finish(self) -> IndexedMesh {
        self.mesh
    }
}
