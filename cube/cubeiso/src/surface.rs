//! Isosurface extraction in the atoms' frame.

use cube_file::VolumetricGrid;
use mesh_isosurface::{IsosurfaceError, ScalarGrid, marching_cubes};
use mesh_types::{IndexedMesh, Vector3};
use tracing::{info, warn};

/// Whether extraction produced a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceStatus {
    /// Marching cubes succeeded. The mesh may still be empty when the level
    /// touches the field only at isolated samples.
    Surface,
    /// No surface could be extracted; the mesh is empty.
    Empty {
        /// Why extraction failed.
        reason: IsosurfaceError,
    },
}

impl SurfaceStatus {
    /// Check if extraction failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Extract the isosurface at `level` from a cube grid.
///
/// Marching cubes runs on the voxel lattice scaled by the voxel size with
/// sample (0, 0, 0) at the coordinate origin. Every vertex is then moved by
/// `-|origin|` per axis, which places the surface in the frame of the atom
/// coordinates for grids centred on the molecule.
///
/// Extraction failures are not fatal: they yield an empty mesh and
/// [`SurfaceStatus::Empty`].
#[must_use]
pub fn extract_surface(grid: &VolumetricGrid, level: f64) -> (IndexedMesh, SurfaceStatus) {
    let extracted = ScalarGrid::from_slice(grid.values(), grid.dimensions(), grid.voxel_size())
        .and_then(|scalar| marching_cubes(&scalar, level));

    match extracted {
        Ok(mut mesh) => {
            mesh.translate(-origin_offset(grid));
            info!(
                level,
                vertices = mesh.vertices.len(),
                faces = mesh.faces.len(),
                "Extracted isosurface"
            );
            (mesh, SurfaceStatus::Surface)
        }
        Err(reason) => {
            warn!(level, %reason, "No isosurface, continuing with an empty mesh");
            (IndexedMesh::new(), SurfaceStatus::Empty { reason })
        }
    }
}

/// `|origin|` per axis.
fn origin_offset(grid: &VolumetricGrid) -> Vector3<f64> {
    grid.origin().coords.abs()
}
