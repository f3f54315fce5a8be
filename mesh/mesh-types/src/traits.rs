//! Traits for mesh types.

use crate::{Aabb, Triangle, Vertex};

/// Read-only topology access.
///
/// Algorithms that only inspect a mesh (exporters, statistics) take
/// `&impl MeshTopology` so they do not depend on the storage layout.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// A mesh without vertices or without faces is empty.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` when out of range.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Face by index as vertex indices, `None` when out of range.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all triangles with resolved vertex positions.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty when there are no vertices.
    fn bounds(&self) -> Aabb;
}
