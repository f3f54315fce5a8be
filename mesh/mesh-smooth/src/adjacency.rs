//! Vertex 1-ring adjacency.

use mesh_types::IndexedMesh;

/// Unique neighbours of every vertex, in ascending index order.
///
/// Two vertices are neighbours when they share a face edge. Vertices that no
/// face references have no neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexNeighbors {
    neighbors: Vec<Vec<u32>>,
}

impl VertexNeighbors {
    /// Build the adjacency of `mesh`.
    ///
    /// Faces referencing a vertex past the end of the vertex list are
    /// skipped.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        let count = mesh.vertices.len();
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); count];

        for face in &mesh.faces {
            if face.iter().any(|&i| i as usize >= count) {
                continue;
            }
            for k in 0..3 {
                let v = face[k] as usize;
                neighbors[v].push(face[(k + 1) % 3]);
                neighbors[v].push(face[(k + 2) % 3]);
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self { neighbors }
    }

    /// Neighbours of vertex `index`; empty when out of range.
    #[must_use]
    pub fn of(&self, index: usize) -> &[u32] {
        self.neighbors.get(index).map_or(&[], Vec::as_slice)
    }

    /// Number of vertices covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if no vertices are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{Vertex, unit_cube};

    #[test]
    fn single_triangle() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );

        let adj = VertexNeighbors::from_mesh(&mesh);
        assert_eq!(adj.of(0), &[1, 2]);
        assert_eq!(adj.of(1), &[0, 2]);
        assert_eq!(adj.of(2), &[0, 1]);
        assert!(adj.of(3).is_empty());
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        let adj = VertexNeighbors::from_mesh(&unit_cube());
        assert_eq!(adj.len(), 8);
        for v in 0..8 {
            let n = adj.of(v);
            assert!(n.windows(2).all(|w| w[0] < w[1]));
            assert!(!n.contains(&u32::try_from(v).unwrap()));
            // 3 cube edges plus up to one diagonal per adjacent face
            assert!((3..=6).contains(&n.len()), "vertex {v} has {} neighbours", n.len());
        }
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let mesh = IndexedMesh::from_parts(
            vec![Vertex::from_coords(0.0, 0.0, 0.0); 3],
            vec![[0, 1, 7]],
        );
        let adj = VertexNeighbors::from_mesh(&mesh);
        assert!(adj.of(0).is_empty());
    }
}
