//! Marching cubes case tables.
//!
//! Corner `c` of a cell sits at offset `(c & 1, (c >> 1) & 1, (c >> 2) & 1)`
//! from the cell's lowest lattice point. A case index has bit `c` set when
//! corner `c` lies above the isosurface level.
//!
//! The triangle table is generated once from the cube's face structure
//! instead of being spelled out by hand. On every face the crossing points
//! are joined by segments. Each segment runs from the point where a walk
//! counter-clockwise around the face (seen from outside the cell) enters the
//! above-level region to the point where it leaves again. Segments chain into
//! closed loops through the cell's edges, and each loop is fan-triangulated.
//!
//! Faces with two diagonal above-level corners are split so the two corners
//! stay separate. The choice depends only on the face, so the two cells
//! sharing it always agree and the extracted surface has no cracks.
//!
//! A loop can cross the same cell face twice. The fan apex is chosen so that
//! no diagonal joins two crossings on a common face; otherwise a neighbour
//! fanning across the same pair would put four triangles on one edge.

use std::sync::LazyLock;

/// Lattice offset of each cell corner.
pub(crate) const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Corner pair of each cell edge, lower corner first.
///
/// Edges 0-3 run along x, 4-7 along y and 8-11 along z.
pub(crate) const EDGE_CORNERS: [[u8; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Corners of each cell face, counter-clockwise seen from outside the cell.
const FACE_CORNERS: [[u8; 4]; 6] = [
    [0, 2, 3, 1], // z = 0
    [4, 5, 7, 6], // z = 1
    [0, 1, 5, 4], // y = 0
    [2, 6, 7, 3], // y = 1
    [0, 4, 6, 2], // x = 0
    [1, 3, 7, 5], // x = 1
];

/// Triangles for each of the 256 cases, as triples of edge indices.
///
/// Triangles are wound counter-clockwise seen from the below-level side.
pub(crate) static TRIANGLE_TABLE: LazyLock<Vec<Vec<[u8; 3]>>> =
    LazyLock::new(|| (0..=u8::MAX).map(triangulate_case).collect());

/// Axis (0 = x, 1 = y, 2 = z) an edge runs along.
pub(crate) const fn edge_axis(edge: u8) -> usize {
    (edge / 4) as usize
}

/// Bit `f` is set when the edge lies on face `f` of [`FACE_CORNERS`].
fn face_mask(edge: u8) -> u8 {
    let [a, b] = EDGE_CORNERS[usize::from(edge)];
    FACE_CORNERS
        .iter()
        .enumerate()
        .filter(|(_, face)| face.contains(&a) && face.contains(&b))
        .fold(0, |mask, (f, _)| mask | (1u8 << f))
}

fn share_face(a: u8, b: u8) -> bool {
    face_mask(a) & face_mask(b) != 0
}

/// First loop position whose fan diagonals all cross the cell's interior.
fn fan_apex(polygon: &[u8]) -> usize {
    let n = polygon.len();
    (0..n)
        .find(|&k| {
            (2..n.saturating_sub(1)).all(|j| !share_face(polygon[k], polygon[(k + j) % n]))
        })
        .unwrap_or(0)
}

/// Index of the edge joining two face-adjacent corners.
fn edge_between(a: u8, b: u8) -> u8 {
    let lower = a & b;
    let axis = (a ^ b).trailing_zeros();
    let slot = match axis {
        0 => lower >> 1,
        1 => (lower & 1) | ((lower >> 2) << 1),
        _ => lower,
    };
    // axis < 3, so this stays below 12
    #[allow(clippy::cast_possible_truncation)]
    let base = axis as u8 * 4;
    base + slot
}

fn triangulate_case(case: u8) -> Vec<[u8; 3]> {
    let above = |corner: u8| (case >> corner) & 1 == 1;

    // next[e]: the edge where the contour segment starting on edge e ends
    let mut next: [Option<u8>; 12] = [None; 12];

    for face in FACE_CORNERS {
        let mut crossings: Vec<(u8, bool)> = Vec::with_capacity(4);
        for k in 0..4 {
            let (a, b) = (face[k], face[(k + 1) % 4]);
            if above(a) != above(b) {
                crossings.push((edge_between(a, b), above(b)));
            }
        }

        // Crossings alternate between entering and leaving the above region.
        let n = crossings.len();
        for (i, &(edge, entering)) in crossings.iter().enumerate() {
            if entering {
                next[usize::from(edge)] = Some(crossings[(i + 1) % n].0);
            }
        }
    }

    let mut triangles = Vec::new();
    let mut visited = [false; 12];

    for start in 0..12u8 {
        if visited[usize::from(start)] || next[usize::from(start)].is_none() {
            continue;
        }

        let mut polygon = Vec::with_capacity(12);
        let mut edge = start;
        while !visited[usize::from(edge)] {
            visited[usize::from(edge)] = true;
            polygon.push(edge);
            match next[usize::from(edge)] {
                Some(following) => edge = following,
                None => break,
            }
        }

        let apex = fan_apex(&polygon);
        polygon.rotate_left(apex);
        for i in 1..polygon.len().saturating_sub(1) {
            triangles.push([polygon[0], polygon[i], polygon[i + 1]]);
        }
    }

    triangles
}
