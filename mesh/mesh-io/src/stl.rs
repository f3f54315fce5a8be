//! STL (Stereolithography) support.
//!
//! STL stores a triangle soup: every facet carries its own three corners and
//! a unit normal, so loading yields three vertices per face.
//!
//! # Binary layout
//!
//! ```text
//! UINT8[80]    header
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count (0)
//! ```
//!
//! ASCII files are `solid` / `facet normal` / `outer loop` / `vertex` blocks.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Point3, Vector3, Vertex};

use crate::error::{IoError, IoResult, open};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file, detecting ASCII or binary content.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let mut bytes = Vec::new();
    BufReader::new(open(path.as_ref())?).read_to_end(&mut bytes)?;

    if bytes.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    if is_ascii(&bytes) {
        read_ascii(bytes.as_slice())
    } else {
        read_binary(&bytes)
    }
}

/// ASCII files start with `solid` and contain no NUL bytes in the first
/// header-sized chunk. Some binary exporters also start with `solid`.
fn is_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid") && !head.contains(&0)
}

fn read_binary(bytes: &[u8]) -> IoResult<IndexedMesh> {
    if bytes.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: bytes.len(),
        });
    }

    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + 4]);
    let face_count = u32::from_le_bytes(count);

    let body = &bytes[HEADER_SIZE + 4..];
    let mut mesh = IndexedMesh::with_capacity(face_count as usize * 3, face_count as usize);

    let mut chunks = body.chunks_exact(TRIANGLE_SIZE);
    for i in 0..face_count {
        let Some(triangle) = chunks.next() else {
            return Err(IoError::InvalidFaceCount {
                expected: face_count,
                got: i,
            });
        };

        let base = u32::try_from(mesh.vertices.len())
            .map_err(|_| IoError::TooLarge("STL vertex count exceeds u32".to_string()))?;
        // skip the 12-byte normal
        for corner in triangle[12..48].chunks_exact(12) {
            mesh.vertices.push(read_vertex(corner));
        }
        mesh.faces.push([base, base + 1, base + 2]);
    }

    Ok(mesh)
}

fn read_vertex(buf: &[u8]) -> Vertex {
    let coord = |k: usize| {
        f64::from(f32::from_le_bytes([
            buf[k],
            buf[k + 1],
            buf[k + 2],
            buf[k + 3],
        ]))
    };
    Vertex::from_coords(coord(0), coord(4), coord(8))
}

fn read_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<Vertex> = Vec::with_capacity(3);
    let mut in_loop = false;

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                if parts.len() < 4 {
                    return Err(IoError::invalid_content("STL vertex needs three coordinates"));
                }
                let x: f64 = parts[1].parse()?;
                let y: f64 = parts[2].parse()?;
                let z: f64 = parts[3].parse()?;
                corners.push(Vertex::from_coords(x, y, z));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if corners.len() == 3 {
                    let base = u32::try_from(mesh.vertices.len()).map_err(|_| {
                        IoError::TooLarge("STL vertex count exceeds u32".to_string())
                    })?;
                    mesh.vertices.append(&mut corners);
                    mesh.faces.push([base, base + 1, base + 2]);
                }
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// With `binary` the file is binary STL, otherwise ASCII with `{:.6e}`
/// coordinates.
///
/// # Errors
///
/// Returns an error if a face references a missing vertex, the mesh has
/// more than `u32::MAX` faces, or the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    crate::check_faces(mesh)?;

    let mut writer = BufWriter::new(File::create(path)?);
    if binary {
        write_binary(mesh, &mut writer)?;
    } else {
        write_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Corners and unit normal of a face; zero normal for degenerate faces.
fn facet(mesh: &IndexedMesh, face: [u32; 3]) -> ([Point3<f64>; 3], Vector3<f64>) {
    let corners = face.map(|i| mesh.vertices[i as usize].position);
    let normal = (corners[1] - corners[0])
        .cross(&(corners[2] - corners[0]))
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros);
    (corners, normal)
}

fn write_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let face_count = u32::try_from(mesh.faces.len())
        .map_err(|_| IoError::TooLarge(format!("{} faces for binary STL", mesh.faces.len())))?;

    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by cubeiso mesh-io";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;
    writer.write_all(&face_count.to_le_bytes())?;

    for &face in &mesh.faces {
        let (corners, normal) = facet(mesh, face);
        write_f32s(writer, normal.iter().copied())?;
        for corner in &corners {
            write_f32s(writer, corner.iter().copied())?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_f32s<W: Write>(writer: &mut W, values: impl Iterator<Item = f64>) -> IoResult<()> {
    for value in values {
        // STL stores single precision
        #[allow(clippy::cast_possible_truncation)]
        let single = value as f32;
        writer.write_all(&single.to_le_bytes())?;
    }
    Ok(())
}

fn write_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid isosurface")?;

    for &face in &mesh.faces {
        let (corners, n) = facet(mesh, face);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for p in &corners {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid isosurface")?;
    Ok(())
}
