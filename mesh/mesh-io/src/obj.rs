//! Wavefront OBJ support.
//!
//! Only geometry is handled: `v` lines for vertices and `f` lines for
//! faces. Texture and normal references (`f 1/2/3 ...`) are read but
//! ignored, negative (relative) indices are resolved, and polygons are
//! fan-triangulated. Everything else is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};

use crate::error::{IoError, IoResult, open};

/// Load a mesh from an OBJ file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a number does not parse,
/// or a face index is zero or points past the vertices read so far.
pub fn load_obj<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    read_obj(BufReader::new(open(path.as_ref())?))
}

fn read_obj<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut corners: Vec<u32> = Vec::with_capacity(4);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for coord in &mut coords {
                    *coord = parts
                        .next()
                        .ok_or_else(|| {
                            IoError::invalid_content(format!(
                                "line {}: vertex needs three coordinates",
                                line_no + 1
                            ))
                        })?
                        .parse()?;
                }
                mesh.vertices.push(Vertex::from(coords));
            }
            Some("f") => {
                corners.clear();
                for token in parts {
                    corners.push(resolve_index(token, mesh.vertices.len(), line_no + 1)?);
                }
                for k in 1..corners.len().saturating_sub(1) {
                    mesh.faces.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Convert a 1-based (or negative, relative) OBJ index to a 0-based one.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> IoResult<u32> {
    let raw: i64 = token.split('/').next().unwrap_or(token).parse()?;
    let count = i64::try_from(vertex_count).unwrap_or(i64::MAX);

    let index = match raw {
        r if r > 0 && r <= count => r - 1,
        r if r < 0 && -r <= count => count + r,
        _ => {
            return Err(IoError::invalid_content(format!(
                "line {line}: face index {raw} out of range (have {vertex_count} vertices)"
            )));
        }
    };

    u32::try_from(index).map_err(|_| {
        IoError::TooLarge(format!("OBJ vertex index {index} exceeds u32"))
    })
}

/// Save a mesh to an OBJ file.
///
/// Coordinates are written with full `f64` precision.
///
/// # Errors
///
/// Returns an error if a face references a missing vertex or the file
/// cannot be written.
pub fn save_obj<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    crate::check_faces(mesh)?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_obj<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "# cubeiso isosurface")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;

    for v in &mesh.vertices {
        let [x, y, z] = v.to_array();
        writeln!(writer, "v {x} {y} {z}")?;
    }

    for &[a, b, c] in &mesh.faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    Ok(())
}
