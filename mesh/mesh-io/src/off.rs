//! OFF (Object File Format) support.
//!
//! ```text
//! OFF
//! nv nf ne
//! x y z          (nv lines)
//! n i0 i1 ...    (nf lines)
//! ```
//!
//! Comments start with `#`. Polygons are fan-triangulated on load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};

use crate::error::{IoError, IoResult, open};

/// Load a mesh from an OFF file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the `OFF` keyword or the
/// counts are missing, or a face index is out of range.
pub fn load_off<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    read_off(BufReader::new(open(path.as_ref())?))
}

fn read_off<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut text = String::new();
    for line in reader.lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default();
        text.push_str(content);
        text.push('\n');
    }

    let mut tokens = text.split_whitespace();
    match tokens.next() {
        Some("OFF") => {}
        other => {
            return Err(IoError::invalid_content(format!(
                "expected OFF keyword, found {other:?}"
            )));
        }
    }

    let mut next = |what: &str| {
        tokens
            .next()
            .ok_or_else(|| IoError::invalid_content(format!("unexpected end of file reading {what}")))
    };

    let vertex_count: usize = next("vertex count")?.parse()?;
    let face_count: usize = next("face count")?.parse()?;
    let _edge_count: usize = next("edge count")?.parse()?;

    let mut mesh = IndexedMesh::with_capacity(vertex_count, face_count);
    for _ in 0..vertex_count {
        let x: f64 = next("vertex")?.parse()?;
        let y: f64 = next("vertex")?.parse()?;
        let z: f64 = next("vertex")?.parse()?;
        mesh.vertices.push(Vertex::from_coords(x, y, z));
    }

    for face in 0..face_count {
        let corners: usize = next("face size")?.parse()?;
        let mut indices = Vec::with_capacity(corners);
        for _ in 0..corners {
            let index: u32 = next("face index")?.parse()?;
            if index as usize >= vertex_count {
                return Err(IoError::InvalidMesh { face, vertex_count });
            }
            indices.push(index);
        }
        for k in 1..indices.len().saturating_sub(1) {
            mesh.faces.push([indices[0], indices[k], indices[k + 1]]);
        }
    }

    Ok(mesh)
}

/// Save a mesh to an OFF file.
///
/// # Errors
///
/// Returns an error if a face references a missing vertex or the file
/// cannot be written.
pub fn save_off<P: AsRef<Path>>(mesh: &IndexedMesh, path: P) -> IoResult<()> {
    crate::check_faces(mesh)?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_off(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_off<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", mesh.vertices.len(), mesh.faces.len())?;

    for v in &mesh.vertices {
        let [x, y, z] = v.to_array();
        writeln!(writer, "{x} {y} {z}")?;
    }
    for &[a, b, c] in &mesh.faces {
        writeln!(writer, "3 {a} {b} {c}")?;
    }

    Ok(())
}
