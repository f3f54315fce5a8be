//! PLY (Polygon File Format) support.
//!
//! ASCII files are written through `ply-rs` with double-precision vertex
//! coordinates. Binary files are little-endian with `float` coordinates and
//! `int` indices, written by hand.
//!
//! The loader accepts ASCII, binary little-endian and binary big-endian
//! files. Polygons with more than three corners are fan-triangulated.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding as PlyEncoding, Ply, Property, PropertyDef,
    PropertyType, ScalarType,
};
use ply_rs::writer::Writer;

use crate::error::{IoError, IoResult, open};

const COMMENT: &str = "cubeiso isosurface";

/// Load a mesh from a PLY file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file is not valid PLY
/// - A vertex lacks an `x`, `y` or `z` property
/// - A face index is negative
pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let mut reader = BufReader::new(open(path.as_ref())?);

    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = IndexedMesh::new();

    if let Some(vertex_elements) = payload.get("vertex") {
        mesh.vertices.reserve(vertex_elements.len());
        for (i, element) in vertex_elements.iter().enumerate() {
            let coord = |key: &str| {
                scalar(element, key).ok_or_else(|| {
                    IoError::invalid_content(format!("vertex {i} has no numeric '{key}'"))
                })
            };
            mesh.vertices
                .push(Vertex::from_coords(coord("x")?, coord("y")?, coord("z")?));
        }
    }

    if let Some(face_elements) = payload.get("face") {
        mesh.faces.reserve(face_elements.len());
        for (i, element) in face_elements.iter().enumerate() {
            let indices = index_list(element)
                .ok_or_else(|| IoError::invalid_content(format!("face {i} has invalid indices")))?;
            for k in 1..indices.len().saturating_sub(1) {
                mesh.faces.push([indices[0], indices[k], indices[k + 1]]);
            }
        }
    }

    Ok(mesh)
}

/// Numeric scalar property widened to `f64`.
fn scalar(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Face corner indices under `vertex_indices` or `vertex_index`.
///
/// `None` when a signed index is negative.
fn index_list(element: &DefaultElement) -> Option<Vec<u32>> {
    let prop = element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))?;

    match prop {
        Property::ListInt(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListShort(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListChar(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListUShort(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file.
///
/// With `binary` the file is little-endian binary, otherwise ASCII.
///
/// # Errors
///
/// Returns an error if a face references a missing vertex, the mesh has
/// more than `i32::MAX` vertices, or the file cannot be written.
pub fn save_ply<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, binary: bool) -> IoResult<()> {
    crate::check_faces(mesh)?;
    if i32::try_from(mesh.vertices.len()).is_err() {
        return Err(IoError::TooLarge(format!(
            "PLY int indices cannot address {} vertices",
            mesh.vertices.len()
        )));
    }

    let mut writer = BufWriter::new(File::create(path)?);

    if binary {
        write_binary(mesh, &mut writer)?;
    } else {
        write_ascii(mesh, &mut writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Binary little-endian PLY.
///
/// Written by hand because ply-rs writes the element count instead of the
/// list length for binary list properties.
fn write_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment {COMMENT}")?;
    writeln!(writer, "element vertex {}", mesh.vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", mesh.faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        for coord in v.to_array() {
            #[allow(clippy::cast_possible_truncation)]
            let single = coord as f32;
            writer.write_all(&single.to_le_bytes())?;
        }
    }

    for face in &mesh.faces {
        writer.write_all(&[3u8])?;
        for &index in face {
            // vertex count was checked against i32::MAX
            #[allow(clippy::cast_possible_wrap)]
            let signed = index as i32;
            writer.write_all(&signed.to_le_bytes())?;
        }
    }

    Ok(())
}

/// ASCII PLY through ply-rs.
fn write_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = PlyEncoding::Ascii;
    ply.header.comments.push(COMMENT.to_string());

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for axis in ["x", "y", "z"] {
        vertex_def.properties.add(PropertyDef::new(
            axis.to_string(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    vertex_def.count = mesh.vertices.len();
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    face_def.count = mesh.faces.len();
    ply.header.elements.add(face_def);

    let vertex_elements = mesh
        .vertices
        .iter()
        .map(|v| {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Double(v.position.x));
            element.insert("y".to_string(), Property::Double(v.position.y));
            element.insert("z".to_string(), Property::Double(v.position.z));
            element
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertex_elements);

    let face_elements = mesh
        .faces
        .iter()
        .map(|face| {
            let mut element = DefaultElement::new();
            #[allow(clippy::cast_possible_wrap)]
            let indices = face.iter().map(|&i| i as i32).collect();
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            element
        })
        .collect();
    ply.payload.insert("face".to_string(), face_elements);

    Writer::new()
        .write_ply(writer, &mut ply)
        .map_err(|e| IoError::invalid_content(format!("failed to write PLY: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{MeshTopology, unit_cube};

    #[test]
    fn binary_reloads_within_f32_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.ply");

        let mut original = unit_cube();
        original.translate([-5.291_77, 0.25, 12.5].into());
        save_ply(&original, &path, true).unwrap();

        let loaded = load_ply(&path).unwrap();
        assert_eq!(loaded.faces, original.faces);
        for (a, b) in original.vertices.iter().zip(&loaded.vertices) {
            assert_relative_eq!(a.position, b.position, epsilon = 1e-5);
        }
    }

    #[test]
    fn ascii_is_text_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.ply");
        save_ply(&unit_cube(), &path, false).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ply\nformat ascii 1.0\n"));
        assert!(text.contains("element vertex 8"));
        assert!(text.contains("element face 12"));

        let loaded = load_ply(&path).unwrap();
        assert_eq!(loaded.vertex_count(), 8);
        assert_eq!(loaded.faces, unit_cube().faces);
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\n\
             property float z\nelement face 1\nproperty list uchar int vertex_indices\n\
             end_header\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n",
        )
        .unwrap();

        let mesh = load_ply(&path).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn missing_coordinate_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\n\
             end_header\n0 0\n",
        )
        .unwrap();

        assert!(matches!(load_ply(&path), Err(IoError::InvalidContent { .. })));
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_ply("nonexistent_file_12345.ply");
        match result {
            Err(IoError::FileNotFound { path }) => {
                assert!(path.to_string_lossy().contains("nonexistent"));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }
}
