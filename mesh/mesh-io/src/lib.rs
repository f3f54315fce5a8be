//! Mesh file I/O for cubeiso.
//!
//! Extracted isosurfaces are handed to renderers and viewers as files. This
//! crate writes (and reads back) triangle meshes in the common interchange
//! formats:
//!
//! - **PLY** (Polygon File Format) - ASCII or binary little-endian
//! - **OBJ** (Wavefront) - ASCII only
//! - **STL** (Stereolithography) - ASCII or binary
//! - **OFF** (Object File Format) - ASCII only
//!
//! The format is chosen from the file extension. [`Encoding::Ascii`] gives a
//! human-readable, diffable file for every format; [`Encoding::Binary`] is
//! honoured by PLY and STL and ignored by the text-only formats.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{Encoding, load_mesh, save_mesh};
//! use mesh_types::unit_cube;
//!
//! save_mesh(&unit_cube(), "/tmp/cube.ply", Encoding::Binary).unwrap();
//! let mesh = load_mesh("/tmp/cube.ply").unwrap();
//! assert_eq!(mesh.faces.len(), 12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod obj;
mod off;
mod ply;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::{load_obj, save_obj};
pub use off::{load_off, save_off};
pub use ply::{load_ply, save_ply};
pub use stl::{load_stl, save_stl};

use std::fmt;
use std::path::Path;

use mesh_types::IndexedMesh;
use tracing::info;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// PLY (Polygon File Format).
    Ply,
    /// OBJ (Wavefront), ASCII only.
    Obj,
    /// STL (Stereolithography).
    Stl,
    /// OFF (Object File Format), ASCII only.
    Off,
}

impl MeshFormat {
    /// Detect format from file extension, case-insensitively.
    ///
    /// Returns `None` if the extension is missing or not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "ply" => Some(Self::Ply),
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), but reports the offending
    /// extension.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] when the extension is missing or unknown.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Ply => "ply",
            Self::Obj => "obj",
            Self::Stl => "stl",
            Self::Off => "off",
        }
    }

    /// Whether the format has a binary variant.
    #[must_use]
    pub const fn supports_binary(&self) -> bool {
        matches!(self, Self::Ply | Self::Stl)
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Text or binary output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Human-readable text.
    Ascii,
    /// Compact binary (little-endian where applicable).
    #[default]
    Binary,
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    match MeshFormat::detect(path)? {
        MeshFormat::Ply => load_ply(path),
        MeshFormat::Obj => load_obj(path),
        MeshFormat::Stl => load_stl(path),
        MeshFormat::Off => load_off(path),
    }
}

/// Save a mesh to a file, detecting format from extension.
///
/// Returns the format that was written.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - A face references a missing vertex
/// - The file cannot be written
///
/// # Example
///
/// ```no_run
/// use mesh_io::{Encoding, MeshFormat, save_mesh};
/// use mesh_types::unit_cube;
///
/// let format = save_mesh(&unit_cube(), "cube.obj", Encoding::Ascii).unwrap();
/// assert_eq!(format, MeshFormat::Obj);
/// ```
pub fn save_mesh<P: AsRef<Path>>(
    mesh: &IndexedMesh,
    path: P,
    encoding: Encoding,
) -> IoResult<MeshFormat> {
    let path = path.as_ref();
    let format = MeshFormat::detect(path)?;
    let binary = encoding == Encoding::Binary && format.supports_binary();

    match format {
        MeshFormat::Ply => save_ply(mesh, path, binary)?,
        MeshFormat::Obj => save_obj(mesh, path)?,
        MeshFormat::Stl => save_stl(mesh, path, binary)?,
        MeshFormat::Off => save_off(mesh, path)?,
    }

    info!(
        path = %path.display(),
        %format,
        binary,
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "Saved mesh"
    );

    Ok(format)
}

/// Reject meshes whose faces point past the vertex list.
pub(crate) fn check_faces(mesh: &IndexedMesh) -> IoResult<()> {
    match mesh.first_invalid_face() {
        Some(face) => Err(IoError::InvalidMesh {
            face,
            vertex_count: mesh.vertices.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{MeshTopology, Vertex, unit_cube};

    #[test]
    fn format_from_path() {
        assert_eq!(MeshFormat::from_path("surface.ply"), Some(MeshFormat::Ply));
        assert_eq!(MeshFormat::from_path("surface.PLY"), Some(MeshFormat::Ply));
        assert_eq!(MeshFormat::from_path("/tmp/tmp.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("a.Stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("a.off"), Some(MeshFormat::Off));
    }

    #[test]
    fn format_from_path_unknown() {
        assert_eq!(MeshFormat::from_path("model.3mf"), None);
        assert_eq!(MeshFormat::from_path("model"), None);
        assert_eq!(MeshFormat::from_path(""), None);
    }

    #[test]
    fn detect_reports_extension() {
        match MeshFormat::detect("density.cube") {
            Err(IoError::UnsupportedFormat { extension }) => assert_eq!(extension, "cube"),
            other => panic!("unexpected {other:?}"),
        }
        match MeshFormat::detect("noext") {
            Err(IoError::UnsupportedFormat { extension }) => assert_eq!(extension, "(none)"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn binary_only_where_supported() {
        assert!(MeshFormat::Ply.supports_binary());
        assert!(MeshFormat::Stl.supports_binary());
        assert!(!MeshFormat::Obj.supports_binary());
        assert!(!MeshFormat::Off.supports_binary());
        assert_eq!(Encoding::default(), Encoding::Binary);
    }

    #[test]
    fn save_rejects_unknown_extension_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.xyz");

        let err = save_mesh(&unit_cube(), &path, Encoding::Ascii).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn save_rejects_dangling_faces() {
        let dir = tempfile::tempdir().unwrap();
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 99]);

        let err = save_mesh(&mesh, dir.path().join("bad.obj"), Encoding::Ascii).unwrap_err();
        assert!(matches!(err, IoError::InvalidMesh { face: 12, vertex_count: 8 }));
    }

    #[test]
    fn every_format_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let cube = unit_cube();

        for (name, encoding) in [
            ("a.ply", Encoding::Ascii),
            ("b.ply", Encoding::Binary),
            ("c.obj", Encoding::Ascii),
            ("d.stl", Encoding::Ascii),
            ("e.stl", Encoding::Binary),
            ("f.off", Encoding::Ascii),
        ] {
            let path = dir.path().join(name);
            save_mesh(&cube, &path, encoding).unwrap();
            let loaded = load_mesh(&path).unwrap();
            assert_eq!(loaded.face_count(), 12, "{name}");
        }
    }

    #[test]
    fn empty_mesh_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(1.0, 2.0, 3.0));

        let path = dir.path().join("empty.obj");
        save_mesh(&mesh, &path, Encoding::Ascii).unwrap();
        let loaded = load_mesh(&path).unwrap();
        assert_eq!(loaded.vertex_count(), 1);
        assert_eq!(loaded.face_count(), 0);
    }
}
