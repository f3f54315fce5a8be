//! Exported mesh file lifetime.

use std::path::{Path, PathBuf};

use mesh_io::MeshFormat;
use tracing::{debug, warn};

/// A mesh file written by the pipeline.
///
/// With `delete_on_drop` set the file is removed when the artifact is
/// dropped, after the rendering host has consumed it. Call
/// [`MeshArtifact::keep`] to leave it on disk.
#[derive(Debug)]
pub struct MeshArtifact {
    path: PathBuf,
    format: MeshFormat,
    delete_on_drop: bool,
}

impl MeshArtifact {
    pub(crate) fn new(path: PathBuf, format: MeshFormat, delete_on_drop: bool) -> Self {
        Self {
            path,
            format,
            delete_on_drop,
        }
    }

    /// Location of the mesh file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format the mesh was written in.
    #[must_use]
    pub fn format(&self) -> MeshFormat {
        self.format
    }

    /// Whether the file is removed on drop.
    #[must_use]
    pub fn deletes_on_drop(&self) -> bool {
        self.delete_on_drop
    }

    /// Keep the file after the artifact is dropped and return its path.
    pub fn keep(mut self) -> PathBuf {
        self.delete_on_drop = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for MeshArtifact {
    fn drop(&mut self) {
        if !self.delete_on_drop {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed mesh file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove mesh file"),
        }
    }
}
