//! Pipeline errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A stage of the pipeline failed.
///
/// An isosurface that cannot be extracted is not an error; see
/// [`SurfaceStatus`](crate::SurfaceStatus).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The settings are invalid.
    #[error("invalid settings")]
    Config(#[from] ConfigError),

    /// The cube file could not be read or parsed.
    #[error("failed to read cube file {path}")]
    Cube {
        /// Cube file path.
        path: PathBuf,
        /// Parse or I/O error, with line context.
        #[source]
        source: cube_file::CubeError,
    },

    /// The mesh could not be written.
    #[error("failed to export mesh to {path}")]
    Export {
        /// Mesh file path.
        path: PathBuf,
        /// Format or I/O error.
        #[source]
        source: mesh_io::IoError,
    },
}
