//! JSON input file.
//!
//! Every key is optional; missing keys take their defaults and unknown keys
//! are ignored:
//!
//! ```json
//! {
//!     "filterIterations": 1,
//!     "isosurfaceValue": 0.001,
//!     "deleteOBJFile": true,
//!     "pathToOBJFile": "/tmp/tmp.obj",
//!     "focalLength": 25,
//!     "cameraLocation": "-y",
//!     "imagePath": "./cubeFileRender.png"
//! }
//! ```
//!
//! The misspelt `focalLenght` is accepted as well.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mesh_smooth::SmoothParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from reading or validating an input file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input file could not be read.
    #[error("failed to read input file {path}")]
    Read {
        /// Input file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The input file is not valid JSON or a value has the wrong type.
    #[error("failed to parse input file {path}")]
    Parse {
        /// Input file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// `filterIterations` is negative or too large.
    #[error("filterIterations must be a non-negative integer, got {0}")]
    InvalidFilterIterations(i64),

    /// `focalLength` is negative or too large.
    #[error("focalLength must be a non-negative integer, got {0}")]
    InvalidFocalLength(i64),

    /// `cameraLocation` is not one of the six axis directions.
    #[error("cameraLocation must be one of -x, +x, -y, +y, -z, +z, got '{0}'")]
    CameraLocation(String),

    /// Neither the path nor its parent directory exists.
    #[error("{key}: neither {path} nor its parent directory exists")]
    MissingDirectory {
        /// Offending key.
        key: &'static str,
        /// Configured path.
        path: PathBuf,
    },
}

/// Settings read from the JSON input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputFile {
    /// Smoothing rounds applied to the isosurface.
    ///
    /// Default: `1`
    pub filter_iterations: i64,

    /// Field value of the isosurface.
    ///
    /// Default: `0.001`
    pub isosurface_value: f64,

    /// Remove the exported mesh once the caller is done with it.
    ///
    /// Default: `true`
    #[serde(rename = "deleteOBJFile")]
    pub delete_obj_file: bool,

    /// Where the mesh is exported; the extension picks the format.
    ///
    /// Default: `/tmp/tmp.obj`
    #[serde(rename = "pathToOBJFile")]
    pub path_to_obj_file: PathBuf,

    /// Camera focal length in millimetres, passed to the renderer.
    ///
    /// Default: `25`
    #[serde(alias = "focalLenght")]
    pub focal_length: i64,

    /// Axis the camera looks from, passed to the renderer.
    ///
    /// Default: `-y`
    pub camera_location: String,

    /// Image the renderer writes.
    ///
    /// Default: `./cubeFileRender.png`
    pub image_path: PathBuf,
}

impl Default for InputFile {
    fn default() -> Self {
        Self {
            filter_iterations: 1,
            isosurface_value: 0.001,
            delete_obj_file: true,
            path_to_obj_file: PathBuf::from("/tmp/tmp.obj"),
            focal_length: 25,
            camera_location: "-y".to_string(),
            image_path: PathBuf::from("./cubeFileRender.png"),
        }
    }
}

impl InputFile {
    /// Read and validate an input file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
    /// cannot be loaded, and the errors of [`InputFile::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let input = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        input.validate()?;

        info!(path = %path.display(), "Read input file");
        debug!(?input, "Input settings");
        Ok(input)
    }

    /// Deserialize without validating.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed text or mistyped values.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check every value.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidFilterIterations`] for a negative count
    /// - [`ConfigError::InvalidFocalLength`] for a negative focal length
    /// - [`ConfigError::CameraLocation`] for an unknown camera axis
    /// - [`ConfigError::MissingDirectory`] when an output path has no
    ///   existing parent
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smooth_params()?;
        self.render_settings()?;
        check_path("pathToOBJFile", &self.path_to_obj_file)?;
        check_path("imagePath", &self.image_path)?;
        Ok(())
    }

    /// Smoothing parameters from `filterIterations`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidFilterIterations`] when the count is negative or
    /// exceeds `u32::MAX`.
    pub fn smooth_params(&self) -> Result<SmoothParams, ConfigError> {
        let iterations = u32::try_from(self.filter_iterations)
            .map_err(|_| ConfigError::InvalidFilterIterations(self.filter_iterations))?;
        Ok(SmoothParams::new().with_iterations(iterations))
    }

    /// Camera settings handed to the renderer.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidFocalLength`] or [`ConfigError::CameraLocation`].
    pub fn render_settings(&self) -> Result<RenderSettings, ConfigError> {
        let focal_length = u32::try_from(self.focal_length)
            .map_err(|_| ConfigError::InvalidFocalLength(self.focal_length))?;
        let camera = self.camera_location.parse()?;
        Ok(RenderSettings {
            focal_length,
            camera,
            image_path: self.image_path.clone(),
        })
    }
}

/// A path is usable when it exists or its parent directory does.
///
/// A bare file name refers to the working directory.
fn check_path(key: &'static str, path: &Path) -> Result<(), ConfigError> {
    let parent_exists = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => parent.exists(),
        None => false,
    };
    if path.exists() || parent_exists {
        Ok(())
    } else {
        Err(ConfigError::MissingDirectory {
            key,
            path: path.to_path_buf(),
        })
    }
}

/// Direction the camera looks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraLocation {
    /// On the negative x axis.
    NegX,
    /// On the positive x axis.
    PosX,
    /// On the negative y axis.
    NegY,
    /// On the positive y axis.
    PosY,
    /// On the negative z axis.
    NegZ,
    /// On the positive z axis.
    PosZ,
}

impl CameraLocation {
    /// All six locations.
    pub const ALL: [Self; 6] = [
        Self::NegX,
        Self::PosX,
        Self::NegY,
        Self::PosY,
        Self::NegZ,
        Self::PosZ,
    ];

    /// The `-x` / `+x` / ... spelling used in input files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NegX => "-x",
            Self::PosX => "+x",
            Self::NegY => "-y",
            Self::PosY => "+y",
            Self::NegZ => "-z",
            Self::PosZ => "+z",
        }
    }
}

impl FromStr for CameraLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::CameraLocation(s.to_string()))
    }
}

impl fmt::Display for CameraLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated camera settings for the rendering host.
///
/// The pipeline does not interpret these; they are handed on unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Focal length in millimetres.
    pub focal_length: u32,
    /// Camera direction.
    pub camera: CameraLocation,
    /// Output image path.
    pub image_path: PathBuf,
}
