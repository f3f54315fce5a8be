//! Gaussian cube files to isosurface meshes.
//!
//! `cubeiso` reads a cube file, extracts the isosurface of its scalar field
//! with marching cubes, smooths it, writes it to a mesh file and infers the
//! molecule's bonds. The mesh file, atoms and bonds are what a rendering
//! host needs to draw the molecule and its density.
//!
//! # Crates
//!
//! | Module | Crate | Stage |
//! |--------|-------|-------|
//! | [`cube`] | `cube-file` | Cube file parser |
//! | [`isosurface`] | `mesh-isosurface` | Marching cubes |
//! | [`smooth`] | `mesh-smooth` | Laplacian smoothing |
//! | [`io`] | `mesh-io` | PLY, OBJ, STL and OFF export |
//! | [`bonds`] | `cube-bonds` | Bond inference |
//! | [`types`] | `mesh-types` | Shared mesh types |
//!
//! # Example
//!
//! ```no_run
//! use cubeiso::{InputFile, run};
//!
//! let input = InputFile::default();
//! let outcome = run("density.cube", &input).unwrap();
//!
//! println!("mesh at {}", outcome.mesh.path().display());
//! for bond in &outcome.bonds {
//!     let (i, j) = bond.pair();
//!     println!("{} - {}", outcome.atoms[i].symbol(), outcome.atoms[j].symbol());
//! }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;

mod artifact;
mod error;
mod pipeline;
mod surface;

pub use artifact::MeshArtifact;
pub use config::{CameraLocation, ConfigError, InputFile, RenderSettings};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineOutcome, run};
pub use surface::{SurfaceStatus, extract_surface};

pub use cube_bonds as bonds;
pub use cube_file as cube;
pub use mesh_io as io;
pub use mesh_isosurface as isosurface;
pub use mesh_smooth as smooth;
pub use mesh_types as types;

/// Common imports.
pub mod prelude {
    pub use crate::{InputFile, Pipeline, PipelineOutcome, SurfaceStatus};
    pub use cube_bonds::{Bond, BondConfig, BondSet};
    pub use cube_file::{Atom, CubeFile, LengthUnit};
    pub use mesh_io::Encoding;
    pub use mesh_types::{IndexedMesh, MeshBounds, MeshTopology};
}
