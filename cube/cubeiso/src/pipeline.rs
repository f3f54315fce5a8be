//! Cube file to mesh, atoms and bonds.

use std::path::Path;

use cube_bonds::{BondConfig, BondSet, infer_bonds};
use cube_file::{Atom, CubeFile, LengthUnit};
use mesh_io::{Encoding, save_mesh};
use mesh_smooth::{SmoothReport, smooth_simple};
use mesh_types::Vector3;
use tracing::info;

use crate::artifact::MeshArtifact;
use crate::config::{InputFile, RenderSettings};
use crate::error::{PipelineError, PipelineResult};
use crate::surface::{SurfaceStatus, extract_surface};

/// Everything handed to the rendering host.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The exported isosurface.
    pub mesh: MeshArtifact,
    /// Whether a surface was extracted.
    pub surface: SurfaceStatus,
    /// Smoothing statistics.
    pub smoothing: SmoothReport,
    /// Atoms in file order, positions in `unit`.
    pub atoms: Vec<Atom>,
    /// Inferred bonds between `atoms`.
    pub bonds: BondSet,
    /// Length unit of the atoms and the mesh.
    pub unit: LengthUnit,
    /// Extent of the sampled box.
    pub simulation_box: Vector3<f64>,
    /// Camera settings for the renderer.
    pub render: RenderSettings,
}

/// Configured pipeline.
///
/// # Example
///
/// ```no_run
/// use cubeiso::{InputFile, Pipeline};
/// use cubeiso::io::Encoding;
///
/// let input = InputFile::load("input.json").unwrap();
/// let outcome = Pipeline::new(input)
///     .with_encoding(Encoding::Binary)
///     .run("water.cube")
///     .unwrap();
/// println!("{} bonds", outcome.bonds.len());
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    input: InputFile,
    encoding: Encoding,
    bonds: BondConfig,
}

impl Pipeline {
    /// Pipeline with ASCII export and default bond parameters.
    #[must_use]
    pub fn new(input: InputFile) -> Self {
        Self {
            input,
            encoding: Encoding::Ascii,
            bonds: BondConfig::default(),
        }
    }

    /// Set the mesh encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the bond inference parameters.
    #[must_use]
    pub fn with_bond_config(mut self, bonds: BondConfig) -> Self {
        self.bonds = bonds;
        self
    }

    /// The input settings.
    #[must_use]
    pub fn input(&self) -> &InputFile {
        &self.input
    }

    /// Parse, extract, recentre, smooth, export, then infer bonds.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] when the settings fail validation
    /// - [`PipelineError::Cube`] when the cube file cannot be read
    /// - [`PipelineError::Export`] when the mesh cannot be written
    ///
    /// An isosurface that cannot be extracted is reported through
    /// [`PipelineOutcome::surface`] and exported as an empty mesh.
    pub fn run<P: AsRef<Path>>(&self, cube_path: P) -> PipelineResult<PipelineOutcome> {
        let cube_path = cube_path.as_ref();
        self.input.validate()?;
        let smooth = self.input.smooth_params()?;
        let render = self.input.render_settings()?;

        info!(path = %cube_path.display(), "Starting cube pipeline");

        let cube = CubeFile::open(cube_path).map_err(|source| PipelineError::Cube {
            path: cube_path.to_path_buf(),
            source,
        })?;
        let unit = cube.unit();
        let simulation_box = cube.grid().simulation_box_size();

        let (mut mesh, surface) = extract_surface(cube.grid(), self.input.isosurface_value);
        let smoothing = smooth_simple(&mut mesh, &smooth);

        let mesh_path = &self.input.path_to_obj_file;
        let format =
            save_mesh(&mesh, mesh_path, self.encoding).map_err(|source| PipelineError::Export {
                path: mesh_path.clone(),
                source,
            })?;
        let artifact = MeshArtifact::new(mesh_path.clone(), format, self.input.delete_obj_file);

        let (_, atoms) = cube.into_parts();
        let bonds = infer_bonds(&atoms, unit, &self.bonds);

        info!(
            mesh = %artifact.path().display(),
            faces = mesh.faces.len(),
            atoms = atoms.len(),
            bonds = bonds.len(),
            "Cube pipeline complete"
        );

        Ok(PipelineOutcome {
            mesh: artifact,
            surface,
            smoothing,
            atoms,
            bonds,
            unit,
            simulation_box,
            render,
        })
    }
}

/// Run the pipeline on `cube_path` with default export and bond settings.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn run<P: AsRef<Path>>(cube_path: P, input: &InputFile) -> PipelineResult<PipelineOutcome> {
    Pipeline::new(input.clone()).run(cube_path)
}
