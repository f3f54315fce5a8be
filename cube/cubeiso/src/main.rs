//! `cubeiso` command line tool.
//!
//! ```text
//! cubeiso water.cube --input settings.json --output water.ply
//! ```
//!
//! Nothing downstream reads the mesh, so it is kept regardless of the
//! input file's `deleteOBJFile` unless `--delete` is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cubeiso::io::Encoding;
use cubeiso::{InputFile, Pipeline, SurfaceStatus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Extract the isosurface of a Gaussian cube file
#[derive(Parser)]
#[command(name = "cubeiso")]
#[command(about = "Extract the isosurface of a Gaussian cube file", long_about = None)]
#[command(version)]
struct Cli {
    /// The cube file to read
    #[arg(name = "CUBE")]
    cube: PathBuf,

    /// JSON input file; defaults apply when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the mesh here instead of the input file's pathToOBJFile
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Mesh encoding for formats that have a binary variant
    #[arg(long, value_enum, default_value = "ascii")]
    encoding: EncodingArg,

    /// Remove the mesh file once the run is reported
    #[arg(long)]
    delete: bool,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Ascii,
    Binary,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Ascii => Self::Ascii,
            EncodingArg::Binary => Self::Binary,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut input = match &cli.input {
        Some(path) => InputFile::load(path)
            .with_context(|| format!("could not load input file {}", path.display()))?,
        None => InputFile::default(),
    };
    if let Some(output) = cli.output {
        input.path_to_obj_file = output;
    }
    input.delete_obj_file = cli.delete;

    let outcome = Pipeline::new(input)
        .with_encoding(cli.encoding.into())
        .run(&cli.cube)
        .with_context(|| format!("could not process {}", cli.cube.display()))?;

    if let SurfaceStatus::Empty { reason } = &outcome.surface {
        warn!(%reason, "Mesh is empty");
    }

    info!(
        mesh = %outcome.mesh.path().display(),
        unit = %outcome.unit,
        atoms = outcome.atoms.len(),
        bonds = outcome.bonds.len(),
        camera = %outcome.render.camera,
        "Done"
    );

    for bond in &outcome.bonds {
        let (i, j) = bond.pair();
        println!(
            "{}{} - {}{}",
            outcome.atoms[i].symbol(),
            i + 1,
            outcome.atoms[j].symbol(),
            j + 1
        );
    }

    Ok(())
}
