//! End-to-end runs on a synthetic water density.

mod common;

use std::path::PathBuf;

use cubeiso::bonds::Bond;
use cubeiso::cube::{CubeError, CubeFile, LengthUnit};
use cubeiso::io::{IoError, MeshFormat, load_mesh};
use cubeiso::isosurface::IsosurfaceError;
use cubeiso::types::{MeshBounds, MeshTopology};
use cubeiso::{
    ConfigError, InputFile, Pipeline, PipelineError, SurfaceStatus, extract_surface, run,
};

fn input(mesh: PathBuf) -> InputFile {
    InputFile {
        isosurface_value: 0.05,
        path_to_obj_file: mesh,
        delete_obj_file: false,
        ..InputFile::default()
    }
}

#[test]
fn water_produces_surface_and_bonds() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());
    let outcome = run(&cube, &input(dir.path().join("water.ply"))).unwrap();

    assert_eq!(outcome.surface, SurfaceStatus::Surface);
    assert_eq!(outcome.unit, LengthUnit::Bohr);
    assert_eq!(outcome.atoms.len(), 3);
    assert_eq!(outcome.smoothing.iterations_performed, 1);
    assert_eq!(outcome.mesh.format(), MeshFormat::Ply);

    let bonds: Vec<_> = outcome.bonds.iter().map(Bond::pair).collect();
    assert_eq!(bonds, [(0, 1), (0, 2)]);

    let mesh = load_mesh(outcome.mesh.path()).unwrap();
    assert!(mesh.face_count() > 100);
    assert!(mesh.is_watertight());

    // recentred into the atoms' frame
    let bounds = mesh.bounds();
    for k in 0..3 {
        assert!(bounds.min[k] > -4.5 && bounds.max[k] < 4.5);
    }
    assert!(bounds.min.x < -0.369_757 && bounds.max.x > 0.739_512);
}

#[test]
fn zero_iterations_export_the_raw_surface() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());
    let settings = InputFile {
        filter_iterations: 0,
        ..input(dir.path().join("raw.obj"))
    };

    let outcome = run(&cube, &settings).unwrap();
    assert_eq!(outcome.smoothing.iterations_performed, 0);

    let parsed = CubeFile::open(&cube).unwrap();
    let (expected, _) = extract_surface(parsed.grid(), 0.05);
    let exported = load_mesh(outcome.mesh.path()).unwrap();

    assert_eq!(exported.faces, expected.faces);
    assert_eq!(exported.vertices, expected.vertices);
}

#[test]
fn mesh_is_deleted_unless_kept() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());

    let deleting = InputFile {
        delete_obj_file: true,
        ..input(dir.path().join("gone.obj"))
    };
    let outcome = run(&cube, &deleting).unwrap();
    let path = outcome.mesh.path().to_path_buf();
    assert!(path.exists());
    drop(outcome);
    assert!(!path.exists());

    let outcome = run(&cube, &deleting).unwrap();
    let kept = outcome.mesh.keep();
    assert!(kept.exists());
}

#[test]
fn level_outside_field_gives_empty_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());
    let settings = InputFile {
        isosurface_value: 100.0,
        ..input(dir.path().join("empty.obj"))
    };

    let outcome = run(&cube, &settings).unwrap();
    assert!(matches!(
        outcome.surface,
        SurfaceStatus::Empty {
            reason: IsosurfaceError::EmptyIsosurface { .. }
        }
    ));
    assert_eq!(load_mesh(outcome.mesh.path()).unwrap().face_count(), 0);
    assert_eq!(outcome.bonds.len(), 2);
}

#[test]
fn binary_stl_export() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());
    let outcome = Pipeline::new(input(dir.path().join("water.stl")))
        .with_encoding(cubeiso::io::Encoding::Binary)
        .run(&cube)
        .unwrap();

    let bytes = std::fs::read(outcome.mesh.path()).unwrap();
    assert!(!bytes.starts_with(b"solid"));
    assert!(load_mesh(outcome.mesh.path()).unwrap().face_count() > 100);
}

#[test]
fn errors_carry_context() {
    let dir = tempfile::tempdir().unwrap();
    let cube = common::write_water(dir.path());

    let err = run(&cube, &input(dir.path().join("mesh.xyz"))).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Export {
            source: IoError::UnsupportedFormat { .. },
            ..
        }
    ));

    let negative = InputFile {
        filter_iterations: -2,
        ..input(dir.path().join("mesh.obj"))
    };
    assert!(matches!(
        run(&cube, &negative),
        Err(PipelineError::Config(ConfigError::InvalidFilterIterations(-2)))
    ));

    let missing = dir.path().join("missing.cube");
    match run(&missing, &input(dir.path().join("mesh.obj"))) {
        Err(PipelineError::Cube { path, source }) => {
            assert_eq!(path, missing);
            assert!(matches!(source, CubeError::Io(_)));
        }
        other => panic!("expected a cube error, got {other:?}"),
    }
}
