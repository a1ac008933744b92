use approx::assert_relative_eq;
use meshalign_core::{load_mesh, pipeline, AlignJob, Error, Mesh, Transform};
use nalgebra::Vector3;
use std::fs;
use std::path::Path;

const PARAMS: &str = "
VEHICLE_1:
  subfolder: sedan
  name: sedan
  scale: true
  scale_factor: 2.0
  rotate_angle: 90.0
VEHICLE_2:
  subfolder: truck
  name: truck
  scale: false
  rotate_angle: [0, 0, 90]
VEHICLE_3:
  subfolder: van
  name: van
  rotate_angle: sideways
";

/// A long box (4 x 1 x 2) floating away from the origin, split into two OBJ objects
const SEDAN_OBJ: &str = "\
o cabin
v 10 5 20
v 14 5 20
v 14 6 20
v 10 6 20
f 1 2 3 4
o chassis
v 10 5 22
v 14 5 22
v 14 6 22
v 10 6 22
f 5 6 7 8
";

fn write_fixture(root: &Path) {
    fs::write(root.join("params.yaml"), PARAMS).unwrap();
    fs::create_dir_all(root.join("sedan")).unwrap();
    fs::write(root.join("sedan/sedan.obj"), SEDAN_OBJ).unwrap();
}

fn assert_grounded(mesh: &Mesh) {
    let bounds = mesh.bounds();
    assert_relative_eq!(bounds.min.x + bounds.max.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.min.z + bounds.max.z, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-9);
}

#[test]
fn aligns_scales_and_exports_obj() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let job = AlignJob::new(dir.path().join("params.yaml"), dir.path(), "VEHICLE_1");
    let aligned = pipeline::run(&job).unwrap();

    assert_eq!(aligned.output, dir.path().join("sedan/sedan_aligned.obj"));
    assert_eq!(aligned.mesh.vertices.len(), 8);
    assert_eq!(aligned.mesh.faces.len(), 4);
    assert_grounded(&aligned.mesh);

    // Scaled x2 then turned 90 degrees about Y: X and Z extents swap
    assert_relative_eq!(aligned.dimensions.width, 4.0, epsilon = 1e-9);
    assert_relative_eq!(aligned.dimensions.height, 2.0, epsilon = 1e-9);
    assert_relative_eq!(aligned.dimensions.length, 8.0, epsilon = 1e-9);

    let reloaded = load_mesh(&aligned.output).unwrap();
    assert_eq!(reloaded.faces.len(), aligned.mesh.faces.len());
    assert_grounded(&reloaded);
}

#[test]
fn exports_stl_when_suffix_is_stl() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let mut source = Mesh::cube(3.0);
    source.translate(&Vector3::new(-5.0, 8.0, 1.0));
    fs::create_dir_all(dir.path().join("truck")).unwrap();
    meshalign_core::save_mesh(&source, &dir.path().join("truck/truck.stl")).unwrap();

    let job = AlignJob::new(dir.path().join("params.yaml"), dir.path(), "VEHICLE_2")
        .with_suffix(".stl")
        .with_unit_divisor(1.0);
    let aligned = pipeline::run(&job).unwrap();

    assert_eq!(aligned.output, dir.path().join("truck/truck_aligned.stl"));
    let reloaded = load_mesh(&aligned.output).unwrap();
    assert_eq!(reloaded.faces.len(), 12);
    assert_grounded(&reloaded);
    assert_relative_eq!(reloaded.bounds().max.y, 3.0, epsilon = 1e-5);
}

#[test]
fn malformed_rotation_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::create_dir_all(dir.path().join("van")).unwrap();

    let mut source = Mesh::cube(1.0);
    source.apply_transform(&Transform::translation_matrix(Vector3::new(3.0, 3.0, 3.0)));
    meshalign_core::save_mesh(&source, &dir.path().join("van/van.obj")).unwrap();

    let job = AlignJob::new(dir.path().join("params.yaml"), dir.path(), "VEHICLE_3");
    let aligned = pipeline::run(&job).unwrap();

    assert_grounded(&aligned.mesh);
    assert_relative_eq!(aligned.dimensions.width, 1.0, epsilon = 1e-9);
}

#[test]
fn missing_mesh_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let job = AlignJob::new(dir.path().join("params.yaml"), dir.path(), "VEHICLE_2");
    let err = pipeline::run(&job).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
    assert!(!dir.path().join("truck/truck_aligned.obj").exists());
}

#[test]
fn missing_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let job = AlignJob::new(dir.path().join("nope.yaml"), dir.path(), "VEHICLE_1");
    assert!(matches!(
        pipeline::run(&job),
        Err(Error::FileNotFound { .. })
    ));
}

#[test]
fn shipped_demo_aligns() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("demo")).unwrap();
    fs::write(
        dir.path().join("demo/block_car.obj"),
        include_str!("../../vehicle_models/demo/block_car.obj"),
    )
    .unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        include_str!("../../params/mesh_align_params.yaml"),
    )
    .unwrap();

    let job = AlignJob::new(dir.path().join("params.yaml"), dir.path(), "VEHICLE_1");
    let aligned = pipeline::run(&job).unwrap();

    assert_eq!(aligned.mesh.vertices.len(), 16);
    assert_eq!(aligned.mesh.faces.len(), 24);
    assert_grounded(&aligned.mesh);

    // 4 x 1.5 x 1.8 car, scaled x10 and turned a quarter about Y
    assert_relative_eq!(aligned.dimensions.width, 18.0, epsilon = 1e-9);
    assert_relative_eq!(aligned.dimensions.height, 15.0, epsilon = 1e-9);
    assert_relative_eq!(aligned.dimensions.length, 40.0, epsilon = 1e-9);

    let (width, length, height) = aligned.dimensions.in_units(10.0);
    assert_relative_eq!(width, 1.8, epsilon = 1e-9);
    assert_relative_eq!(length, 4.0, epsilon = 1e-9);
    assert_relative_eq!(height, 1.5, epsilon = 1e-9);
}
