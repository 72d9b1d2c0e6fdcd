mod util;

use nifti_reshape::{NiftiType, ScalarVolume4, VectorVolume, WriterOptions};
use pretty_assertions::assert_eq;
use std::process::Command;

use util::{coordinate_sum_field, get_temporary_path};

const IMG3D_TO_4D: &str = env!("CARGO_BIN_EXE_img3d-to-4d");
const IMG4D_TO_3D: &str = env!("CARGO_BIN_EXE_img4d-to-3d");

#[test]
fn both_tools_convert() {
    let (_dir, field_path) = get_temporary_path("field.nii.gz");
    let series_path = field_path.with_file_name("series.nii.gz");
    let back_path = field_path.with_file_name("back.nii.gz");

    let field = coordinate_sum_field::<f64>();
    WriterOptions::new(&field_path)
        .write_vector_volume(&field)
        .unwrap();

    let status = Command::new(IMG3D_TO_4D)
        .arg(&field_path)
        .arg(&series_path)
        .status()
        .unwrap();
    assert!(status.success());

    let series = ScalarVolume4::<f64>::from_file(&series_path).unwrap();
    assert_eq!(series.geometry().size, [4, 4, 4, 3]);
    assert_eq!(series.get([1, 2, 3, 2]), 8.);

    let status = Command::new(IMG4D_TO_3D)
        .args(&["-q"])
        .arg(&series_path)
        .arg(&back_path)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(VectorVolume::<f64>::from_file(&back_path).unwrap(), field);
}

#[test]
fn unknown_component_type_fails() {
    let (_dir, path) = get_temporary_path("rgb.nii");
    let out_path = path.with_file_name("out.nii");
    let header = util::scalar_header([3, 2, 2, 2, 1, 1, 1, 1], NiftiType::Rgb24);
    util::write_single_file(&path, &header, &[0; 24]);

    for tool in &[IMG3D_TO_4D, IMG4D_TO_3D] {
        let output = Command::new(tool)
            .arg(&path)
            .arg(&out_path)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("unknown component type"), "stderr: {}", stderr);
        assert!(!out_path.exists());
    }
}

#[test]
fn missing_input_fails() {
    let (_dir, path) = get_temporary_path("nope.nii");
    let out_path = path.with_file_name("out.nii");
    let output = Command::new(IMG3D_TO_4D)
        .arg(&path)
        .arg(&out_path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
    assert!(!out_path.exists());
}

#[test]
fn usage() {
    let output = Command::new(IMG4D_TO_3D).output().unwrap();
    assert!(!output.status.success());

    let output = Command::new(IMG4D_TO_3D).arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("OUTPUT"));
}
