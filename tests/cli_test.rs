//! Exit codes and diagnostics of the hmapper binary

extern crate std;

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::{OutputImage, SampleData, SourceTiff};

fn hmapper(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hmapper"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir).unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_wrong_argument_count_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    let none = hmapper(dir.path(), &[]);
    std::assert_eq!(none.status.code(), Some(2));

    let only_input = hmapper(dir.path(), &["missing.tif"]);
    std::assert_eq!(only_input.status.code(), Some(2));

    let too_many = hmapper(dir.path(), &["a.tif", "b.tif", "c.tif"]);
    std::assert_eq!(too_many.status.code(), Some(2));
    std::assert!(!stderr(&too_many).is_empty());

    // Rejected before any file is touched
    std::assert!(entries(dir.path()).is_empty());
}

#[test]
fn test_successful_conversion_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    SourceTiff::new(2, 1, SampleData::U16(vec![1, 65535])).write_to(&dir.path().join("dem.tif"));

    let output = hmapper(dir.path(), &["-q", "dem.tif", "heightmap.tif"]);
    std::assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let image = OutputImage::read(&dir.path().join("heightmap.tif"));
    std::assert_eq!(image.pixel_list(), vec![[0, 0, 1], [0, 255, 255]]);
}

#[test]
fn test_missing_input_exits_one_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();

    let output = hmapper(dir.path(), &["-q", "missing.tif", "heightmap.tif"]);
    std::assert_eq!(output.status.code(), Some(1));
    std::assert!(stderr(&output).contains("Error (I/O failure)"), "{}", stderr(&output));
    std::assert_eq!(entries(dir.path()), Vec::<String>::new());
}

#[test]
fn test_unsupported_source_exits_one_and_names_the_kind() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = SourceTiff::new(1, 1, SampleData::U32(vec![5]));
    source.sample_format = Some(6);
    source.write_to(&dir.path().join("complex.tif"));

    let output = hmapper(dir.path(), &["-q", "complex.tif", "heightmap.tif"]);
    std::assert_eq!(output.status.code(), Some(1));
    std::assert!(stderr(&output).contains("Error (unsupported format)"), "{}", stderr(&output));
    std::assert!(!dir.path().join("heightmap.tif").exists());
}

#[test]
fn test_invalid_option_value_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = hmapper(dir.path(), &["--compression", "lzw", "in.tif", "out.tif"]);
    std::assert_eq!(output.status.code(), Some(2));
}
