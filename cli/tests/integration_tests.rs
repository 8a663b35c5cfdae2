use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use prost::Message;
use prost_types::source_code_info::Location;
use prost_types::{FileDescriptorProto, FileDescriptorSet, FileOptions, SourceCodeInfo};
use protomod_image::{Image, ImageFile};
use tempfile::TempDir;

fn protomod(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protomod"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run protomod")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn proto_file(name: &str, package: &str, deps: &[&str]) -> ImageFile {
    ImageFile::new(FileDescriptorProto {
        name: Some(name.to_string()),
        package: (!package.is_empty()).then(|| package.to_string()),
        dependency: deps.iter().map(|d| d.to_string()).collect(),
        options: Some(FileOptions {
            go_package: Some("old".to_string()),
            ..Default::default()
        }),
        source_code_info: Some(SourceCodeInfo {
            location: vec![
                Location { path: vec![8], ..Default::default() },
                Location {
                    path: vec![8, 11],
                    leading_comments: Some(" stale\n".to_string()),
                    ..Default::default()
                },
            ],
        }),
        ..Default::default()
    })
}

/// Writes a two-file image plus a well-known import.
fn write_image(dir: &TempDir) -> PathBuf {
    let image = Image::new(vec![
        ImageFile::new(FileDescriptorProto {
            name: Some("google/protobuf/empty.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            ..Default::default()
        }),
        proto_file(
            "weather/v1alpha1/weather.proto",
            "weather.v1alpha1",
            &["google/protobuf/empty.proto"],
        ),
        proto_file("geo/geo.proto", "geo", &["weather/v1alpha1/weather.proto"]),
    ])
    .unwrap();
    let path = dir.path().join("image.bin");
    image.write(&path).unwrap();
    path
}

fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("managed.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

fn read_set(path: &Path) -> FileDescriptorSet {
    FileDescriptorSet::decode(fs::read(path).unwrap().as_slice()).unwrap()
}

#[test]
fn modify_rewrites_go_package_and_sweeps_comments() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);
    let config = write_config(&dir, "go_package:\n  prefix: github.com/org/repo\n");
    let output = dir.path().join("out.bin");

    let result = protomod(&[
        "modify",
        "--image",
        path_arg(&image),
        "--config",
        path_arg(&config),
        "--output",
        path_arg(&output),
        "--jobs",
        "2",
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Files: 3"), "{stdout}");
    assert!(stdout.contains("Touched: 2"), "{stdout}");

    let set = read_set(&output);
    assert!(set.file[0].options.is_none());
    assert_eq!(
        set.file[1].options.as_ref().unwrap().go_package(),
        "github.com/org/repo/weather/v1alpha1;weatherv1alpha1"
    );
    assert_eq!(set.file[2].options.as_ref().unwrap().go_package(), "github.com/org/repo/geo");
    for file in &set.file[1..] {
        let paths: Vec<&[i32]> = file
            .source_code_info
            .as_ref()
            .unwrap()
            .location
            .iter()
            .map(|l| l.path.as_slice())
            .collect();
        assert_eq!(paths, vec![&[8][..]]);
    }
}

#[test]
fn modify_second_pass_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");

    for (input, output) in [(&image, &first), (&first, &second)] {
        let result = protomod(&[
            "modify",
            "--image",
            path_arg(input),
            "--output",
            path_arg(output),
            "--go-package-prefix",
            "github.com/org/repo",
        ]);
        assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
        if output == &second {
            assert!(String::from_utf8_lossy(&result.stdout).contains("Touched: 0"));
        }
    }
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn modify_flag_prefix_replaces_config_prefix() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);
    let config = write_config(
        &dir,
        "go_package:\n  prefix: example.com/ignored\n  overrides:\n    geo/geo.proto: geopb\n",
    );
    let output = dir.path().join("out.bin");

    let result = protomod(&[
        "modify",
        "--image",
        path_arg(&image),
        "--config",
        path_arg(&config),
        "--output",
        path_arg(&output),
        "--go-package-prefix",
        "github.com/org/repo",
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let set = read_set(&output);
    assert_eq!(set.file[2].options.as_ref().unwrap().go_package(), "github.com/org/repo/geo;geopb");
}

#[test]
fn modify_invalid_prefix_fails() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);
    let output = dir.path().join("out.bin");

    let result = protomod(&[
        "modify",
        "--image",
        path_arg(&image),
        "--output",
        path_arg(&output),
        "--go-package-prefix",
        "/absolute",
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("error:"));
    assert!(!output.exists());
}

#[test]
fn modify_without_any_option_fails() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);
    let config = write_config(&dir, "version: \"1.0\"\n");

    let result = protomod(&[
        "modify",
        "--image",
        path_arg(&image),
        "--config",
        path_arg(&config),
        "--output",
        path_arg(&dir.path().join("out.bin")),
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Nothing to modify"));
}

#[test]
fn modify_rejects_zero_jobs() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);

    let result = protomod(&[
        "modify",
        "--image",
        path_arg(&image),
        "--output",
        path_arg(&dir.path().join("out.bin")),
        "--go-package-prefix",
        "github.com/org/repo",
        "--jobs",
        "0",
    ]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("jobs"));
}

#[test]
fn inspect_prints_options_as_json() {
    let dir = TempDir::new().unwrap();
    let image = write_image(&dir);

    let result = protomod(&["inspect", "--image", path_arg(&image)]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let files = summary["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0]["well_known"], true);
    assert_eq!(files[1]["path"], "weather/v1alpha1/weather.proto");
    assert_eq!(files[1]["options"]["go_package"], "old");
}

#[test]
fn inspect_missing_image_fails() {
    let dir = TempDir::new().unwrap();
    let result = protomod(&["inspect", "--image", path_arg(&dir.path().join("nope.bin"))]);
    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to read image"));
}
