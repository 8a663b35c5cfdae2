use prost_types::source_code_info::Location;
use prost_types::{FileDescriptorProto, FileOptions, SourceCodeInfo};
use protomod_image::{Image, ImageError, ImageFile};

fn weather_file() -> ImageFile {
    ImageFile::new(FileDescriptorProto {
        name: Some("weather/v1/weather.proto".into()),
        package: Some("weather.v1".into()),
        dependency: vec!["google/protobuf/timestamp.proto".into()],
        options: Some(FileOptions {
            go_package: Some("example.com/weather/v1".into()),
            ..Default::default()
        }),
        source_code_info: Some(SourceCodeInfo {
            location: vec![Location {
                path: vec![8, 11],
                span: vec![4, 0, 52],
                leading_comments: Some(" go package\n".into()),
                ..Default::default()
            }],
        }),
        ..Default::default()
    })
}

fn timestamp_file() -> ImageFile {
    ImageFile::new(FileDescriptorProto {
        name: Some("google/protobuf/timestamp.proto".into()),
        package: Some("google.protobuf".into()),
        ..Default::default()
    })
}

#[test]
fn test_write_then_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image.bin");

    let image = Image::new(vec![timestamp_file(), weather_file()]).unwrap();
    image.write(&path).unwrap();

    let loaded = Image::read(&path).unwrap();
    assert_eq!(loaded, image);
    let weather = loaded.file("weather/v1/weather.proto").unwrap();
    assert_eq!(weather.source_code_info().unwrap().location.len(), 1);
    assert_eq!(
        weather.options().unwrap().go_package(),
        "example.com/weather/v1"
    );
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Image::read(dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, ImageError::Io(_)));
}

#[test]
fn test_decoded_image_must_be_import_closed() {
    let partial = Image::new(vec![timestamp_file(), weather_file()])
        .unwrap()
        .to_file_descriptor_set();
    let mut set = partial;
    set.file.remove(0);

    let err = Image::decode(&prost::Message::encode_to_vec(&set)).unwrap_err();
    assert!(matches!(err, ImageError::MissingImport { .. }));
}

#[test]
fn test_strip_source_code_info_clears_every_file() {
    let mut image = Image::new(vec![timestamp_file(), weather_file()]).unwrap();
    image.strip_source_code_info();
    assert!(image.files().iter().all(|f| f.source_code_info().is_none()));
    assert!(image.files()[0].is_well_known());
    assert!(!image.files()[1].is_well_known());
}
