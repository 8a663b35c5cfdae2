use prost_types::{FileDescriptorProto, FileOptions, SourceCodeInfo};

use crate::wkt::is_well_known_path;

/// One compiled schema file plus its optional source code info.
///
/// The file's identity is the descriptor's `name`, a canonical,
/// slash-separated path relative to the image root.
///
/// # Examples
///
/// ```
/// use protomod_image::ImageFile;
/// use prost_types::FileDescriptorProto;
///
/// let file = ImageFile::new(FileDescriptorProto {
///     name: Some("weather/v1/weather.proto".into()),
///     package: Some("weather.v1".into()),
///     ..Default::default()
/// });
/// assert_eq!(file.path(), "weather/v1/weather.proto");
/// assert_eq!(file.package(), "weather.v1");
/// assert!(file.options().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    descriptor: FileDescriptorProto,
}

impl ImageFile {
    /// Wraps a compiled file descriptor.
    pub fn new(descriptor: FileDescriptorProto) -> Self {
        Self { descriptor }
    }

    /// Canonical file path, unique within an image.
    pub fn path(&self) -> &str {
        self.descriptor.name()
    }

    /// Declared proto package, or `""` if the file has none.
    pub fn package(&self) -> &str {
        self.descriptor.package()
    }

    /// Paths this file imports.
    pub fn dependencies(&self) -> &[String] {
        &self.descriptor.dependency
    }

    /// Returns `true` if this file is one of the vendored well-known files.
    pub fn is_well_known(&self) -> bool {
        is_well_known_path(self.path())
    }

    /// The underlying descriptor.
    pub fn descriptor(&self) -> &FileDescriptorProto {
        &self.descriptor
    }

    /// Consumes the wrapper, returning the descriptor.
    pub fn into_descriptor(self) -> FileDescriptorProto {
        self.descriptor
    }

    /// The file's options block, if present.
    pub fn options(&self) -> Option<&FileOptions> {
        self.descriptor.options.as_ref()
    }

    /// Mutable options block, created empty on first access.
    pub fn options_mut(&mut self) -> &mut FileOptions {
        self.descriptor.options.get_or_insert_with(FileOptions::default)
    }

    /// Source code info, absent when the compiler discarded it.
    pub fn source_code_info(&self) -> Option<&SourceCodeInfo> {
        self.descriptor.source_code_info.as_ref()
    }

    /// Mutable source code info, if present. Never creates one.
    pub fn source_code_info_mut(&mut self) -> Option<&mut SourceCodeInfo> {
        self.descriptor.source_code_info.as_mut()
    }

    /// Drops the source code info entirely.
    pub fn strip_source_code_info(&mut self) {
        self.descriptor.source_code_info = None;
    }
}

impl From<FileDescriptorProto> for ImageFile {
    fn from(descriptor: FileDescriptorProto) -> Self {
        Self::new(descriptor)
    }
}
