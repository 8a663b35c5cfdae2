//! Image construction, lookup, and `FileDescriptorSet` serialization.

use std::collections::HashSet;
use std::path::Path;

use prost::Message;
use prost_types::FileDescriptorSet;
use tracing::debug;

use crate::error::{ImageError, Result};
use crate::file::ImageFile;

/// An ordered, deduplicated set of files closed under imports.
///
/// Membership is fixed at construction: files can be edited in place through
/// [`files_mut`](Image::files_mut) but never added or removed.
///
/// # Examples
///
/// ```
/// use protomod_image::{Image, ImageFile};
/// use prost_types::FileDescriptorProto;
///
/// let image = Image::new(vec![
///     ImageFile::new(FileDescriptorProto {
///         name: Some("a.proto".into()),
///         ..Default::default()
///     }),
///     ImageFile::new(FileDescriptorProto {
///         name: Some("b.proto".into()),
///         dependency: vec!["a.proto".into()],
///         ..Default::default()
///     }),
/// ])
/// .unwrap();
/// assert_eq!(image.len(), 2);
/// assert!(image.file("a.proto").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    files: Vec<ImageFile>,
}

impl Image {
    /// Builds an image, checking paths are non-empty, unique, and that every
    /// import is itself a member.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPath`](ImageError::EmptyPath),
    /// [`DuplicateFile`](ImageError::DuplicateFile), or
    /// [`MissingImport`](ImageError::MissingImport).
    pub fn new(files: Vec<ImageFile>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, file) in files.iter().enumerate() {
            if file.path().is_empty() {
                return Err(ImageError::EmptyPath(index));
            }
            if !seen.insert(file.path()) {
                return Err(ImageError::DuplicateFile(file.path().to_string()));
            }
        }
        for file in &files {
            if let Some(import) = file
                .dependencies()
                .iter()
                .find(|import| !seen.contains(import.as_str()))
            {
                return Err(ImageError::MissingImport {
                    file: file.path().to_string(),
                    import: import.clone(),
                });
            }
        }
        Ok(Self { files })
    }

    /// Decodes a binary `FileDescriptorSet`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes)?;
        debug!(files = set.file.len(), "Decoded image");
        Self::new(set.file.into_iter().map(ImageFile::new).collect())
    }

    /// Encodes the image as a binary `FileDescriptorSet`.
    pub fn encode(&self) -> Vec<u8> {
        self.to_file_descriptor_set().encode_to_vec()
    }

    /// Reads and decodes an image file from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Encodes and writes the image to disk.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.encode())?;
        Ok(())
    }

    /// Clones the files into a `FileDescriptorSet`.
    pub fn to_file_descriptor_set(&self) -> FileDescriptorSet {
        FileDescriptorSet {
            file: self
                .files
                .iter()
                .map(|file| file.descriptor().clone())
                .collect(),
        }
    }

    /// Files in stable image order.
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Mutable access to file contents. The slice cannot grow or shrink.
    pub fn files_mut(&mut self) -> &mut [ImageFile] {
        &mut self.files
    }

    /// Looks up a file by path.
    pub fn file(&self, path: &str) -> Option<&ImageFile> {
        self.files.iter().find(|file| file.path() == path)
    }

    /// Looks up a file by path for editing.
    pub fn file_mut(&mut self, path: &str) -> Option<&mut ImageFile> {
        self.files.iter_mut().find(|file| file.path() == path)
    }

    /// Number of files in the image.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the image has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Drops source code info from every file.
    pub fn strip_source_code_info(&mut self) {
        self.files
            .iter_mut()
            .for_each(ImageFile::strip_source_code_info);
    }

    /// Consumes the image, returning its files.
    pub fn into_files(self) -> Vec<ImageFile> {
        self.files
    }
}
