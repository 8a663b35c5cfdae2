//! Path-addressed view over a file's source code info records.
//!
//! Records are kept as the flat, ordered list the compiler produced and are
//! scanned by exact or prefix match. Removal preserves the order of the
//! records that remain.

use prost_types::source_code_info::Location;
use protomod_image::ImageFile;

use crate::path::SourcePath;

/// Lookup and removal over one file's source code info.
///
/// A file without source code info has no index; callers treat that as a
/// no-op rather than an error.
///
/// # Examples
///
/// ```
/// use prost_types::source_code_info::Location;
/// use prost_types::{FileDescriptorProto, SourceCodeInfo};
/// use protomod_image::ImageFile;
/// use protomod_modify::{SourceInfoIndex, SourcePath};
///
/// let mut file = ImageFile::new(FileDescriptorProto {
///     name: Some("a.proto".into()),
///     source_code_info: Some(SourceCodeInfo {
///         location: vec![
///             Location { path: vec![8], ..Default::default() },
///             Location { path: vec![8, 11], ..Default::default() },
///             Location { path: vec![4, 0], ..Default::default() },
///         ],
///     }),
///     ..Default::default()
/// });
///
/// let mut index = SourceInfoIndex::for_file(&mut file).unwrap();
/// assert_eq!(index.remove_prefix(&SourcePath::file_options()), 2);
/// assert_eq!(index.len(), 1);
/// ```
#[derive(Debug)]
pub struct SourceInfoIndex<'a> {
    locations: &'a mut Vec<Location>,
}

impl<'a> SourceInfoIndex<'a> {
    /// Index over `file`'s records, or `None` if it has no source code info.
    pub fn for_file(file: &'a mut ImageFile) -> Option<Self> {
        file.source_code_info_mut().map(|info| Self::new(&mut info.location))
    }

    /// Index over a raw record list.
    pub fn new(locations: &'a mut Vec<Location>) -> Self {
        Self { locations }
    }

    /// Records whose path equals `path`. Repeated-field siblings may share one.
    pub fn lookup(&self, path: &SourcePath) -> Vec<&Location> {
        self.locations
            .iter()
            .filter(|location| *path == *location.path.as_slice())
            .collect()
    }

    /// Returns `true` if any record has exactly `path`.
    pub fn contains(&self, path: &SourcePath) -> bool {
        self.locations
            .iter()
            .any(|location| *path == *location.path.as_slice())
    }

    /// Removes every record whose path equals `path`; returns how many.
    pub fn remove_exact(&mut self, path: &SourcePath) -> usize {
        self.remove_where(|location| *path == *location.path.as_slice())
    }

    /// Removes every record whose path starts with `prefix`, at any depth;
    /// returns how many.
    pub fn remove_prefix(&mut self, prefix: &SourcePath) -> usize {
        self.remove_where(|location| prefix.is_prefix_of(&location.path))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn remove_where(&mut self, mut matches: impl FnMut(&Location) -> bool) -> usize {
        let before = self.locations.len();
        self.locations.retain(|location| !matches(location));
        before - self.locations.len()
    }
}
