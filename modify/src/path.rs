//! Integer paths addressing fields inside a compiled file descriptor.
//!
//! A path walks the descriptor tree from the `FileDescriptorProto` root: each
//! element is either a field tag or, after a repeated field's tag, an element
//! index. `[8, 11]` is field 11 (`go_package`) inside field 8 (`options`).
//! Source code info records are keyed by the same paths.

use std::fmt;

/// `FileDescriptorProto.package`.
pub const FILE_PACKAGE_TAG: i32 = 2;
/// `FileDescriptorProto.options`.
pub const FILE_OPTIONS_TAG: i32 = 8;
/// `FileDescriptorProto.source_code_info`.
pub const FILE_SOURCE_CODE_INFO_TAG: i32 = 9;

/// Path to a field (or repeated element) in a file descriptor.
///
/// Paths support only equality and prefix tests; no ordering is defined.
///
/// # Examples
///
/// ```
/// use protomod_modify::SourcePath;
///
/// let options = SourcePath::file_options();
/// let go_package = options.clone().field(11);
/// assert_eq!(go_package.as_slice(), &[8, 11]);
/// assert!(go_package.starts_with(&options));
/// assert!(!options.starts_with(&go_package));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePath(Vec<i32>);

impl SourcePath {
    /// Creates a path from raw elements.
    pub fn new(elements: impl Into<Vec<i32>>) -> Self {
        Self(elements.into())
    }

    /// The empty path, addressing the file itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the file's options block: `[8]`.
    pub fn file_options() -> Self {
        Self(vec![FILE_OPTIONS_TAG])
    }

    /// Appends a field tag.
    pub fn push_field(&mut self, tag: i32) {
        self.0.push(tag);
    }

    /// Appends a repeated-field element index.
    ///
    /// Indices beyond `i32::MAX` cannot appear in a descriptor and saturate.
    pub fn push_index(&mut self, index: usize) {
        self.0.push(i32::try_from(index).unwrap_or(i32::MAX));
    }

    /// Builder form of [`push_field`](Self::push_field).
    pub fn field(mut self, tag: i32) -> Self {
        self.push_field(tag);
        self
    }

    /// Builder form of [`push_index`](Self::push_index).
    pub fn index(mut self, index: usize) -> Self {
        self.push_index(index);
        self
    }

    /// Returns `true` if the first `prefix.len()` elements equal `prefix`.
    /// Every path starts with itself and with the root.
    pub fn starts_with(&self, prefix: &SourcePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Same as [`starts_with`](Self::starts_with) against raw elements.
    pub fn is_prefix_of(&self, elements: &[i32]) -> bool {
        elements.starts_with(&self.0)
    }

    /// Raw path elements.
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i32>> for SourcePath {
    fn from(elements: Vec<i32>) -> Self {
        Self(elements)
    }
}

impl From<&[i32]> for SourcePath {
    fn from(elements: &[i32]) -> Self {
        Self(elements.to_vec())
    }
}

impl PartialEq<[i32]> for SourcePath {
    fn eq(&self, other: &[i32]) -> bool {
        self.0 == other
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}
