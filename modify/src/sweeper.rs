//! Pass-scoped registry of touched option paths.
//!
//! Modifiers register every path they change while a pass runs; [`sweep`]
//! then deletes the source code info records tied to those paths so that
//! regenerated schema text never attaches an old comment to a new value.
//!
//! [`sweep`]: FileOptionSweeper::sweep

use std::collections::{BTreeMap, HashSet};

use parking_lot::Mutex;
use protomod_image::Image;
use tracing::debug;

use crate::error::Result;
use crate::path::SourcePath;
use crate::source_info::SourceInfoIndex;

/// How a touched path selects source code info records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Only records whose path equals the touched path.
    Exact,
    /// Every record whose path starts with the touched path.
    Prefix,
}

/// Collects touched paths during one modification pass and purges the
/// matching source code info afterwards.
///
/// Construct one per pass and hand it by reference to every modifier of that
/// pass. Touches may arrive concurrently from per-file workers. After
/// [`sweep`](Self::sweep) the sweeper is empty; sweeping again does nothing.
///
/// # Examples
///
/// ```
/// use prost_types::source_code_info::Location;
/// use prost_types::{FileDescriptorProto, SourceCodeInfo};
/// use protomod_image::{Image, ImageFile};
/// use protomod_modify::{FileOptionField, FileOptionSweeper, MatchMode};
///
/// let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
///     name: Some("a.proto".into()),
///     source_code_info: Some(SourceCodeInfo {
///         location: vec![Location { path: vec![8, 11], ..Default::default() }],
///     }),
///     ..Default::default()
/// })])
/// .unwrap();
///
/// let sweeper = FileOptionSweeper::new();
/// sweeper.touch("a.proto", FileOptionField::GoPackage.path(), MatchMode::Exact);
/// sweeper.sweep(&mut image).unwrap();
///
/// assert!(image.files()[0].source_code_info().unwrap().location.is_empty());
/// assert_eq!(sweeper.pending(), 0);
/// ```
#[derive(Debug, Default)]
pub struct FileOptionSweeper {
    touched: Mutex<BTreeMap<String, HashSet<(SourcePath, MatchMode)>>>,
}

impl FileOptionSweeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a touched path for `file_path`. Repeated touches are
    /// idempotent.
    pub fn touch(&self, file_path: &str, path: SourcePath, mode: MatchMode) {
        self.touched
            .lock()
            .entry(file_path.to_string())
            .or_default()
            .insert((path, mode));
    }

    /// Number of distinct entries waiting to be swept.
    pub fn pending(&self) -> usize {
        self.touched.lock().values().map(HashSet::len).sum()
    }

    /// Returns `true` if `path` was touched for `file_path` in any mode.
    pub fn is_touched(&self, file_path: &str, path: &SourcePath) -> bool {
        self.touched
            .lock()
            .get(file_path)
            .is_some_and(|entries| entries.iter().any(|(touched, _)| touched == path))
    }

    /// Paths of files with pending entries, sorted.
    pub fn touched_files(&self) -> Vec<String> {
        self.touched.lock().keys().cloned().collect()
    }

    /// Removes every source code info record matching a registered entry and
    /// empties the registry.
    ///
    /// Files without entries, and files without source code info, are left
    /// as they are. Option values are never changed. Always succeeds; the
    /// `Result` lets the sweep sit in a modifier chain.
    pub fn sweep(&self, image: &mut Image) -> Result<()> {
        let touched = std::mem::take(&mut *self.touched.lock());
        if touched.is_empty() {
            return Ok(());
        }

        for file in image.files_mut() {
            let Some(entries) = touched.get(file.path()) else {
                continue;
            };
            let path = file.path().to_string();
            let Some(mut index) = SourceInfoIndex::for_file(file) else {
                continue;
            };
            let removed: usize = entries
                .iter()
                .map(|(touched_path, mode)| match mode {
                    MatchMode::Exact => index.remove_exact(touched_path),
                    MatchMode::Prefix => index.remove_prefix(touched_path),
                })
                .sum();
            debug!(file = %path, entries = entries.len(), removed, "Swept source code info");
        }
        Ok(())
    }
}
