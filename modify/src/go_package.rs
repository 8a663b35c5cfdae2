//! The `go_package` modifier.
//!
//! Files in the same directory share one generated package, so the import
//! path is the configured prefix joined with the file's directory. A
//! `;name` suffix pins the generated package name when the last directory
//! segment would make a poor one, most often a version directory such as
//! `v1alpha1`.

use std::collections::HashMap;

use protomod_image::{Image, ImageFile};
use tracing::debug;

use crate::error::{ModifyError, Result};
use crate::modifier::{Modifier, OptionEdit, modify_file_option};
use crate::naming::{is_identifier, versioned_package_suffix};
use crate::options::{FileOptionField, OptionValue};
use crate::sweeper::FileOptionSweeper;

/// Rewrites `go_package` for every non-well-known file.
///
/// # Examples
///
/// ```
/// use prost_types::FileDescriptorProto;
/// use protomod_image::{Image, ImageFile};
/// use protomod_modify::{FileOptionSweeper, GoPackage, Modifier};
///
/// let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
///     name: Some("weather/v1alpha1/weather.proto".into()),
///     ..Default::default()
/// })])
/// .unwrap();
///
/// let sweeper = FileOptionSweeper::new();
/// GoPackage::new(&sweeper, "github.com/org/repo")
///     .unwrap()
///     .with_overrides([("weather/v1alpha1/weather.proto", "weatherv1alpha1")])
///     .unwrap()
///     .modify(&mut image)
///     .unwrap();
///
/// assert_eq!(
///     image.files()[0].options().unwrap().go_package(),
///     "github.com/org/repo/weather/v1alpha1;weatherv1alpha1",
/// );
/// assert_eq!(sweeper.pending(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GoPackage<'a> {
    sweeper: &'a FileOptionSweeper,
    prefix: String,
    overrides: HashMap<String, String>,
}

impl<'a> GoPackage<'a> {
    /// Creates the modifier for an import path `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Configuration`](ModifyError::Configuration) if the prefix is
    /// empty or is not a clean slash-separated path.
    pub fn new(sweeper: &'a FileOptionSweeper, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_import_prefix(&prefix)?;
        Ok(Self {
            sweeper,
            prefix,
            overrides: HashMap::new(),
        })
    }

    /// Adds explicit package-name suffixes keyed by file path.
    ///
    /// # Errors
    ///
    /// Returns [`Configuration`](ModifyError::Configuration) if a suffix is
    /// not a plain identifier.
    pub fn with_overrides<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (file_path, suffix) in overrides {
            let (file_path, suffix) = (file_path.into(), suffix.into());
            if !is_identifier(&suffix) {
                return Err(ModifyError::configuration(format!(
                    "go_package override for {file_path}: {suffix:?} is not a valid package name"
                )));
            }
            self.overrides.insert(file_path, suffix);
        }
        Ok(self)
    }

    /// Configured import path prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Modifier for GoPackage<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        debug!(prefix = %self.prefix, overrides = self.overrides.len(), "Applying go_package");
        modify_file_option(image, self.sweeper, FileOptionField::GoPackage, |file| {
            let override_suffix = self.overrides.get(file.path()).map(String::as_str);
            let value = go_package_import_path(file, &self.prefix, override_suffix)?;
            Ok(OptionEdit::Set(OptionValue::String(value)))
        })?;
        Ok(())
    }
}

/// Computes the `go_package` value for `file`.
///
/// The import path is `prefix` joined with the file's directory. The
/// package-name suffix is `override_suffix` if given, otherwise derived from
/// a versioned proto package (`weather.v1alpha1` → `weatherv1alpha1`), and
/// omitted when neither applies.
///
/// # Errors
///
/// Returns [`FileEdit`](ModifyError::FileEdit) if the file's path cannot be
/// turned into an import path.
///
/// # Examples
///
/// ```
/// use prost_types::FileDescriptorProto;
/// use protomod_image::ImageFile;
/// use protomod_modify::go_package_import_path;
///
/// let file = ImageFile::new(FileDescriptorProto {
///     name: Some("weather/v1alpha1/weather.proto".into()),
///     package: Some("weather.v1alpha1".into()),
///     ..Default::default()
/// });
/// assert_eq!(
///     go_package_import_path(&file, "github.com/org/repo", None).unwrap(),
///     "github.com/org/repo/weather/v1alpha1;weatherv1alpha1",
/// );
/// assert_eq!(
///     go_package_import_path(&file, "github.com/org/repo", Some("wx")).unwrap(),
///     "github.com/org/repo/weather/v1alpha1;wx",
/// );
/// ```
pub fn go_package_import_path(
    file: &ImageFile,
    prefix: &str,
    override_suffix: Option<&str>,
) -> Result<String> {
    let path = file.path();
    validate_file_path(path)?;
    let mut value = match path.rsplit_once('/') {
        Some((dir, _)) => format!("{prefix}/{dir}"),
        None => prefix.to_string(),
    };
    let suffix = override_suffix
        .map(str::to_string)
        .or_else(|| versioned_package_suffix(file.package()));
    if let Some(suffix) = suffix {
        value.push(';');
        value.push_str(&suffix);
    }
    Ok(value)
}

fn validate_import_prefix(prefix: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(ModifyError::configuration(format!(
            "invalid go_package prefix {prefix:?}: {reason}"
        )))
    };
    if prefix.is_empty() {
        return invalid("a non-empty import path prefix is required");
    }
    if let Some(c) = prefix
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '\\'))
    {
        return invalid(&format!("contains invalid character {c:?}"));
    }
    if prefix.starts_with('/') || prefix.ends_with('/') {
        return invalid("must not start or end with '/'");
    }
    if prefix
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return invalid("contains an empty, '.' or '..' segment");
    }
    Ok(())
}

fn validate_file_path(path: &str) -> Result<()> {
    let reason = if path.is_empty() {
        Some("empty file path")
    } else if path.starts_with('/') {
        Some("file path must be relative")
    } else if path.contains('\\') {
        Some("file path must use '/' separators")
    } else if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        Some("file path is not normalized")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ModifyError::file_edit(path, reason)),
        None => Ok(()),
    }
}
