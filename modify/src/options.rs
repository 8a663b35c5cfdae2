//! Enumerated, typed slots for the file options that modifiers edit.
//!
//! Field identities and their tags are part of the descriptor wire contract,
//! so every editable option is listed explicitly rather than addressed
//! through a generic key-value view.

use std::fmt;

use prost_types::FileOptions;
use prost_types::file_options::OptimizeMode;

use crate::error::{ModifyError, Result};
use crate::path::SourcePath;

/// A file-level option field, identified by its tag inside `FileOptions`.
///
/// # Examples
///
/// ```
/// use protomod_modify::FileOptionField;
///
/// assert_eq!(FileOptionField::GoPackage.tag(), 11);
/// assert_eq!(FileOptionField::GoPackage.path().as_slice(), &[8, 11]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOptionField {
    JavaPackage,
    JavaOuterClassname,
    OptimizeFor,
    JavaMultipleFiles,
    GoPackage,
    CcEnableArenas,
    ObjcClassPrefix,
    CsharpNamespace,
    PhpNamespace,
    RubyPackage,
}

/// Value shape accepted by a [`FileOptionField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Bool,
    OptimizeMode,
}

impl FileOptionField {
    /// Every editable field, in tag order.
    pub const ALL: [FileOptionField; 10] = [
        Self::JavaPackage,
        Self::JavaOuterClassname,
        Self::OptimizeFor,
        Self::JavaMultipleFiles,
        Self::GoPackage,
        Self::CcEnableArenas,
        Self::ObjcClassPrefix,
        Self::CsharpNamespace,
        Self::PhpNamespace,
        Self::RubyPackage,
    ];

    /// Field tag inside `FileOptions`.
    pub const fn tag(self) -> i32 {
        match self {
            Self::JavaPackage => 1,
            Self::JavaOuterClassname => 8,
            Self::OptimizeFor => 9,
            Self::JavaMultipleFiles => 10,
            Self::GoPackage => 11,
            Self::CcEnableArenas => 31,
            Self::ObjcClassPrefix => 36,
            Self::CsharpNamespace => 37,
            Self::PhpNamespace => 41,
            Self::RubyPackage => 45,
        }
    }

    /// Option name as written in schema source.
    pub const fn name(self) -> &'static str {
        match self {
            Self::JavaPackage => "java_package",
            Self::JavaOuterClassname => "java_outer_classname",
            Self::OptimizeFor => "optimize_for",
            Self::JavaMultipleFiles => "java_multiple_files",
            Self::GoPackage => "go_package",
            Self::CcEnableArenas => "cc_enable_arenas",
            Self::ObjcClassPrefix => "objc_class_prefix",
            Self::CsharpNamespace => "csharp_namespace",
            Self::PhpNamespace => "php_namespace",
            Self::RubyPackage => "ruby_package",
        }
    }

    pub const fn kind(self) -> OptionKind {
        match self {
            Self::JavaMultipleFiles | Self::CcEnableArenas => OptionKind::Bool,
            Self::OptimizeFor => OptionKind::OptimizeMode,
            _ => OptionKind::String,
        }
    }

    /// Source path of this option in a file descriptor: `[8, tag]`.
    pub fn path(self) -> SourcePath {
        SourcePath::file_options().field(self.tag())
    }

    /// Current value, or `None` if the field is unset.
    pub fn get(self, options: &FileOptions) -> Option<OptionValue> {
        let string = |value: &Option<String>| value.clone().map(OptionValue::String);
        match self {
            Self::JavaPackage => string(&options.java_package),
            Self::JavaOuterClassname => string(&options.java_outer_classname),
            Self::GoPackage => string(&options.go_package),
            Self::ObjcClassPrefix => string(&options.objc_class_prefix),
            Self::CsharpNamespace => string(&options.csharp_namespace),
            Self::PhpNamespace => string(&options.php_namespace),
            Self::RubyPackage => string(&options.ruby_package),
            Self::JavaMultipleFiles => options.java_multiple_files.map(OptionValue::Bool),
            Self::CcEnableArenas => options.cc_enable_arenas.map(OptionValue::Bool),
            Self::OptimizeFor => options
                .optimize_for
                .map(|_| OptionValue::OptimizeMode(options.optimize_for())),
        }
    }

    /// Returns `true` if the field is explicitly set.
    pub fn is_set(self, options: &FileOptions) -> bool {
        self.get(options).is_some()
    }

    /// Writes `value` into the field.
    ///
    /// # Errors
    ///
    /// Returns [`FileEdit`](ModifyError::FileEdit) if the value's kind does not
    /// match the field or a string value contains a NUL character. The
    /// options block is left unchanged on error.
    pub fn set(self, file_path: &str, options: &mut FileOptions, value: OptionValue) -> Result<()> {
        if value.kind() != self.kind() {
            return Err(ModifyError::file_edit(
                file_path,
                format!("{} expects a {:?} value, got {value}", self.name(), self.kind()),
            ));
        }
        match value {
            OptionValue::String(value) => {
                if value.contains('\0') {
                    return Err(ModifyError::file_edit(
                        file_path,
                        format!("{} value contains a NUL character", self.name()),
                    ));
                }
                *self.string_slot(options) = Some(value);
            }
            OptionValue::Bool(value) => *self.bool_slot(options) = Some(value),
            OptionValue::OptimizeMode(mode) => options.set_optimize_for(mode),
        }
        Ok(())
    }

    /// Unsets the field.
    pub fn clear(self, options: &mut FileOptions) {
        match self.kind() {
            OptionKind::String => *self.string_slot(options) = None,
            OptionKind::Bool => *self.bool_slot(options) = None,
            OptionKind::OptimizeMode => options.optimize_for = None,
        }
    }

    fn string_slot(self, options: &mut FileOptions) -> &mut Option<String> {
        match self {
            Self::JavaPackage => &mut options.java_package,
            Self::JavaOuterClassname => &mut options.java_outer_classname,
            Self::GoPackage => &mut options.go_package,
            Self::ObjcClassPrefix => &mut options.objc_class_prefix,
            Self::CsharpNamespace => &mut options.csharp_namespace,
            Self::PhpNamespace => &mut options.php_namespace,
            Self::RubyPackage => &mut options.ruby_package,
            Self::JavaMultipleFiles | Self::CcEnableArenas | Self::OptimizeFor => {
                unreachable!("{} is not a string option", self.name())
            }
        }
    }

    fn bool_slot(self, options: &mut FileOptions) -> &mut Option<bool> {
        match self {
            Self::JavaMultipleFiles => &mut options.java_multiple_files,
            Self::CcEnableArenas => &mut options.cc_enable_arenas,
            _ => unreachable!("{} is not a bool option", self.name()),
        }
    }
}

impl fmt::Display for FileOptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Bool(bool),
    OptimizeMode(OptimizeMode),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::String(_) => OptionKind::String,
            Self::Bool(_) => OptionKind::Bool,
            Self::OptimizeMode(_) => OptionKind::OptimizeMode,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<OptimizeMode> for OptionValue {
    fn from(mode: OptimizeMode) -> Self {
        Self::OptimizeMode(mode)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::OptimizeMode(mode) => f.write_str(mode.as_str_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_descriptor_proto() {
        let tags: Vec<i32> = FileOptionField::ALL.iter().map(|f| f.tag()).collect();
        assert_eq!(tags, vec![1, 8, 9, 10, 11, 31, 36, 37, 41, 45]);
    }

    #[test]
    fn test_set_get_clear_roundtrip_per_kind() {
        let mut options = FileOptions::default();
        for field in FileOptionField::ALL {
            let value = match field.kind() {
                OptionKind::String => OptionValue::from("x"),
                OptionKind::Bool => OptionValue::from(true),
                OptionKind::OptimizeMode => OptionValue::from(OptimizeMode::CodeSize),
            };
            assert!(!field.is_set(&options), "{field} set before write");
            field.set("a.proto", &mut options, value.clone()).unwrap();
            assert_eq!(field.get(&options), Some(value));
            field.clear(&mut options);
            assert!(!field.is_set(&options), "{field} set after clear");
        }
    }

    #[test]
    fn test_kind_mismatch_is_file_edit_error() {
        let mut options = FileOptions::default();
        let err = FileOptionField::GoPackage
            .set("a.proto", &mut options, OptionValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ModifyError::FileEdit { ref path, .. } if path == "a.proto"));
        assert!(options.go_package.is_none());
    }

    #[test]
    fn test_nul_in_string_rejected() {
        let mut options = FileOptions::default();
        let err = FileOptionField::GoPackage
            .set("a.proto", &mut options, OptionValue::from("a\0b"))
            .unwrap_err();
        assert!(matches!(err, ModifyError::FileEdit { .. }));
        assert!(options.go_package.is_none());
    }

    #[test]
    fn test_empty_string_counts_as_set() {
        let options = FileOptions {
            go_package: Some(String::new()),
            ..Default::default()
        };
        assert!(FileOptionField::GoPackage.is_set(&options));
    }
}
