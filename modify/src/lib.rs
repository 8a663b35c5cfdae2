//! File option modifiers for protobuf images.
//!
//! This crate rewrites file-scoped code generation options (`go_package`,
//! `java_package`, …) across every file of an [`Image`](protomod_image::Image)
//! and keeps source code info consistent with the rewritten values:
//!
//! - [`SourcePath`]: integer paths addressing fields of a file descriptor.
//! - [`FileOptionField`] / [`OptionValue`]: the enumerated, typed option
//!   slots modifiers edit.
//! - [`SourceInfoIndex`]: exact and prefix lookup/removal over a file's
//!   source code info.
//! - [`FileOptionSweeper`]: pass-scoped registry of touched paths that
//!   purges their stale source code info.
//! - [`Modifier`] / [`MultiModifier`]: the unit of change and the ordered,
//!   fail-fast runner.
//! - [`GoPackage`] and the other option modifiers.
//! - [`ManagedConfig`]: YAML configuration that builds a full pass.
//!
//! # Example
//!
//! ```
//! use prost_types::source_code_info::Location;
//! use prost_types::{FileDescriptorProto, FileOptions, SourceCodeInfo};
//! use protomod_image::{Image, ImageFile};
//! use protomod_modify::*;
//!
//! let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
//!     name: Some("weather/v1/weather.proto".into()),
//!     options: Some(FileOptions {
//!         go_package: Some("old/path".into()),
//!         ..Default::default()
//!     }),
//!     source_code_info: Some(SourceCodeInfo {
//!         location: vec![Location {
//!             path: vec![8, 11],
//!             leading_comments: Some(" stale\n".into()),
//!             ..Default::default()
//!         }],
//!     }),
//!     ..Default::default()
//! })])
//! .unwrap();
//!
//! let sweeper = FileOptionSweeper::new();
//! let runner = MultiModifier::new()
//!     .with(GoPackage::new(&sweeper, "github.com/org/repo").unwrap())
//!     .with(modifier_fn(|image| sweeper.sweep(image)));
//! runner.modify(&mut image).unwrap();
//!
//! let file = &image.files()[0];
//! assert_eq!(file.options().unwrap().go_package(), "github.com/org/repo/weather/v1");
//! assert!(file.source_code_info().unwrap().location.is_empty());
//! ```

mod config;
mod error;
mod go_package;
mod modifier;
mod modifiers;
mod naming;
mod options;
mod path;
mod source_info;
mod sweeper;

pub use config::{GoPackageConfig, JavaPackageConfig, ManagedConfig, OptimizeModeConfig};
pub use error::{ModifyError, Result};
pub use go_package::{GoPackage, go_package_import_path};
pub use modifier::{
    Modifier, ModifierFn, MultiModifier, OptionEdit, for_each_file, modifier_fn,
    modify_file_option, update_file_option,
};
pub use modifiers::{
    CcEnableArenas, CsharpNamespace, DEFAULT_JAVA_PACKAGE_PREFIX, JavaMultipleFiles,
    JavaOuterClassname, JavaPackage, ObjcClassPrefix, OptimizeFor, PhpNamespace, RubyPackage,
    objc_class_prefix,
};
pub use options::{FileOptionField, OptionKind, OptionValue};
pub use path::{FILE_OPTIONS_TAG, FILE_PACKAGE_TAG, FILE_SOURCE_CODE_INFO_TAG, SourcePath};
pub use source_info::SourceInfoIndex;
pub use sweeper::{FileOptionSweeper, MatchMode};
