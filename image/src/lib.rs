//! In-memory image of compiled protobuf schema files.
//!
//! An [`Image`] is an ordered, deduplicated set of [`ImageFile`] values that
//! is closed under imports. Each file wraps a `FileDescriptorProto` and its
//! optional source code info. File contents are editable; membership is not.
//!
//! The [`wkt`] registry identifies the vendored well-known files shipped with
//! the compiler.
//!
//! # Example
//!
//! ```
//! use protomod_image::{Image, ImageFile};
//! use prost_types::FileDescriptorProto;
//!
//! let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
//!     name: Some("google/protobuf/empty.proto".into()),
//!     ..Default::default()
//! })])
//! .unwrap();
//!
//! assert!(image.files()[0].is_well_known());
//! let bytes = image.encode();
//! assert_eq!(Image::decode(&bytes).unwrap(), image);
//! image.strip_source_code_info();
//! ```

mod error;
mod file;
mod image;
pub mod wkt;

pub use error::{ImageError, Result};
pub use file::ImageFile;
pub use image::Image;
pub use wkt::is_well_known_path;
