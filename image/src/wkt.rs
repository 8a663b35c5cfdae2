//! Registry of well-known schema files vendored with the compiler.
//!
//! These files are shared by every organization that builds against them, so
//! option rewriting never moves them into a caller-specific namespace.

/// Canonical paths of the vendored well-known files, sorted.
pub const WELL_KNOWN_FILES: &[&str] = &[
    "google/protobuf/any.proto",
    "google/protobuf/api.proto",
    "google/protobuf/compiler/plugin.proto",
    "google/protobuf/descriptor.proto",
    "google/protobuf/duration.proto",
    "google/protobuf/empty.proto",
    "google/protobuf/field_mask.proto",
    "google/protobuf/source_context.proto",
    "google/protobuf/struct.proto",
    "google/protobuf/timestamp.proto",
    "google/protobuf/type.proto",
    "google/protobuf/wrappers.proto",
];

/// Returns `true` if `path` names a vendored well-known file.
///
/// # Examples
///
/// ```
/// use protomod_image::is_well_known_path;
///
/// assert!(is_well_known_path("google/protobuf/timestamp.proto"));
/// assert!(!is_well_known_path("weather/v1/weather.proto"));
/// ```
pub fn is_well_known_path(path: &str) -> bool {
    WELL_KNOWN_FILES.binary_search(&path).is_ok()
}
