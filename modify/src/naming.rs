//! Name derivation shared by the option modifiers.

use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+(?:p\d+)?(?:(?:alpha|beta)\d*|test[a-z0-9]*)?$")
        .expect("static regex must compile")
});

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Returns `true` if `component` is a package version such as `v1`,
/// `v1alpha1`, `v2beta3`, `v1p1beta1` or `v1test`.
pub(crate) fn is_version_component(component: &str) -> bool {
    VERSION_RE.is_match(component)
}

/// Returns `true` if `value` is a plain identifier.
pub(crate) fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

/// Dot-separated package components, empty for an empty package.
pub(crate) fn package_components(package: &str) -> Vec<&str> {
    package.split('.').filter(|part| !part.is_empty()).collect()
}

/// For a versioned package such as `weather.v1alpha1`, the last two
/// components joined: `weatherv1alpha1`.
pub(crate) fn versioned_package_suffix(package: &str) -> Option<String> {
    match package_components(package).as_slice() {
        [.., name, version] if is_version_component(version) => Some(format!("{name}{version}")),
        _ => None,
    }
}

/// Upper-cases the first letter of every word. Words are separated by `_`,
/// `-`, `.` or whitespace, and the separators are dropped.
pub(crate) fn to_pascal_case(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// File name without directory or `.proto` extension.
pub(crate) fn file_stem(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    base.strip_suffix(".proto").unwrap_or(base)
}
