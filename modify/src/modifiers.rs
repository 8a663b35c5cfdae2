//! Option modifiers for the non-Go code generators.
//!
//! Each modifier owns exactly one file option. Values derived from the proto
//! package leave files without a package unchanged, except
//! [`ObjcClassPrefix`], which clears a stale prefix.

use std::sync::LazyLock;

use prost_types::file_options::OptimizeMode;
use protomod_image::Image;
use regex::Regex;

use crate::error::{ModifyError, Result};
use crate::modifier::{Modifier, OptionEdit, modify_file_option};
use crate::naming::{file_stem, is_version_component, package_components, to_pascal_case};
use crate::options::{FileOptionField, OptionValue};
use crate::sweeper::FileOptionSweeper;

/// Default `java_package` prefix.
pub const DEFAULT_JAVA_PACKAGE_PREFIX: &str = "com";

/// Class prefix reserved by the Objective-C protobuf runtime.
const RESERVED_OBJC_PREFIX: &str = "GPB";

static JAVA_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("static regex must compile")
});

/// Sets `java_package` to `<prefix>.<proto package>`.
///
/// # Examples
///
/// ```
/// use prost_types::FileDescriptorProto;
/// use protomod_image::{Image, ImageFile};
/// use protomod_modify::{FileOptionSweeper, JavaPackage, Modifier};
///
/// let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
///     name: Some("acme/weather/v1/weather.proto".into()),
///     package: Some("acme.weather.v1".into()),
///     ..Default::default()
/// })])
/// .unwrap();
///
/// let sweeper = FileOptionSweeper::new();
/// JavaPackage::new(&sweeper, "com").unwrap().modify(&mut image).unwrap();
/// assert_eq!(image.files()[0].options().unwrap().java_package(), "com.acme.weather.v1");
/// ```
#[derive(Debug, Clone)]
pub struct JavaPackage<'a> {
    sweeper: &'a FileOptionSweeper,
    prefix: String,
}

impl<'a> JavaPackage<'a> {
    /// # Errors
    ///
    /// Returns [`Configuration`](ModifyError::Configuration) unless `prefix`
    /// is a dot-separated list of identifiers.
    pub fn new(sweeper: &'a FileOptionSweeper, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if !JAVA_PREFIX_RE.is_match(&prefix) {
            return Err(ModifyError::configuration(format!(
                "invalid java_package prefix {prefix:?}"
            )));
        }
        Ok(Self { sweeper, prefix })
    }
}

impl Modifier for JavaPackage<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::JavaPackage, |file| {
            Ok(match file.package() {
                "" => OptionEdit::Keep,
                package => OptionEdit::Set(format!("{}.{package}", self.prefix).into()),
            })
        })?;
        Ok(())
    }
}

/// Sets `java_multiple_files` to a fixed value.
#[derive(Debug, Clone)]
pub struct JavaMultipleFiles<'a> {
    sweeper: &'a FileOptionSweeper,
    value: bool,
}

impl<'a> JavaMultipleFiles<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper, value: bool) -> Self {
        Self { sweeper, value }
    }
}

impl Modifier for JavaMultipleFiles<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::JavaMultipleFiles, |_| {
            Ok(OptionEdit::Set(self.value.into()))
        })?;
        Ok(())
    }
}

/// Sets `java_outer_classname` to the PascalCased file name plus `Proto`:
/// `weather_service.proto` becomes `WeatherServiceProto`.
#[derive(Debug, Clone)]
pub struct JavaOuterClassname<'a> {
    sweeper: &'a FileOptionSweeper,
}

impl<'a> JavaOuterClassname<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper) -> Self {
        Self { sweeper }
    }
}

impl Modifier for JavaOuterClassname<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::JavaOuterClassname, |file| {
            let stem = to_pascal_case(file_stem(file.path()));
            Ok(OptionEdit::Set(format!("{stem}Proto").into()))
        })?;
        Ok(())
    }
}

/// Sets `csharp_namespace` to the PascalCased package, `.`-joined.
#[derive(Debug, Clone)]
pub struct CsharpNamespace<'a> {
    sweeper: &'a FileOptionSweeper,
}

impl<'a> CsharpNamespace<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper) -> Self {
        Self { sweeper }
    }
}

impl Modifier for CsharpNamespace<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::CsharpNamespace, |file| {
            Ok(joined_package(file.package(), "."))
        })?;
        Ok(())
    }
}

/// Sets `ruby_package` to the PascalCased package, `::`-joined.
#[derive(Debug, Clone)]
pub struct RubyPackage<'a> {
    sweeper: &'a FileOptionSweeper,
}

impl<'a> RubyPackage<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper) -> Self {
        Self { sweeper }
    }
}

impl Modifier for RubyPackage<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::RubyPackage, |file| {
            Ok(joined_package(file.package(), "::"))
        })?;
        Ok(())
    }
}

/// Sets `php_namespace` to the PascalCased package, `\`-joined.
#[derive(Debug, Clone)]
pub struct PhpNamespace<'a> {
    sweeper: &'a FileOptionSweeper,
}

impl<'a> PhpNamespace<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper) -> Self {
        Self { sweeper }
    }
}

impl Modifier for PhpNamespace<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::PhpNamespace, |file| {
            Ok(joined_package(file.package(), "\\"))
        })?;
        Ok(())
    }
}

/// Sets `objc_class_prefix` to the upper-cased initials of the package's
/// non-version components. Files without a package have the option cleared.
///
/// # Examples
///
/// ```
/// use protomod_modify::objc_class_prefix;
///
/// assert_eq!(objc_class_prefix("acme.weather.v1").as_deref(), Some("AW"));
/// assert_eq!(objc_class_prefix("google.protobuf.bar").as_deref(), Some("GPX"));
/// assert_eq!(objc_class_prefix(""), None);
/// ```
#[derive(Debug, Clone)]
pub struct ObjcClassPrefix<'a> {
    sweeper: &'a FileOptionSweeper,
}

impl<'a> ObjcClassPrefix<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper) -> Self {
        Self { sweeper }
    }
}

impl Modifier for ObjcClassPrefix<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::ObjcClassPrefix, |file| {
            Ok(match objc_class_prefix(file.package()) {
                Some(prefix) => OptionEdit::Set(prefix.into()),
                None => OptionEdit::Clear,
            })
        })?;
        Ok(())
    }
}

/// Objective-C class prefix for `package`, or `None` when it has no
/// non-version components.
pub fn objc_class_prefix(package: &str) -> Option<String> {
    let initials: String = package_components(package)
        .into_iter()
        .filter(|component| !is_version_component(component))
        .filter_map(|component| component.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    match initials.as_str() {
        "" => None,
        RESERVED_OBJC_PREFIX => Some("GPX".to_string()),
        _ => Some(initials),
    }
}

/// Sets `cc_enable_arenas` to a fixed value.
#[derive(Debug, Clone)]
pub struct CcEnableArenas<'a> {
    sweeper: &'a FileOptionSweeper,
    value: bool,
}

impl<'a> CcEnableArenas<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper, value: bool) -> Self {
        Self { sweeper, value }
    }
}

impl Modifier for CcEnableArenas<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::CcEnableArenas, |_| {
            Ok(OptionEdit::Set(self.value.into()))
        })?;
        Ok(())
    }
}

/// Sets `optimize_for` to a fixed mode.
#[derive(Debug, Clone)]
pub struct OptimizeFor<'a> {
    sweeper: &'a FileOptionSweeper,
    mode: OptimizeMode,
}

impl<'a> OptimizeFor<'a> {
    pub fn new(sweeper: &'a FileOptionSweeper, mode: OptimizeMode) -> Self {
        Self { sweeper, mode }
    }
}

impl Modifier for OptimizeFor<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        modify_file_option(image, self.sweeper, FileOptionField::OptimizeFor, |_| {
            Ok(OptionEdit::Set(OptionValue::OptimizeMode(self.mode)))
        })?;
        Ok(())
    }
}

fn joined_package(package: &str, separator: &str) -> OptionEdit {
    let components = package_components(package);
    if components.is_empty() {
        return OptionEdit::Keep;
    }
    let joined = components
        .into_iter()
        .map(to_pascal_case)
        .collect::<Vec<_>>()
        .join(separator);
    OptionEdit::Set(joined.into())
}
