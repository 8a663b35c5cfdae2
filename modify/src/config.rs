//! Managed-mode configuration: which file options to rewrite, and how.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! jobs: 4
//! go_package:
//!   prefix: github.com/org/repo
//!   overrides:
//!     weather/v1alpha1/weather.proto: weatherv1alpha1
//! java_package:
//!   prefix: com
//! java_multiple_files: true
//! java_outer_classname: true
//! csharp_namespace: true
//! objc_class_prefix: true
//! optimize_for: speed
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use prost_types::file_options::OptimizeMode;
use serde::{Deserialize, Serialize};

use crate::error::{ModifyError, Result};
use crate::go_package::GoPackage;
use crate::modifier::{MultiModifier, modifier_fn};
use crate::modifiers::{
    CcEnableArenas, CsharpNamespace, DEFAULT_JAVA_PACKAGE_PREFIX, JavaMultipleFiles,
    JavaOuterClassname, JavaPackage, ObjcClassPrefix, OptimizeFor, PhpNamespace, RubyPackage,
};
use crate::sweeper::FileOptionSweeper;

/// `go_package` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoPackageConfig {
    /// Import path prefix, e.g. `github.com/org/repo`.
    pub prefix: String,
    /// Explicit package-name suffixes keyed by file path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
}

/// `java_package` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JavaPackageConfig {
    #[serde(default = "default_java_prefix")]
    pub prefix: String,
}

impl Default for JavaPackageConfig {
    fn default() -> Self {
        Self {
            prefix: default_java_prefix(),
        }
    }
}

fn default_java_prefix() -> String {
    DEFAULT_JAVA_PACKAGE_PREFIX.to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

/// YAML spelling of `optimize_for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeModeConfig {
    Speed,
    CodeSize,
    LiteRuntime,
}

impl From<OptimizeModeConfig> for OptimizeMode {
    fn from(mode: OptimizeModeConfig) -> Self {
        match mode {
            OptimizeModeConfig::Speed => Self::Speed,
            OptimizeModeConfig::CodeSize => Self::CodeSize,
            OptimizeModeConfig::LiteRuntime => Self::LiteRuntime,
        }
    }
}

/// Top-level managed-mode configuration.
///
/// Every section is optional; an absent section leaves that option alone.
///
/// # Examples
///
/// ```
/// use protomod_modify::{FileOptionSweeper, ManagedConfig};
///
/// let config: ManagedConfig = serde_yaml::from_str(
///     "go_package:\n  prefix: github.com/org/repo\njava_multiple_files: true\n",
/// )
/// .unwrap();
///
/// let sweeper = FileOptionSweeper::new();
/// let runner = config.build(&sweeper).unwrap();
/// assert_eq!(runner.len(), 3); // go_package, java_multiple_files, sweep
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagedConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Worker count for per-file edits (`None` = rayon default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package: Option<GoPackageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_package: Option<JavaPackageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_multiple_files: Option<bool>,
    #[serde(default)]
    pub java_outer_classname: bool,
    #[serde(default)]
    pub csharp_namespace: bool,
    #[serde(default)]
    pub ruby_package: bool,
    #[serde(default)]
    pub php_namespace: bool,
    #[serde(default)]
    pub objc_class_prefix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_enable_arenas: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_for: Option<OptimizeModeConfig>,
}

impl Default for ManagedConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            jobs: None,
            go_package: None,
            java_package: None,
            java_multiple_files: None,
            java_outer_classname: false,
            csharp_namespace: false,
            ruby_package: false,
            php_namespace: false,
            objc_class_prefix: false,
            cc_enable_arenas: None,
            optimize_for: None,
        }
    }
}

impl ManagedConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ModifyError::Io) if the file cannot be read,
    /// [`Yaml`](ModifyError::Yaml) if parsing fails, or
    /// [`Configuration`](ModifyError::Configuration) if a value is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks values that YAML typing cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(ModifyError::configuration("jobs must be at least 1"));
        }
        Ok(())
    }

    /// Returns `true` if no option section is enabled.
    pub fn is_empty(&self) -> bool {
        self.go_package.is_none()
            && self.java_package.is_none()
            && self.java_multiple_files.is_none()
            && !self.java_outer_classname
            && !self.csharp_namespace
            && !self.ruby_package
            && !self.php_namespace
            && !self.objc_class_prefix
            && self.cc_enable_arenas.is_none()
            && self.optimize_for.is_none()
    }

    /// Builds one pass: every enabled option modifier in a fixed order,
    /// followed by the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`Configuration`](ModifyError::Configuration) if any modifier
    /// rejects its settings.
    pub fn build<'a>(&self, sweeper: &'a FileOptionSweeper) -> Result<MultiModifier<'a>> {
        let mut runner = MultiModifier::new();
        if let Some(go) = &self.go_package {
            runner.push(GoPackage::new(sweeper, go.prefix.clone())?.with_overrides(go.overrides.clone())?);
        }
        if let Some(java) = &self.java_package {
            runner.push(JavaPackage::new(sweeper, java.prefix.clone())?);
        }
        if let Some(value) = self.java_multiple_files {
            runner.push(JavaMultipleFiles::new(sweeper, value));
        }
        if self.java_outer_classname {
            runner.push(JavaOuterClassname::new(sweeper));
        }
        if self.csharp_namespace {
            runner.push(CsharpNamespace::new(sweeper));
        }
        if self.ruby_package {
            runner.push(RubyPackage::new(sweeper));
        }
        if self.php_namespace {
            runner.push(PhpNamespace::new(sweeper));
        }
        if self.objc_class_prefix {
            runner.push(ObjcClassPrefix::new(sweeper));
        }
        if let Some(value) = self.cc_enable_arenas {
            runner.push(CcEnableArenas::new(sweeper, value));
        }
        if let Some(mode) = self.optimize_for {
            runner.push(OptimizeFor::new(sweeper, mode.into()));
        }
        runner.push(modifier_fn(move |image| sweeper.sweep(image)));
        Ok(runner)
    }
}
