//! The modifier abstraction and the composite runner.
//!
//! A [`Modifier`] edits option values across an [`Image`]. A
//! [`MultiModifier`] runs a list of modifiers in order as one pass; by
//! convention the last entry wraps [`FileOptionSweeper::sweep`] so stale
//! source code info is purged after every option edit has been made.

use std::sync::atomic::{AtomicUsize, Ordering};

use protomod_image::{Image, ImageFile};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::options::{FileOptionField, OptionValue};
use crate::sweeper::{FileOptionSweeper, MatchMode};

/// A unit of change applied to an image.
///
/// Implementations must not add or remove files; they only edit options
/// blocks and register touches with their sweeper.
pub trait Modifier: Send + Sync {
    /// Applies the change to every applicable file of `image`.
    ///
    /// # Errors
    ///
    /// On error the image may be partially modified. Every options block is
    /// still well formed.
    fn modify(&self, image: &mut Image) -> Result<()>;
}

/// Adapts a closure into a [`Modifier`].
pub struct ModifierFn<F>(pub F);

impl<F> Modifier for ModifierFn<F>
where
    F: Fn(&mut Image) -> Result<()> + Send + Sync,
{
    fn modify(&self, image: &mut Image) -> Result<()> {
        (self.0)(image)
    }
}

/// Wraps a closure as a boxed-friendly [`Modifier`].
///
/// # Examples
///
/// ```
/// use protomod_modify::{FileOptionSweeper, Modifier, modifier_fn};
///
/// let sweeper = FileOptionSweeper::new();
/// let sweep = modifier_fn(|image| sweeper.sweep(image));
/// # let _ = &sweep;
/// ```
pub fn modifier_fn<F>(f: F) -> ModifierFn<F>
where
    F: Fn(&mut Image) -> Result<()> + Send + Sync,
{
    ModifierFn(f)
}

/// Runs modifiers strictly in order against the same image.
///
/// Stops at the first error; later modifiers, including a trailing sweep,
/// do not run.
///
/// # Examples
///
/// ```
/// use prost_types::FileDescriptorProto;
/// use protomod_image::{Image, ImageFile};
/// use protomod_modify::{FileOptionSweeper, GoPackage, Modifier, MultiModifier, modifier_fn};
///
/// let mut image = Image::new(vec![ImageFile::new(FileDescriptorProto {
///     name: Some("weather/v1/weather.proto".into()),
///     ..Default::default()
/// })])
/// .unwrap();
///
/// let sweeper = FileOptionSweeper::new();
/// let mut runner = MultiModifier::new();
/// runner.push(GoPackage::new(&sweeper, "github.com/org/repo").unwrap());
/// runner.push(modifier_fn(|image| sweeper.sweep(image)));
/// runner.modify(&mut image).unwrap();
///
/// let options = image.files()[0].options().unwrap();
/// assert_eq!(options.go_package(), "github.com/org/repo/weather/v1");
/// ```
#[derive(Default)]
pub struct MultiModifier<'a> {
    modifiers: Vec<Box<dyn Modifier + 'a>>,
}

impl<'a> MultiModifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a modifier to run after those already added.
    pub fn push(&mut self, modifier: impl Modifier + 'a) {
        self.modifiers.push(Box::new(modifier));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, modifier: impl Modifier + 'a) -> Self {
        self.push(modifier);
        self
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn Modifier + 'a>> for MultiModifier<'a> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Modifier + 'a>>>(iter: I) -> Self {
        Self {
            modifiers: iter.into_iter().collect(),
        }
    }
}

impl Modifier for MultiModifier<'_> {
    fn modify(&self, image: &mut Image) -> Result<()> {
        for (step, modifier) in self.modifiers.iter().enumerate() {
            debug!(step, total = self.modifiers.len(), "Running modifier");
            modifier.modify(image)?;
        }
        Ok(())
    }
}

/// Runs `edit` on every file of `image` in parallel.
///
/// Files are independent, so workers never observe one another's edits.
/// Returns the first error reported; other files may or may not have been
/// edited by then. Runs on the current rayon pool, so callers control the
/// worker count with `ThreadPool::install`.
pub fn for_each_file<F>(image: &mut Image, edit: F) -> Result<()>
where
    F: Fn(&mut ImageFile) -> Result<()> + Send + Sync,
{
    image.files_mut().par_iter_mut().try_for_each(edit)
}

/// Sets `field` on `file` to `value`, or clears it when `value` is `None`.
///
/// Nothing is written and nothing is touched when the current value already
/// matches. Otherwise, including unset → set and set → cleared, the field's
/// path is touched with [`MatchMode::Exact`]. Returns whether the file
/// changed.
///
/// # Errors
///
/// Returns [`FileEdit`](crate::ModifyError::FileEdit) if the value cannot be
/// stored in the field.
pub fn update_file_option(
    file: &mut ImageFile,
    field: FileOptionField,
    value: Option<OptionValue>,
    sweeper: &FileOptionSweeper,
) -> Result<bool> {
    let current = file.options().and_then(|options| field.get(options));
    if current == value {
        return Ok(false);
    }
    let path = file.path().to_string();
    match value {
        Some(value) => {
            debug!(file = %path, option = %field, %value, "Setting file option");
            field.set(&path, file.options_mut(), value)?;
        }
        None => {
            debug!(file = %path, option = %field, "Clearing file option");
            field.clear(file.options_mut());
        }
    }
    sweeper.touch(&path, field.path(), MatchMode::Exact);
    Ok(true)
}

/// What an option modifier wants for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEdit {
    /// Leave the field as it is.
    Keep,
    /// Set the field to this value.
    Set(OptionValue),
    /// Unset the field.
    Clear,
}

/// Applies `field` edits computed by `value_for` to every file of `image`
/// except the well-known files, in parallel. Returns how many files changed.
///
/// Only files whose value actually changes are written and touched.
pub fn modify_file_option<F>(
    image: &mut Image,
    sweeper: &FileOptionSweeper,
    field: FileOptionField,
    value_for: F,
) -> Result<usize>
where
    F: Fn(&ImageFile) -> Result<OptionEdit> + Send + Sync,
{
    let changed = AtomicUsize::new(0);
    for_each_file(image, |file| {
        if file.is_well_known() {
            return Ok(());
        }
        let value = match value_for(file)? {
            OptionEdit::Keep => return Ok(()),
            OptionEdit::Set(value) => Some(value),
            OptionEdit::Clear => None,
        };
        if update_file_option(file, field, value, sweeper)? {
            changed.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    })?;
    let changed = changed.into_inner();
    info!(option = %field, changed, files = image.len(), "Applied file option");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use prost_types::FileDescriptorProto;

    use super::*;
    use crate::error::ModifyError;

    fn image(names: &[&str]) -> Image {
        Image::new(
            names
                .iter()
                .map(|name| {
                    ImageFile::new(FileDescriptorProto {
                        name: Some(name.to_string()),
                        ..Default::default()
                    })
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_multi_modifier_runs_in_order() {
        let mut image = image(&["a.proto"]);
        let runner = MultiModifier::new()
            .with(modifier_fn(|image: &mut Image| {
                image.files_mut()[0].options_mut().go_package = Some("first".into());
                Ok(())
            }))
            .with(modifier_fn(|image: &mut Image| {
                let options = image.files_mut()[0].options_mut();
                assert_eq!(options.go_package(), "first");
                options.go_package = Some("second".into());
                Ok(())
            }));
        runner.modify(&mut image).unwrap();
        assert_eq!(image.files()[0].options().unwrap().go_package(), "second");
    }

    #[test]
    fn test_multi_modifier_stops_on_first_error() {
        let calls = AtomicUsize::new(0);
        let mut image = image(&["a.proto"]);
        let runner = MultiModifier::new()
            .with(modifier_fn(|_: &mut Image| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ModifyError::file_edit("a.proto", "boom"))
            }))
            .with(modifier_fn(|_: &mut Image| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
        assert!(runner.modify(&mut image).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_multi_modifier_is_noop() {
        let mut image = image(&["a.proto"]);
        let before = image.clone();
        MultiModifier::new().modify(&mut image).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn test_for_each_file_visits_every_file() {
        let mut image = image(&["a.proto", "b.proto", "c.proto"]);
        let visited = AtomicUsize::new(0);
        for_each_file(&mut image, |_| {
            visited.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
        assert_eq!(visited.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_for_each_file_surfaces_error() {
        let mut image = image(&["a.proto", "bad.proto", "c.proto"]);
        let err = for_each_file(&mut image, |file| {
            if file.path() == "bad.proto" {
                Err(ModifyError::file_edit(file.path(), "rejected"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, ModifyError::FileEdit { ref path, .. } if path == "bad.proto"));
    }

    #[test]
    fn test_update_touches_only_on_change() {
        let mut image = image(&["a.proto"]);
        let sweeper = FileOptionSweeper::new();
        let file = &mut image.files_mut()[0];

        let changed = update_file_option(file, FileOptionField::GoPackage, Some("x".into()), &sweeper).unwrap();
        assert!(changed);
        assert_eq!(sweeper.pending(), 1);

        let sweeper = FileOptionSweeper::new();
        let changed = update_file_option(file, FileOptionField::GoPackage, Some("x".into()), &sweeper).unwrap();
        assert!(!changed);
        assert_eq!(sweeper.pending(), 0);
    }

    #[test]
    fn test_update_set_to_cleared_is_a_touch() {
        let mut image = image(&["a.proto"]);
        let sweeper = FileOptionSweeper::new();
        let file = &mut image.files_mut()[0];
        file.options_mut().objc_class_prefix = Some("WX".into());

        let changed = update_file_option(file, FileOptionField::ObjcClassPrefix, None, &sweeper).unwrap();
        assert!(changed);
        assert!(file.options().unwrap().objc_class_prefix.is_none());
        assert!(sweeper.is_touched("a.proto", &FileOptionField::ObjcClassPrefix.path()));
    }

    #[test]
    fn test_update_clear_of_unset_is_not_a_touch() {
        let mut image = image(&["a.proto"]);
        let sweeper = FileOptionSweeper::new();
        let file = &mut image.files_mut()[0];
        let changed = update_file_option(file, FileOptionField::ObjcClassPrefix, None, &sweeper).unwrap();
        assert!(!changed);
        assert!(file.options().is_none());
        assert_eq!(sweeper.pending(), 0);
    }

    #[test]
    fn test_modify_file_option_skips_well_known_and_keep() {
        let mut image = image(&["google/protobuf/any.proto", "a.proto", "b.proto"]);
        let sweeper = FileOptionSweeper::new();
        let changed = modify_file_option(&mut image, &sweeper, FileOptionField::JavaPackage, |file| {
            Ok(if file.path() == "b.proto" {
                OptionEdit::Keep
            } else {
                OptionEdit::Set(OptionValue::from("com.acme"))
            })
        })
        .unwrap();
        assert_eq!(changed, 1);
        assert!(image.files()[0].options().is_none());
        assert_eq!(image.files()[1].options().unwrap().java_package(), "com.acme");
        assert!(image.files()[2].options().is_none());
        assert_eq!(sweeper.touched_files(), vec!["a.proto".to_string()]);
    }

    #[test]
    fn test_update_failure_registers_no_touch() {
        let mut image = image(&["a.proto"]);
        let sweeper = FileOptionSweeper::new();
        let file = &mut image.files_mut()[0];
        let result = update_file_option(file, FileOptionField::GoPackage, Some(OptionValue::Bool(true)), &sweeper);
        assert!(result.is_err());
        assert_eq!(sweeper.pending(), 0);
    }
}
