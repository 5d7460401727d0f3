//! Template units: one candidate file or directory for a slot.

use crate::render::referenced_tokens;
use scaffold_core::{EntryKind, FeatureSet, SlotName};
use serde::Serialize;

/// A registered candidate for filling one slot.
///
/// The selector is the set of feature flags that must all be active for the
/// unit to be eligible. An empty selector makes the unit the slot's default.
///
/// # Examples
///
/// ```
/// use scaffold_core::{EntryKind, FeatureSet};
/// use scaffold_templates::TemplateUnit;
///
/// let unit = TemplateUnit::file(
///     "sample-test",
///     "{{PackagePath}}/{{ClassName}}.java",
///     "package {{.Package}};\n",
/// )
/// .with_selector(["zos"]);
///
/// assert_eq!(unit.kind(), EntryKind::File);
/// assert!(unit.selector().contains("zos"));
/// assert_eq!(unit.required_tokens(), vec!["PackagePath", "ClassName", "Package"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateUnit {
    slot: SlotName,
    selector: FeatureSet,
    kind: EntryKind,
    path_template: String,
    content_template: String,
}

impl TemplateUnit {
    /// Creates a default (empty selector) file unit.
    #[must_use]
    pub fn file(
        slot: impl Into<SlotName>,
        path_template: impl Into<String>,
        content_template: impl Into<String>,
    ) -> Self {
        Self {
            slot: slot.into(),
            selector: FeatureSet::new(),
            kind: EntryKind::File,
            path_template: path_template.into(),
            content_template: content_template.into(),
        }
    }

    /// Creates a default (empty selector) directory unit.
    #[must_use]
    pub fn directory(slot: impl Into<SlotName>, path_template: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            selector: FeatureSet::new(),
            kind: EntryKind::Directory,
            path_template: path_template.into(),
            content_template: String::new(),
        }
    }

    /// Requires every flag in `flags`, replacing any earlier selector.
    #[must_use]
    pub fn with_selector<'a>(mut self, flags: impl IntoIterator<Item = &'a str>) -> Self {
        self.selector = flags.into_iter().collect();
        self
    }

    /// The slot this unit fills.
    #[must_use]
    pub const fn slot(&self) -> &SlotName {
        &self.slot
    }

    /// Feature flags the unit requires.
    #[must_use]
    pub const fn selector(&self) -> &FeatureSet {
        &self.selector
    }

    /// Whether the unit produces a file or a directory.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Template for the entry's path, relative to the generation root.
    #[must_use]
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// Template for the file body. Always empty for directories.
    #[must_use]
    pub fn content_template(&self) -> &str {
        &self.content_template
    }

    /// Returns `true` if every selector flag is active in `features`.
    #[must_use]
    pub fn is_eligible(&self, features: &FeatureSet) -> bool {
        self.selector.is_subset(features)
    }

    /// Token names the path and content templates reference, path first.
    #[must_use]
    pub fn required_tokens(&self) -> Vec<String> {
        let mut names = referenced_tokens(&self.path_template);
        for name in referenced_tokens(&self.content_template) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
