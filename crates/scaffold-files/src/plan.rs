//! Tree planning: rendering template units into an ordered entry list.
//!
//! Planning touches no filesystem. It either yields a complete [`Plan`] or
//! the first error; there is no partial plan.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::TokenValues;
//! use scaffold_files::plan;
//! use scaffold_templates::TemplateUnit;
//! use std::path::Path;
//!
//! let unit = TemplateUnit::file(
//!     "sample-test",
//!     "{{PackagePath}}/{{ClassName}}.java",
//!     "package {{.Package}};\n",
//! );
//! let values = TokenValues::new()
//!     .with("Package", "com.acme.tests")
//!     .with("PackagePath", "com/acme/tests")
//!     .with("ClassName", "SampleTest");
//!
//! let plan = plan("out", [&unit], &values)?;
//! let paths: Vec<_> = plan.iter().map(|e| e.path().to_path_buf()).collect();
//! assert_eq!(paths[0], Path::new("out"));
//! assert_eq!(plan.len(), 5);
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use crate::types::{Plan, PlannedEntry, RelativePath};
use scaffold_core::{EntryKind, Error, Result, TokenValues};
use scaffold_templates::{TemplateUnit, render};
use std::collections::HashMap;
use std::path::PathBuf;

/// Plans `units` under `root` with one set of token values.
///
/// # Errors
///
/// See [`PlanBuilder::build`].
pub fn plan<'a>(
    root: impl Into<PathBuf>,
    units: impl IntoIterator<Item = &'a TemplateUnit>,
    values: &TokenValues,
) -> Result<Plan> {
    PlanBuilder::new(root).add_units(units, values).build()
}

/// Builder for a [`Plan`] assembled from several batches of units.
///
/// Each batch is rendered with its own token values, so one plan can hold
/// a parent project and several child projects that bind the same token
/// names differently. Errors are recorded and reported by
/// [`build`](Self::build); batches added after an error are ignored.
///
/// # Examples
///
/// ```
/// use scaffold_core::TokenValues;
/// use scaffold_files::PlanBuilder;
/// use scaffold_templates::TemplateUnit;
///
/// let readme = TemplateUnit::file("readme", "{{Name}}/README", "{{Name}}\n");
///
/// let plan = PlanBuilder::new("out")
///     .add_units([&readme], &TokenValues::new().with("Name", "alpha"))
///     .add_units([&readme], &TokenValues::new().with("Name", "beta"))
///     .build()?;
///
/// assert_eq!(plan.file_count(), 2);
/// # Ok::<(), scaffold_core::Error>(())
/// ```
#[derive(Debug)]
pub struct PlanBuilder {
    root: PathBuf,
    entries: Vec<PlannedEntry>,
    index: HashMap<PathBuf, usize>,
    error: Option<Error>,
}

impl PlanBuilder {
    /// Starts a plan whose first entry is the `root` directory.
    ///
    /// An empty root means the current directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut root = root.into();
        if root.as_os_str().is_empty() {
            root = PathBuf::from(".");
        }

        let mut builder = Self {
            root: root.clone(),
            entries: Vec::new(),
            index: HashMap::new(),
            error: None,
        };
        builder.index.insert(root.clone(), 0);
        builder.entries.push(PlannedEntry::directory(root));
        builder
    }

    /// Renders and adds a batch of units with `values`.
    #[must_use]
    pub fn add_units<'a>(
        mut self,
        units: impl IntoIterator<Item = &'a TemplateUnit>,
        values: &TokenValues,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        for unit in units {
            if let Err(e) = self.add_unit(unit, values) {
                self.error = Some(e);
                break;
            }
        }
        self
    }

    /// Consumes the builder and returns the plan.
    ///
    /// # Errors
    ///
    /// Returns the first error met while adding units:
    /// - [`Error::UnboundToken`] naming the token and slot
    /// - [`Error::InvalidPath`] if a rendered path is not a safe relative path
    /// - [`Error::DuplicateTargetPath`] if two entries claim one path with
    ///   different kinds or contents
    pub fn build(self) -> Result<Plan> {
        if let Some(error) = self.error {
            return Err(error);
        }
        tracing::debug!(
            root = %self.root.display(),
            entries = self.entries.len(),
            "Planned project tree"
        );
        Ok(Plan::new(self.root, self.entries))
    }

    fn add_unit(&mut self, unit: &TemplateUnit, values: &TokenValues) -> Result<()> {
        let slot = unit.slot().as_str();
        let rendered = render(unit.path_template(), values).map_err(|e| e.with_slot(slot))?;
        let relative = RelativePath::new(rendered)?;

        let entry = match unit.kind() {
            EntryKind::Directory => PlannedEntry::directory(relative.under(&self.root)),
            EntryKind::File => {
                let content =
                    render(unit.content_template(), values).map_err(|e| e.with_slot(slot))?;
                PlannedEntry::file(relative.under(&self.root), content)
            }
        };

        for ancestor in relative.ancestors() {
            self.insert(PlannedEntry::directory(ancestor.under(&self.root)))?;
        }
        tracing::trace!(slot, path = %relative, kind = %unit.kind(), "Planned entry");
        self.insert(entry)
    }

    /// Adds `entry` unless an identical entry is already planned.
    fn insert(&mut self, entry: PlannedEntry) -> Result<()> {
        if let Some(&existing) = self.index.get(entry.path()) {
            if self.entries[existing] == entry {
                return Ok(());
            }
            return Err(Error::DuplicateTargetPath {
                path: entry.path().to_path_buf(),
            });
        }
        self.index
            .insert(entry.path().to_path_buf(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }
}
