//! Applying a plan to a filesystem.
//!
//! Entries are processed strictly in plan order. The first failure stops
//! processing; entries created before it stay in place, so a result with a
//! failure can describe a partially created tree. Callers that need an
//! all-or-nothing tree use [`materialize_staged`](crate::materialize_staged).
//!
//! # Examples
//!
//! ```
//! use scaffold_core::TokenValues;
//! use scaffold_files::{MaterializeOptions, apply_to_disk, plan};
//! use scaffold_templates::TemplateUnit;
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let unit = TemplateUnit::file("readme", "docs/README", "hello\n");
//! let plan = plan(temp.path(), [&unit], &TokenValues::new())?;
//!
//! let result = apply_to_disk(&plan, &MaterializeOptions::default());
//! assert!(result.is_success());
//! assert!(temp.path().join("docs/README").exists());
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use crate::sink::{FileSink, OsFileSink};
use crate::types::{Plan, PlannedEntry};
use scaffold_core::{EntryKind, Error, Result};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag asking a running materialization to stop.
///
/// Checked between entries, never in the middle of writing one.
///
/// # Examples
///
/// ```
/// use scaffold_files::CancelFlag;
///
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for applying a plan.
///
/// # Examples
///
/// ```
/// use scaffold_files::MaterializeOptions;
///
/// let options = MaterializeOptions::default()
///     .with_overwrite(true)
///     .with_atomic_writes(false);
/// assert!(options.overwrite);
/// ```
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Replace files that already exist
    pub overwrite: bool,
    /// Write each file through a temporary file and rename
    pub atomic: bool,
    cancel: Option<CancelFlag>,
}

impl MaterializeOptions {
    /// Creates options with defaults.
    ///
    /// Defaults:
    /// - overwrite: false
    /// - atomic: true
    /// - no cancel flag
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overwrite: false,
            atomic: true,
            cancel: None,
        }
    }

    /// Sets whether existing files are replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to use atomic writes.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Attaches a cancel flag checked between entries.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The attached cancel flag, if any.
    #[must_use]
    pub const fn cancel_flag(&self) -> Option<&CancelFlag> {
        self.cancel.as_ref()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The entry that stopped a materialization and why.
#[derive(Debug)]
pub struct MaterializationFailure {
    /// Path of the entry that failed or was not reached
    pub path: PathBuf,
    /// The failure itself
    pub error: Error,
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct MaterializationResult {
    /// Entries now present, in plan order. Directories that already existed
    /// are included.
    pub created_paths: Vec<PathBuf>,
    /// First failure, if processing stopped early
    pub failure: Option<MaterializationFailure>,
}

impl MaterializationResult {
    /// Returns `true` if every entry was processed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts into a `Result`, keeping the created paths on success.
    ///
    /// # Errors
    ///
    /// Returns the recorded failure's error.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        match self.failure {
            None => Ok(self.created_paths),
            Some(failure) => Err(failure.error),
        }
    }
}

/// Applies `plan` to `sink`.
///
/// Never panics or returns early with an error; failures are reported in
/// the result along with everything created before them.
pub fn apply<S: FileSink + ?Sized>(
    plan: &Plan,
    sink: &mut S,
    options: &MaterializeOptions,
) -> MaterializationResult {
    let mut result = MaterializationResult::default();
    tracing::info!(
        root = %plan.root().display(),
        entries = plan.len(),
        overwrite = options.overwrite,
        "Materializing plan"
    );

    for entry in plan {
        let path = entry.path().to_path_buf();

        if options.is_cancelled() {
            tracing::warn!(path = %path.display(), "Materialization cancelled");
            result.failure = Some(MaterializationFailure {
                error: Error::Cancelled { path: path.clone() },
                path,
            });
            break;
        }

        match apply_entry(entry, sink, options.overwrite) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), kind = %entry.kind(), "Created entry");
                result.created_paths.push(path);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "Materialization failed");
                result.failure = Some(MaterializationFailure { path, error });
                break;
            }
        }
    }

    if result.is_success() {
        tracing::info!(created = result.created_paths.len(), "Materialization complete");
    }
    result
}

/// Applies `plan` to the real filesystem.
#[must_use]
pub fn apply_to_disk(plan: &Plan, options: &MaterializeOptions) -> MaterializationResult {
    let mut sink = OsFileSink::new().with_atomic_writes(options.atomic);
    apply(plan, &mut sink, options)
}

fn apply_entry<S: FileSink + ?Sized>(
    entry: &PlannedEntry,
    sink: &mut S,
    overwrite: bool,
) -> Result<()> {
    let path = entry.path();
    let io_error = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let existing = sink.entry_kind(path).map_err(io_error)?;

    match (entry.kind(), existing) {
        (EntryKind::Directory, Some(EntryKind::Directory)) => Ok(()),
        (EntryKind::Directory, Some(EntryKind::File))
        | (EntryKind::File, Some(EntryKind::Directory)) => Err(Error::PathConflict {
            path: path.to_path_buf(),
        }),
        (EntryKind::Directory, None) => sink.create_dir(path).map_err(io_error),
        (EntryKind::File, Some(EntryKind::File)) if !overwrite => Err(Error::FileExists {
            path: path.to_path_buf(),
        }),
        (EntryKind::File, _) => {
            sink.write_file(path, entry.content(), overwrite)
                .map_err(|source| {
                    // Created by someone else between the check and the write.
                    if !overwrite && source.kind() == io::ErrorKind::AlreadyExists {
                        Error::FileExists {
                            path: path.to_path_buf(),
                        }
                    } else {
                        io_error(source)
                    }
                })
        }
    }
}
