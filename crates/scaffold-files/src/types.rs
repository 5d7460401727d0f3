//! Plan types: validated relative paths and planned entries.
//!
//! # Examples
//!
//! ```
//! use scaffold_files::RelativePath;
//!
//! let path = RelativePath::new("com/acme/tests/SampleTest.java")?;
//! assert_eq!(path.file_name(), "SampleTest.java");
//!
//! assert!(RelativePath::new("/etc/passwd").is_err());
//! assert!(RelativePath::new("a/../b").is_err());
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use scaffold_core::{EntryKind, Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A rendered path, relative to the generation root.
///
/// Paths always use `/` as the separator regardless of platform, and are
/// converted to native paths only when joined onto the root. A valid path:
/// - is not empty
/// - is not absolute (no leading `/` or `\`, no drive prefix such as `C:`)
/// - has no empty, `.` or `..` segments
/// - contains no `\`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(String);

impl RelativePath {
    /// Validates a rendered path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] naming the path and the first rule it
    /// breaks.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        match check_relative(&path) {
            Ok(()) => Ok(Self(path)),
            Err(reason) => Err(Error::InvalidPath {
                path,
                reason: reason.to_string(),
            }),
        }
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Returns the last segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Proper ancestors from the outermost inwards: `a/b/c` yields `a`, `a/b`.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + '_ {
        self.0
            .match_indices('/')
            .map(|(i, _)| Self(self.0[..i].to_string()))
    }

    /// Joins the path onto `root` using native separators.
    #[must_use]
    pub fn under(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.segments());
        path
    }
}

fn check_relative(path: &str) -> std::result::Result<(), &'static str> {
    if path.is_empty() {
        return Err("path is empty");
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err("path must be relative");
    }
    if path.contains('\\') {
        return Err("path must use '/' as the separator");
    }
    let mut chars = path.chars();
    if let (Some(drive), Some(':')) = (chars.next(), chars.next())
        && drive.is_ascii_alphabetic()
    {
        return Err("path must be relative");
    }
    for segment in path.split('/') {
        match segment {
            "" => return Err("path contains an empty segment"),
            "." | ".." => return Err("path contains a '.' or '..' segment"),
            _ => {}
        }
    }
    Ok(())
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One directory or file the materializer will create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedEntry {
    path: PathBuf,
    kind: EntryKind,
    content: String,
}

impl PlannedEntry {
    /// A directory entry.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            content: String::new(),
        }
    }

    /// A file entry with fully rendered content.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            content: content.into(),
        }
    }

    /// Target path, rooted at the plan's root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// File content. Empty for directories.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns `true` for directory entries.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

/// An ordered, conflict-free list of entries to create.
///
/// The first entry is always the root directory, and every entry comes
/// after all of its ancestor directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    root: PathBuf,
    entries: Vec<PlannedEntry>,
}

impl Plan {
    pub(crate) const fn new(root: PathBuf, entries: Vec<PlannedEntry>) -> Self {
        Self { root, entries }
    }

    /// Root directory the plan was built for.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in creation order.
    #[must_use]
    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    /// Iterates over entries in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, PlannedEntry> {
        self.entries.iter()
    }

    /// Looks up the entry for `path`.
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&PlannedEntry> {
        let path = path.as_ref();
        self.entries.iter().find(|e| e.path == path)
    }

    /// Number of file entries.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_directory()).count()
    }

    /// Number of directory entries, the root included.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_directory()).count()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the plan has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy of the plan rooted at `root` instead.
    ///
    /// Used to materialize into a staging directory.
    #[must_use]
    pub fn rebased(&self, root: &Path) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let relative = entry.path.strip_prefix(&self.root).unwrap_or(&entry.path);
                let path = if relative.as_os_str().is_empty() {
                    root.to_path_buf()
                } else {
                    root.join(relative)
                };
                PlannedEntry {
                    path,
                    kind: entry.kind,
                    content: entry.content.clone(),
                }
            })
            .collect();
        Self::new(root.to_path_buf(), entries)
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlannedEntry;
    type IntoIter = std::slice::Iter<'a, PlannedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
