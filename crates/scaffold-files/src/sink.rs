//! Filesystem access used by the materializer.
//!
//! [`FileSink`] is the seam between plan application and the real
//! filesystem. [`OsFileSink`] writes to disk; [`MemorySink`] keeps entries
//! in memory and can inject failures, which makes partial-failure behavior
//! testable without touching disk.

use scaffold_core::EntryKind;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Minimal filesystem operations needed to apply a plan.
pub trait FileSink {
    /// Reports what currently exists at `path`, if anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Creates the directory at `path`. Its parent already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir(&mut self, path: &Path) -> io::Result<()>;

    /// Writes `content` to the file at `path`.
    ///
    /// With `overwrite` unset the write fails with
    /// [`io::ErrorKind::AlreadyExists`] rather than replace a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()>;
}

/// Sink backed by the operating system's filesystem.
///
/// Atomic mode writes each file to a temporary sibling and renames it into
/// place, so a crash never leaves a half-written file behind.
#[derive(Debug, Clone, Copy)]
pub struct OsFileSink {
    atomic: bool,
}

impl OsFileSink {
    /// Creates a sink with atomic writes enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { atomic: true }
    }

    /// Enables or disables atomic writes.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }
}

impl Default for OsFileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSink for OsFileSink {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()> {
        if !self.atomic {
            let mut file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(overwrite)
                .create_new(!overwrite)
                .open(path)?;
            return file.write_all(content.as_bytes());
        }

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = temp_file_in(parent)?;
        temp.write_all(content.as_bytes())?;
        if overwrite {
            match fs::metadata(path) {
                Ok(existing) => temp.as_file().set_permissions(existing.permissions())?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        temp.as_file().sync_all()?;

        if overwrite {
            temp.persist(path).map_err(|e| e.error)?;
        } else {
            temp.persist_noclobber(path).map_err(|e| e.error)?;
        }
        Ok(())
    }
}

/// Creates the temporary sibling with the mode a plain `File::create`
/// would get, rather than tempfile's owner-only default.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// In-memory sink.
///
/// Starts empty or pre-populated, records every entry it is asked to
/// create, and can fail on chosen paths.
///
/// # Examples
///
/// ```
/// use scaffold_core::EntryKind;
/// use scaffold_files::{FileSink, MemorySink};
/// use std::io;
/// use std::path::Path;
///
/// let mut sink = MemorySink::new().with_failure("out/b.txt", io::ErrorKind::PermissionDenied);
/// sink.create_dir(Path::new("out"))?;
/// sink.write_file(Path::new("out/a.txt"), "a", false)?;
///
/// assert_eq!(sink.entry_kind(Path::new("out"))?, Some(EntryKind::Directory));
/// assert_eq!(sink.content(Path::new("out/a.txt")), Some("a"));
/// assert!(sink.write_file(Path::new("out/b.txt"), "b", false).is_err());
/// # Ok::<(), io::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    failures: HashMap<PathBuf, io::ErrorKind>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Pre-populates a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Makes any creation at `path` fail with `kind`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.failures.insert(path.into(), kind);
        self
    }

    /// Content of the file at `path`.
    #[must_use]
    pub fn content(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Returns `true` if a directory exists at `path`.
    #[must_use]
    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    /// Number of files held.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn check_failure(&self, path: &Path) -> io::Result<()> {
        match self.failures.get(path) {
            Some(kind) => Err(io::Error::new(*kind, "injected failure")),
            None => Ok(()),
        }
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("parent directory {} does not exist", parent.display()),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl FileSink for MemorySink {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        if self.dirs.contains(path) {
            Ok(Some(EntryKind::Directory))
        } else if self.files.contains_key(path) {
            Ok(Some(EntryKind::File))
        } else {
            Ok(None)
        }
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        self.check_failure(path)?;
        if self.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a file exists at this path",
            ));
        }
        self.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&mut self, path: &Path, content: &str, overwrite: bool) -> io::Result<()> {
        self.check_failure(path)?;
        self.check_parent(path)?;
        if self.dirs.contains(path) || (!overwrite && self.files.contains_key(path)) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "path exists"));
        }
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
