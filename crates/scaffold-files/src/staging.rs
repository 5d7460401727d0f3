//! All-or-nothing materialization through a staging directory.

use crate::materialize::{MaterializeOptions, apply_to_disk};
use crate::types::Plan;
use scaffold_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Materializes `plan` into a sibling staging directory and renames it onto
/// the plan's root only if every entry succeeded.
///
/// The root must not exist yet. On failure the staging directory is
/// removed and the root is never created, so the caller sees either the
/// complete tree or nothing.
///
/// # Errors
///
/// - [`Error::TargetExists`] if the root already exists
/// - any materialization error, with paths reported under the root
/// - [`Error::Io`] if the staging directory cannot be created or renamed
///
/// # Examples
///
/// ```
/// use scaffold_core::TokenValues;
/// use scaffold_files::{MaterializeOptions, materialize_staged, plan};
/// use scaffold_templates::TemplateUnit;
/// # use tempfile::TempDir;
///
/// # let temp = TempDir::new().unwrap();
/// let root = temp.path().join("project");
/// let unit = TemplateUnit::file("readme", "README", "hello\n");
/// let plan = plan(&root, [&unit], &TokenValues::new())?;
///
/// let created = materialize_staged(&plan, &MaterializeOptions::default())?;
/// assert_eq!(created.len(), 2);
/// assert!(root.join("README").exists());
/// # Ok::<(), scaffold_core::Error>(())
/// ```
pub fn materialize_staged(plan: &Plan, options: &MaterializeOptions) -> Result<Vec<PathBuf>> {
    let root = plan.root();
    if root.exists() {
        return Err(Error::TargetExists {
            path: root.to_path_buf(),
        });
    }

    let parent = root
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let io_error = |path: &Path, source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;

    let staging = staging_dir_in(parent).map_err(|e| io_error(parent, e))?;
    let staged_plan = plan.rebased(staging.path());
    tracing::debug!(staging = %staging.path().display(), "Staging generation");

    let staged_paths = apply_to_disk(&staged_plan, options)
        .into_result()
        .map_err(|e| relocate(e, staging.path(), root))?;

    let staging_path = move_into_place(staging, root)?;

    tracing::info!(root = %root.display(), entries = staged_paths.len(), "Moved staged tree into place");
    Ok(staged_paths
        .iter()
        .map(|p| move_under(p, &staging_path, root))
        .collect())
}

/// Renames the finished staging directory onto `root`.
///
/// `rename(2)` silently replaces an empty directory, so the root is checked
/// again here rather than trusted from the start of the run.
fn move_into_place(staging: tempfile::TempDir, root: &Path) -> Result<PathBuf> {
    if root.exists() {
        return Err(Error::TargetExists {
            path: root.to_path_buf(),
        });
    }

    let staging_path = staging.keep();
    if let Err(e) = fs::rename(&staging_path, root) {
        if let Err(cleanup) = fs::remove_dir_all(&staging_path) {
            tracing::warn!(
                staging = %staging_path.display(),
                error = %cleanup,
                "Failed to remove staging directory"
            );
        }
        return Err(if root.exists() {
            Error::TargetExists {
                path: root.to_path_buf(),
            }
        } else {
            Error::Io {
                path: root.to_path_buf(),
                source: e,
            }
        });
    }
    Ok(staging_path)
}

/// Creates the staging directory with the mode `fs::create_dir` would give
/// the root, since it is renamed into place as the root.
#[cfg(unix)]
fn staging_dir_in(parent: &Path) -> std::io::Result<tempfile::TempDir> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .prefix(".scaffold-staging-")
        .permissions(fs::Permissions::from_mode(0o777))
        .tempdir_in(parent)
}

#[cfg(not(unix))]
fn staging_dir_in(parent: &Path) -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(".scaffold-staging-")
        .tempdir_in(parent)
}

fn move_under(path: &Path, from: &Path, to: &Path) -> PathBuf {
    match path.strip_prefix(from) {
        Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
        Ok(rest) => to.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Rewrites an error's staging path into the equivalent target path.
fn relocate(error: Error, from: &Path, to: &Path) -> Error {
    match error {
        Error::PathConflict { path } => Error::PathConflict {
            path: move_under(&path, from, to),
        },
        Error::FileExists { path } => Error::FileExists {
            path: move_under(&path, from, to),
        },
        Error::Io { path, source } => Error::Io {
            path: move_under(&path, from, to),
            source,
        },
        Error::Cancelled { path } => Error::Cancelled {
            path: move_under(&path, from, to),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CancelFlag;
    use crate::types::PlannedEntry;
    use tempfile::TempDir;

    fn plan_under(root: &Path) -> Plan {
        Plan::new(
            root.to_path_buf(),
            vec![
                PlannedEntry::directory(root),
                PlannedEntry::directory(root.join("a")),
                PlannedEntry::file(root.join("a").join("one.txt"), "1"),
            ],
        )
    }

    fn leftover_staging(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".scaffold-staging-"))
            .count()
    }

    #[test]
    fn test_staged_success() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");

        let created = materialize_staged(&plan_under(&root), &MaterializeOptions::default()).unwrap();

        assert_eq!(created[0], root);
        assert_eq!(created[2], root.join("a").join("one.txt"));
        assert_eq!(fs::read_to_string(root.join("a/one.txt")).unwrap(), "1");
        assert_eq!(leftover_staging(temp.path()), 0);
    }

    #[test]
    fn test_staged_requires_new_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        fs::create_dir(&root).unwrap();

        let err = materialize_staged(&plan_under(&root), &MaterializeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::TargetExists { .. }));
    }

    #[test]
    fn test_move_into_place_does_not_replace_existing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        let staging = staging_dir_in(temp.path()).unwrap();
        fs::write(staging.path().join("one.txt"), "1").unwrap();
        fs::create_dir(&root).unwrap();

        let err = move_into_place(staging, &root).unwrap_err();

        assert!(matches!(err, Error::TargetExists { .. }));
        assert!(!root.join("one.txt").exists());
        assert_eq!(leftover_staging(temp.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_staged_root_gets_default_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        let reference = temp.path().join("reference");
        fs::create_dir(&reference).unwrap();

        materialize_staged(&plan_under(&root), &MaterializeOptions::default()).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&root), mode(&reference));
        assert_eq!(mode(&root.join("a/one.txt")) & 0o600, 0o600);
    }

    #[test]
    fn test_staged_failure_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        let flag = CancelFlag::new();
        flag.cancel();
        let options = MaterializeOptions::default().with_cancel_flag(flag);

        let err = materialize_staged(&plan_under(&root), &options).unwrap_err();

        match err {
            Error::Cancelled { path } => assert_eq!(path, root),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!root.exists());
        assert_eq!(leftover_staging(temp.path()), 0);
    }
}
