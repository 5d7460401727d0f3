//! Error types for project scaffolding.
//!
//! Every failure the engine can report lives in one [`Error`] enum. Variants
//! carry the slot or path they concern so a message is actionable without
//! re-running in a debug mode.
//!
//! Errors fall into two phases:
//!
//! - **Planning** (`UnboundToken`, `StrayDelimiter`, `AmbiguousTemplate`,
//!   `NoTemplateForSlot`, `DuplicateTargetPath`, `InvalidPath`): raised
//!   before any filesystem mutation.
//! - **Materialization** (`PathConflict`, `FileExists`, `TargetExists`, `Io`,
//!   `Cancelled`):
//!   raised while applying a plan; entries written earlier stay on disk.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::{Error, Result};
//!
//! fn lookup(slot: &str) -> Result<()> {
//!     Err(Error::NoTemplateForSlot {
//!         slot: slot.to_string(),
//!         features: "zos".to_string(),
//!     })
//! }
//!
//! let err = lookup("sample-test").unwrap_err();
//! assert!(err.is_planning_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the scaffolding engine.
#[derive(Error, Debug)]
pub enum Error {
    /// A template references a token with no bound value.
    ///
    /// `slot` is filled in by the planner; a bare `render` call leaves it
    /// empty.
    #[error("{}", unbound_message(token, slot.as_deref()))]
    UnboundToken {
        /// Name of the token that has no value
        token: String,
        /// Slot whose template referenced the token, when known
        slot: Option<String>,
    },

    /// A template has `{{` or `}}` outside a token marker, or a brace that
    /// touches a marker, so its output could contain a marker.
    #[error("{}", stray_message(*offset, slot.as_deref()))]
    StrayDelimiter {
        /// Byte offset of the offending brace in the template
        offset: usize,
        /// Slot whose template holds the brace, when known
        slot: Option<String>,
    },

    /// Two units in one slot can tie for the same feature set.
    #[error("Ambiguous templates for slot '{slot}': selector {selector} has no unique match")]
    AmbiguousTemplate {
        /// Slot holding the conflicting units
        slot: String,
        /// Feature set on which the units tie, rendered as `{a, b}`
        selector: String,
    },

    /// No registered unit is eligible for the requested slot and features.
    #[error("No template for slot '{slot}' with features {features}")]
    NoTemplateForSlot {
        /// Requested slot
        slot: String,
        /// Active feature set, rendered as `{a, b}`
        features: String,
    },

    /// Two planned entries resolve to the same path with different kinds or
    /// contents.
    #[error("Duplicate target path: {}", path.display())]
    DuplicateTargetPath {
        /// Colliding path
        path: PathBuf,
    },

    /// A rendered path is not a safe relative path.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The rendered path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The target holds an entry of the wrong kind (file where a directory
    /// is planned, or the reverse).
    #[error("Path conflict: {} already exists with a different kind", path.display())]
    PathConflict {
        /// Conflicting path
        path: PathBuf,
    },

    /// A planned file already exists and overwriting was not requested.
    #[error("File '{}' exists. Use the --force flag to overwrite it.", path.display())]
    FileExists {
        /// Existing file
        path: PathBuf,
    },

    /// A staged generation's target already exists.
    #[error("Target '{}' already exists; staged generation needs a new directory", path.display())]
    TargetExists {
        /// Existing target root
        path: PathBuf,
    },

    /// Underlying I/O failure while touching `path`.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being created or inspected
        path: PathBuf,
        /// Underlying error cause
        #[source]
        source: std::io::Error,
    },

    /// Materialization was cancelled before `path` was processed.
    #[error("Cancelled before {}", path.display())]
    Cancelled {
        /// First entry that was not processed
        path: PathBuf,
    },

    /// Package name cannot be used as a Java package.
    #[error("Invalid Java package name '{name}': {reason}")]
    InvalidPackageName {
        /// Rejected name
        name: String,
        /// Description of the problem
        reason: String,
    },

    /// Feature name cannot form part of a Java package.
    #[error("Invalid feature name '{name}': {reason}")]
    InvalidFeatureName {
        /// Rejected name
        name: String,
        /// Description of the problem
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn unbound_message(token: &str, slot: Option<&str>) -> String {
    match slot {
        Some(slot) => format!("Unbound token '{token}' in template for slot '{slot}'"),
        None => format!("Unbound token '{token}'"),
    }
}

fn stray_message(offset: usize, slot: Option<&str>) -> String {
    match slot {
        Some(slot) => {
            format!("Stray '{{{{' or '}}}}' at byte {offset} in template for slot '{slot}'")
        }
        None => format!("Stray '{{{{' or '}}}}' at byte {offset}"),
    }
}

impl Error {
    /// Attaches the slot name to an [`Error::UnboundToken`] or
    /// [`Error::StrayDelimiter`].
    ///
    /// Other variants are returned unchanged, as is an error that already
    /// names its slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaffold_core::Error;
    ///
    /// let err = Error::UnboundToken { token: "Package".into(), slot: None }
    ///     .with_slot("sample-test");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Unbound token 'Package' in template for slot 'sample-test'"
    /// );
    /// ```
    #[must_use]
    pub fn with_slot(self, slot: &str) -> Self {
        match self {
            Self::UnboundToken { token, slot: None } => Self::UnboundToken {
                token,
                slot: Some(slot.to_string()),
            },
            Self::StrayDelimiter { offset, slot: None } => Self::StrayDelimiter {
                offset,
                slot: Some(slot.to_string()),
            },
            other => other,
        }
    }

    /// Returns `true` if this error is raised before any filesystem change.
    #[must_use]
    pub const fn is_planning_error(&self) -> bool {
        matches!(
            self,
            Self::UnboundToken { .. }
                | Self::StrayDelimiter { .. }
                | Self::AmbiguousTemplate { .. }
                | Self::NoTemplateForSlot { .. }
                | Self::DuplicateTargetPath { .. }
                | Self::InvalidPath { .. }
        )
    }

    /// Returns `true` if the target already holds an incompatible entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaffold_core::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::FileExists { path: PathBuf::from("pom.xml") };
    /// assert!(err.is_conflict());
    /// ```
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::FileExists { .. } | Self::PathConflict { .. } | Self::TargetExists { .. }
        )
    }

    /// Returns `true` if this is an unbound token error.
    #[must_use]
    pub const fn is_unbound_token(&self) -> bool {
        matches!(self, Self::UnboundToken { .. })
    }

    /// Returns `true` if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if the caller supplied an unusable value.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidPackageName { .. }
                | Self::InvalidFeatureName { .. }
                | Self::InvalidArgument(_)
        )
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns the filesystem path the error concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DuplicateTargetPath { path }
            | Self::PathConflict { path }
            | Self::FileExists { path }
            | Self::TargetExists { path }
            | Self::Io { path, .. }
            | Self::Cancelled { path } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias using the scaffolding [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
