//! CLI-specific types.
//!
//! Strong types for the command-line surface: how results are printed and
//! which process exit code a failure maps to.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format.as_str(), "json");
//!
//! assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information with different presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Pretty-printed output with colors for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    ///
    /// # Examples
    ///
    /// ```
    /// use scaffold_core::cli::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Text.as_str(), "text");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::InvalidArgument(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// CLI exit code with semantic meaning.
///
/// Success is 0; failures are non-zero and grouped by what the user has to
/// do about them.
///
/// # Examples
///
/// ```
/// use scaffold_core::cli::ExitCode;
/// use scaffold_core::Error;
/// use std::path::PathBuf;
///
/// let err = Error::FileExists { path: PathBuf::from("pom.xml") };
/// assert_eq!(ExitCode::for_error(&err), ExitCode::CONFLICT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Template set cannot produce a plan (exit code 3).
    pub const PLANNING_ERROR: Self = Self(3);

    /// Target directory already holds conflicting entries (exit code 4).
    pub const CONFLICT: Self = Self(4);

    /// Interrupted by the user (exit code 130, as for SIGINT).
    pub const CANCELLED: Self = Self(130);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Maps an engine error onto the exit code reported for it.
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        if error.is_invalid_input() || error.is_config_error() {
            Self::INVALID_INPUT
        } else if error.is_planning_error() {
            Self::PLANNING_ERROR
        } else if error.is_conflict() {
            Self::CONFLICT
        } else if error.is_cancelled() {
            Self::CANCELLED
        } else {
            Self::ERROR
        }
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
