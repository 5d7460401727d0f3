//! Command implementations for the scaffold CLI.
//!
//! Each command module parses its arguments, runs the operation and prints
//! its result in the requested output format.

pub mod completions;
pub mod config;
pub mod create;
pub mod templates;

use scaffold_core::cli::ExitCode;

/// Maps a command failure onto the process exit code.
///
/// The first generator error found in the error chain decides the code;
/// anything else is a general error.
#[must_use]
pub fn exit_code(error: &anyhow::Error) -> ExitCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<scaffold_core::Error>())
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}
