//! Scaffold CLI library.
//!
//! Exposes the command implementations, the Galasa project layer and the
//! output formatters so they can be tested without spawning the binary.

#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]

pub mod actions;
pub mod commands;
pub mod formatters;
pub mod project;

pub use actions::ConfigAction;
pub use project::ProjectRequest;
