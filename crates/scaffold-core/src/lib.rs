//! Core types and errors for the project scaffolding generator.
//!
//! This crate provides the foundational types shared by the template
//! registry, the tree planner and the CLI.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong request types (`FeatureSet`, `TokenValues`, `SlotName`, `EntryKind`)
//! - Validated Java naming types (`JavaPackageName`, `FeatureName`)
//! - The error hierarchy, split into planning and materialization failures
//! - CLI types (`OutputFormat`, `ExitCode`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod package;
mod types;

pub mod cli;

pub use error::{Error, Result};
pub use package::{FeatureName, JavaPackageName};
pub use types::{EntryKind, FeatureSet, SlotName, TokenValues};
