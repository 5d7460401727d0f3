//! Template units and token substitution for project scaffolding.
//!
//! A [`TemplateUnit`] describes one file or directory the generator can
//! produce: which slot it fills, which feature flags it requires, and the
//! path and content templates it renders. A [`TemplateRegistry`] picks the
//! most specific unit per slot for the active [`FeatureSet`].
//!
//! Templates use a single substitution mechanism: `{{Name}}` markers are
//! replaced by bound [`TokenValues`]. There are no conditionals or loops;
//! variation comes from registering alternative units per slot.
//!
//! [`FeatureSet`]: scaffold_core::FeatureSet
//! [`TokenValues`]: scaffold_core::TokenValues

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod bundle;
pub mod registry;
pub mod render;
pub mod unit;

pub use registry::{RegistryBuilder, TemplateRegistry};
pub use render::{referenced_tokens, render};
pub use unit::TemplateUnit;
