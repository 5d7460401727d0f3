//! Planning and materializing project trees.
//!
//! The [`plan`] step renders selected template units into an ordered,
//! validated [`Plan`] without touching the filesystem. The [`apply`] step
//! writes a plan through a [`FileSink`], refusing to replace existing files
//! unless asked to and stopping at the first failure.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::{FeatureSet, TokenValues};
//! use scaffold_files::{MaterializeOptions, MemorySink, apply, plan};
//! use scaffold_templates::{TemplateRegistry, TemplateUnit};
//!
//! let registry = TemplateRegistry::builder()
//!     .register(TemplateUnit::file("greeting", "{{Name}}.txt", "Hello {{Name}}"))
//!     .build()?;
//! let units = registry.resolve_all(["greeting"], &FeatureSet::new())?;
//! let values = TokenValues::new().with("Name", "world");
//!
//! let plan = plan("out", units, &values)?;
//! let mut sink = MemorySink::new();
//! let result = apply(&plan, &mut sink, &MaterializeOptions::default());
//!
//! assert!(result.is_success());
//! assert_eq!(sink.content("out/world.txt".as_ref()), Some("Hello world"));
//! # Ok::<(), scaffold_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod materialize;
mod plan;
mod sink;
mod staging;
mod types;

pub use materialize::{
    CancelFlag, MaterializationFailure, MaterializationResult, MaterializeOptions, apply,
    apply_to_disk,
};
pub use plan::{PlanBuilder, plan};
pub use sink::{FileSink, MemorySink, OsFileSink};
pub use staging::materialize_staged;
pub use types::{Plan, PlannedEntry, RelativePath};
