//! Templates command implementation.
//!
//! Lists every slot of the built-in bundle with its candidate units.

use anyhow::{Context, Result};
use scaffold_core::EntryKind;
use scaffold_core::cli::{ExitCode, OutputFormat};
use scaffold_templates::TemplateRegistry;
use scaffold_templates::bundle::builtin_registry;
use serde::Serialize;
use tracing::info;

/// All slots of a registry, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListing {
    /// Number of units across all slots
    pub unit_count: usize,
    /// Slot entries
    pub slots: Vec<SlotListing>,
}

/// One slot and its candidate units.
#[derive(Debug, Clone, Serialize)]
pub struct SlotListing {
    /// Slot name
    pub slot: String,
    /// Units registered for the slot
    pub units: Vec<UnitListing>,
}

/// One candidate unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitListing {
    /// Flags the unit needs; empty for the default unit
    pub selector: Vec<String>,
    /// Directory or file
    pub kind: EntryKind,
    /// Unrendered target path
    pub path: String,
    /// Tokens the unit references
    pub tokens: Vec<String>,
}

/// Describes every slot in `registry`.
#[must_use]
pub fn list(registry: &TemplateRegistry) -> TemplateListing {
    let slots = registry
        .all_slots()
        .iter()
        .map(|slot| SlotListing {
            slot: slot.to_string(),
            units: registry
                .units(slot.as_str())
                .iter()
                .map(|unit| UnitListing {
                    selector: unit.selector().iter().map(str::to_string).collect(),
                    kind: unit.kind(),
                    path: unit.path_template().to_string(),
                    tokens: unit.required_tokens(),
                })
                .collect(),
        })
        .collect();

    TemplateListing {
        unit_count: registry.len(),
        slots,
    }
}

/// Runs the templates command for the built-in bundle.
pub async fn run(output_format: OutputFormat) -> Result<ExitCode> {
    let registry = builtin_registry()?;
    info!(slots = registry.all_slots().len(), "Listing templates");

    let output = crate::formatters::format_output(&list(&registry), output_format)
        .context("failed to format template listing")?;
    println!("{output}");

    Ok(ExitCode::SUCCESS)
}
