//! Template registry with most-specific selection.
//!
//! Units are grouped by slot. For a given active [`FeatureSet`], the
//! eligible units of a slot are those whose selector is a subset of the
//! active features, and the chosen unit is the eligible one with the
//! largest selector.
//!
//! Registration is validated up front: a registry that could ever tie
//! between two units is rejected by [`RegistryBuilder::build`], so
//! [`TemplateRegistry::resolve`] never has to break ties.

use crate::unit::TemplateUnit;
use scaffold_core::{Error, FeatureSet, Result, SlotName};
use std::collections::HashMap;

/// Immutable, validated collection of template units.
///
/// Built once through [`TemplateRegistry::builder`] and read-only
/// afterwards, so it can be shared across threads.
///
/// # Examples
///
/// ```
/// use scaffold_core::FeatureSet;
/// use scaffold_templates::{TemplateRegistry, TemplateUnit};
///
/// let registry = TemplateRegistry::builder()
///     .register(TemplateUnit::file("sample-test", "Sample.java", "default"))
///     .register(TemplateUnit::file("sample-test", "Sample.java", "zos").with_selector(["zos"]))
///     .build()?;
///
/// let unit = registry.resolve("sample-test", &FeatureSet::parse("zos"))?;
/// assert_eq!(unit.content_template(), "zos");
///
/// let unit = registry.resolve("sample-test", &FeatureSet::new())?;
/// assert_eq!(unit.content_template(), "default");
/// # Ok::<(), scaffold_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    slots: Vec<SlotName>,
    units: HashMap<SlotName, Vec<TemplateUnit>>,
}

impl TemplateRegistry {
    /// Starts a new registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Picks the most specific eligible unit for `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTemplateForSlot`] if the slot is unknown or none
    /// of its units is eligible for `features`.
    pub fn resolve(&self, slot: &str, features: &FeatureSet) -> Result<&TemplateUnit> {
        let chosen = self
            .units
            .get(&SlotName::from(slot))
            .and_then(|units| {
                units
                    .iter()
                    .filter(|unit| unit.is_eligible(features))
                    .max_by_key(|unit| unit.selector().len())
            })
            .ok_or_else(|| Error::NoTemplateForSlot {
                slot: slot.to_string(),
                features: features.to_string(),
            })?;

        tracing::debug!(
            slot,
            selector = %chosen.selector(),
            features = %features,
            "Resolved template"
        );
        Ok(chosen)
    }

    /// Resolves every slot in `slots`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub fn resolve_all<'a, I>(&self, slots: I, features: &FeatureSet) -> Result<Vec<&TemplateUnit>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        slots
            .into_iter()
            .map(|slot| self.resolve(slot, features))
            .collect()
    }

    /// Slot names in first-registration order.
    #[must_use]
    pub fn all_slots(&self) -> &[SlotName] {
        &self.slots
    }

    /// All units registered for `slot`, in registration order.
    #[must_use]
    pub fn units(&self, slot: &str) -> &[TemplateUnit] {
        self.units
            .get(&SlotName::from(slot))
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.values().map(Vec::len).sum()
    }

    /// Returns `true` if no unit is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Collects template units and validates them into a [`TemplateRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    units: Vec<TemplateUnit>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit.
    #[must_use]
    pub fn register(mut self, unit: TemplateUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Adds several units.
    #[must_use]
    pub fn register_all(mut self, units: impl IntoIterator<Item = TemplateUnit>) -> Self {
        self.units.extend(units);
        self
    }

    /// Validates the units and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousTemplate`] if some feature set would leave
    /// two units of one slot tied for most specific.
    pub fn build(self) -> Result<TemplateRegistry> {
        let mut slots = Vec::new();
        let mut units: HashMap<SlotName, Vec<TemplateUnit>> = HashMap::new();

        for unit in self.units {
            let slot = unit.slot().clone();
            if !units.contains_key(&slot) {
                slots.push(slot.clone());
            }
            units.entry(slot).or_default().push(unit);
        }

        for slot in &slots {
            if let Some(candidates) = units.get(slot) {
                check_unambiguous(slot, candidates)?;
            }
        }

        tracing::debug!(slots = slots.len(), "Built template registry");
        Ok(TemplateRegistry { slots, units })
    }
}

/// Rejects a slot whose units can tie.
///
/// Two units with equally sized selectors `a` and `b` are both eligible
/// exactly when the active features include `a ∪ b`. They only tie if no
/// other unit is eligible there with a strictly larger selector, so the
/// check looks for such a tie-breaker at `a ∪ b` itself. Identical
/// selectors can never be broken this way.
fn check_unambiguous(slot: &SlotName, candidates: &[TemplateUnit]) -> Result<()> {
    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            if a.selector().len() != b.selector().len() {
                continue;
            }

            let both = a.selector().union(b.selector());
            let broken = a.selector() != b.selector()
                && candidates.iter().any(|c| {
                    c.selector().len() > a.selector().len() && c.selector().is_subset(&both)
                });

            if !broken {
                return Err(Error::AmbiguousTemplate {
                    slot: slot.to_string(),
                    selector: both.to_string(),
                });
            }
        }
    }
    Ok(())
}
