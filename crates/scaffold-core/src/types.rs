//! Strong domain types for scaffolding requests.
//!
//! [`FeatureSet`] and [`TokenValues`] are built per invocation from caller
//! input; [`SlotName`] identifies a logical generation target.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::{FeatureSet, TokenValues};
//!
//! let features = FeatureSet::parse("zos, Gradle");
//! assert!(features.contains("gradle"));
//!
//! let values = TokenValues::new().with("Package", "com.acme.tests");
//! assert_eq!(values.get("Package"), Some("com.acme.tests"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Slot identifier (newtype over String).
///
/// A slot is a logical generation target, such as "the sample test class",
/// that exactly one template unit fills per invocation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotName(String);

impl SlotName {
    /// Creates a new slot name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the slot name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SlotName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of filesystem entry a template unit or planned entry produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory; carries no content
    Directory,
    /// A regular text file
    File,
}

impl EntryKind {
    /// Returns the lower-case name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of feature flags.
///
/// Flags are trimmed and lower-cased on insertion and empty flags are
/// dropped, so `"ZOS "` and `"zos"` are the same flag. Flags nothing knows
/// about are kept but never match a selector, which keeps older template
/// bundles working with newer callers.
///
/// The same type doubles as a template unit's selector: the set of flags a
/// unit requires.
///
/// # Examples
///
/// ```
/// use scaffold_core::FeatureSet;
///
/// let selector = FeatureSet::from_iter(["zos"]);
/// let active = FeatureSet::from_iter(["zos", "cics"]);
/// assert!(selector.is_subset(&active));
/// assert_eq!(active.to_string(), "{cics, zos}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    /// Creates an empty feature set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses a comma-separated flag list such as `"zos,gradle"`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    /// Adds a flag, returning `true` if it was not already present.
    pub fn insert(&mut self, flag: &str) -> bool {
        let flag = normalize_flag(flag);
        if flag.is_empty() {
            return false;
        }
        self.0.insert(flag)
    }

    /// Adds a flag (builder style).
    #[must_use]
    pub fn with(mut self, flag: &str) -> Self {
        self.insert(flag);
        self
    }

    /// Returns `true` if the (normalized) flag is present.
    #[must_use]
    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains(&normalize_flag(flag))
    }

    /// Returns `true` if every flag in `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Returns the union of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Number of flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over flags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn normalize_flag(flag: &str) -> String {
    flag.trim().to_ascii_lowercase()
}

impl<'a> FromIterator<&'a str> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl FromIterator<String> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(&flag);
        }
        set
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, flag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(flag)?;
        }
        f.write_str("}")
    }
}

/// Token name to substitution value mapping.
///
/// Names are case-sensitive: `Package` and `package` are distinct tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenValues(BTreeMap<String, String>);

impl TokenValues {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Binds `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Binds `name` to `value` (builder style).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns a copy of `self` with every binding of `other` layered on top.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (name, value) in &other.0 {
            merged.0.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Number of bound tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
