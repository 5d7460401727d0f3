//! Validated Java package and feature names.
//!
//! Generated projects use the package name as a folder name, a Maven/Gradle
//! group id, an OSGi bundle name and the Java `package` declaration, so it has
//! to be valid in all of those places at once.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::{FeatureName, JavaPackageName};
//!
//! let package = JavaPackageName::new("dev.galasa.example.banking")?;
//! assert_eq!(package.as_path(), "dev/galasa/example/banking");
//!
//! let feature = FeatureName::new("payee")?;
//! assert_eq!(feature.class_stem(), "Payee");
//!
//! assert!(JavaPackageName::new("dev.galasa.class").is_err());
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

const JAVA_RESERVED_WORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "exports",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "module",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "requires",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "var",
    "void",
    "volatile",
    "while",
];

const fn is_edge_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

const fn is_middle_char(c: char) -> bool {
    is_edge_char(c) || c == '.'
}

/// Checks `name` against the package naming rules, returning the reason it
/// is rejected.
fn check_package_name(name: &str) -> std::result::Result<(), String> {
    let (Some(first), Some(last)) = (name.chars().next(), name.chars().last()) else {
        return Err("package name should not be blank".to_string());
    };

    if let Some(bad) = name.chars().find(|c| !is_middle_char(*c)) {
        return Err(format!("should not contain the '{bad}' character"));
    }
    if !is_edge_char(first) {
        return Err(format!("should not start with the '{first}' character"));
    }
    if !is_edge_char(last) {
        return Err(format!("should not end with the '{last}' character"));
    }
    if let Some(word) = name
        .split('.')
        .find(|part| JAVA_RESERVED_WORDS.contains(part))
    {
        return Err(format!("contains the reserved java keyword '{word}'"));
    }
    Ok(())
}

/// A Java package name such as `dev.galasa.example.banking`.
///
/// Only lower-case ASCII letters, digits and `.` are allowed; the first and
/// last characters must be a letter or digit and no segment may be a Java
/// reserved word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JavaPackageName(String);

impl JavaPackageName {
    /// Validates and wraps a package name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPackageName`] describing the first rule the
    /// name breaks.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        match check_package_name(&name) {
            Ok(()) => Ok(Self(name)),
            Err(reason) => Err(Error::InvalidPackageName { name, reason }),
        }
    }

    /// Returns the dotted package name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the package as a `/`-separated relative path.
    #[must_use]
    pub fn as_path(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Returns `self` with `suffix` appended as a further package segment.
    ///
    /// A [`FeatureName`] is itself a valid package name, so the result is too.
    #[must_use]
    pub fn child(&self, suffix: &FeatureName) -> Self {
        Self(format!("{}.{}", self.0, suffix.as_str()))
    }
}

impl fmt::Display for JavaPackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feature under test, e.g. `payee` or `account`.
///
/// Each feature becomes its own test project and package segment, so it
/// follows the package naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureName(String);

impl FeatureName {
    /// Validates and wraps a feature name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFeatureName`] when the name could not be used
    /// as a Java package name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        match check_package_name(&name) {
            Ok(()) => Ok(Self(name)),
            Err(reason) => Err(Error::InvalidFeatureName { name, reason }),
        }
    }

    /// Parses a comma-separated feature list such as `"payee,account"`.
    ///
    /// # Errors
    ///
    /// Returns the error for the first invalid entry.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',').map(|name| Self::new(name.trim())).collect()
    }

    /// Returns the feature name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name with its first letter upper-cased, for class names.
    #[must_use]
    pub fn class_stem(&self) -> String {
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        })
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
