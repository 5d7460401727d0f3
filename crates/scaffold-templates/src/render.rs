//! Flat token substitution.
//!
//! A token marker is `{{Name}}`, where `Name` matches
//! `[A-Za-z_][A-Za-z0-9_]*`. The spellings `{{.Name}}` and `{{ Name }}` are
//! accepted as the same marker. Substitution happens in a single pass over
//! the template: substituted values are never scanned again, so a value that
//! itself looks like `{{Other}}` is emitted verbatim.
//!
//! Outside markers, braces are plain text as long as they cannot combine
//! with substituted text into a new marker. `{{` or `}}` outside a marker,
//! `{` directly before a marker and `}` directly after one are rejected, so
//! rendered output never holds a marker that a bound value did not bring.
//!
//! # Examples
//!
//! ```
//! use scaffold_core::TokenValues;
//! use scaffold_templates::render;
//!
//! let values = TokenValues::new().with("Package", "com.acme.tests");
//! let out = render("package {{.Package}};", &values)?;
//! assert_eq!(out, "package com.acme.tests;");
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use regex::Regex;
use scaffold_core::{Error, Result, TokenValues};
use std::sync::LazyLock;

static TOKEN_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Replaces every token marker in `template` with its bound value.
///
/// Text outside markers is copied unchanged and in order.
///
/// # Errors
///
/// Returns the first problem in template order:
///
/// - [`Error::UnboundToken`] for a marker whose token has no value
/// - [`Error::StrayDelimiter`] for a brace that could form a marker
///
/// Neither carries a slot; callers that know the slot attach it with
/// [`Error::with_slot`].
pub fn render(template: &str, values: &TokenValues) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TOKEN_MARKER.captures_iter(template) {
        let (Some(marker), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        check_literal(template, last, marker.start())?;
        if template[..marker.start()].ends_with('{') {
            return Err(stray(marker.start() - 1));
        }
        if template[marker.end()..].starts_with('}') {
            return Err(stray(marker.end()));
        }
        let value = values
            .get(name.as_str())
            .ok_or_else(|| Error::UnboundToken {
                token: name.as_str().to_string(),
                slot: None,
            })?;

        out.push_str(&template[last..marker.start()]);
        out.push_str(value);
        last = marker.end();
    }

    check_literal(template, last, template.len())?;
    out.push_str(&template[last..]);
    Ok(out)
}

/// Fails if `template[start..end]` holds `{{` or `}}`.
fn check_literal(template: &str, start: usize, end: usize) -> Result<()> {
    let literal = &template[start..end];
    let found = [literal.find("{{"), literal.find("}}")]
        .into_iter()
        .flatten()
        .min();
    match found {
        Some(at) => Err(stray(start + at)),
        None => Ok(()),
    }
}

const fn stray(offset: usize) -> Error {
    Error::StrayDelimiter { offset, slot: None }
}

/// Lists the token names `template` references, in order of first use.
///
/// # Examples
///
/// ```
/// use scaffold_templates::referenced_tokens;
///
/// let names = referenced_tokens("{{Package}}/{{ClassName}}.java {{.Package}}");
/// assert_eq!(names, vec!["Package", "ClassName"]);
/// ```
#[must_use]
pub fn referenced_tokens(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in TOKEN_MARKER.captures_iter(template) {
        if let Some(name) = caps.get(1)
            && !names.iter().any(|n| n == name.as_str())
        {
            names.push(name.as_str().to_string());
        }
    }
    names
}

/// Returns `true` if `text` contains at least one token marker.
#[must_use]
pub fn contains_marker(text: &str) -> bool {
    TOKEN_MARKER.is_match(text)
}
