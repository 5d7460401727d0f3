//! Output formatters for CLI commands.
//!
//! Every command prints its result through [`format_output`], so JSON, text
//! and pretty output stay consistent across commands.

use anyhow::Result;
use colored::Colorize;
use scaffold_core::cli::OutputFormat;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Arguments
///
/// * `data` - The data to format (must be serializable)
/// * `format` - The output format (Json, Text, Pretty)
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use scaffold_cli::formatters::format_output;
/// use scaffold_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Created {
///     root: String,
///     files: usize,
/// }
///
/// let created = Created {
///     root: "dev.galasa.example".to_string(),
///     files: 7,
/// };
///
/// let output = format_output(&created, OutputFormat::Json)?;
/// assert!(output.contains("\"root\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as `key: value` lines without colors.
    ///
    /// Nested keys are joined with `.` and every array item gets its own
    /// line under the array's key, so the output can be piped to `grep`
    /// and `cut`.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten("", &value, &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(key: &str, value: &Value, lines: &mut Vec<String>) {
        let scalar = match value {
            Value::Null => return,
            Value::Object(obj) => {
                for (name, child) in obj {
                    if key.is_empty() {
                        flatten(name, child, lines);
                    } else {
                        flatten(&format!("{key}.{name}"), child, lines);
                    }
                }
                return;
            }
            Value::Array(items) => {
                for item in items {
                    flatten(key, item, lines);
                }
                return;
            }
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
        };

        if key.is_empty() {
            lines.push(scalar);
        } else {
            lines.push(format!("{key}: {scalar}"));
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};

    /// Format data as colorized, human-readable output.
    ///
    /// Uses colors and formatting for better terminal readability.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        // Convert to JSON value first for inspection
        let value = serde_json::to_value(data)?;

        // Format with colors
        format_value(&value, 0)
    }

    /// Recursively format a JSON value with colors and indentation.
    fn format_value(value: &serde_json::Value, indent: usize) -> Result<String> {
        use serde_json::Value;

        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => Ok("null".dimmed().to_string()),
            Value::Bool(b) => Ok(b.to_string().yellow().to_string()),
            Value::Number(n) => Ok(n.to_string().cyan().to_string()),
            Value::String(s) => Ok(format!("\"{}\"", s.green())),
            Value::Array(arr) => {
                if arr.is_empty() {
                    return Ok("[]".to_string());
                }

                let mut result = "[\n".to_string();
                for (i, item) in arr.iter().enumerate() {
                    result.push_str(&next_indent_str);
                    result.push_str(&format_value(item, indent + 1)?);
                    if i < arr.len() - 1 {
                        result.push(',');
                    }
                    result.push('\n');
                }
                result.push_str(&indent_str);
                result.push(']');
                Ok(result)
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    return Ok("{}".to_string());
                }

                let mut result = "{\n".to_string();
                let entries: Vec<_> = obj.iter().collect();
                for (i, (key, val)) in entries.iter().enumerate() {
                    result.push_str(&next_indent_str);
                    result.push_str(&format!("\"{}\": ", key.blue().bold()));
                    result.push_str(&format_value(val, indent + 1)?);
                    if i < entries.len() - 1 {
                        result.push(',');
                    }
                    result.push('\n');
                }
                result.push_str(&indent_str);
                result.push('}');
                Ok(result)
            }
        }
    }
}
