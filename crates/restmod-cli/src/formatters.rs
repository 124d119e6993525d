//! Output formatters for command reports.
//!
//! Reports are plain serializable structs; the selected [`OutputFormat`]
//! decides how they are printed on stdout.

use anyhow::Result;
use colored::Colorize;
use restmod_core::cli::OutputFormat;
use serde::Serialize;

/// Formats a report according to the requested output format.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
///
/// # Examples
///
/// ```
/// use restmod_cli::formatters::format_output;
/// use restmod_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Report {
///     modules: usize,
/// }
///
/// let output = format_output(&Report { modules: 3 }, OutputFormat::Json)?;
/// assert!(output.contains("\"modules\": 3"));
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

    /// Pretty-printed JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output, one `key: value` line per leaf.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Flattens the report into `path: value` lines, suitable for `grep`.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten("", &value, &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(prefix: &str, value: &Value, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    flatten(&path, child, lines);
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    flatten(&format!("{prefix}[{i}]"), child, lines);
                }
            }
            Value::String(s) => lines.push(format!("{prefix}: {s}")),
            other => lines.push(format!("{prefix}: {other}")),
        }
    }
}

/// Human-readable colored output.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Renders the report as an indented, colored outline.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        render(&value, 0, &mut out);
        Ok(out.trim_end().to_string())
    }

    fn render(value: &Value, depth: usize, out: &mut String) {
        let pad = "  ".repeat(depth);
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match child {
                        Value::Object(_) | Value::Array(_) if !is_empty(child) => {
                            out.push_str(&format!("{pad}{}:\n", key.blue().bold()));
                            render(child, depth + 1, out);
                        }
                        _ => out.push_str(&format!("{pad}{}: {}\n", key.blue().bold(), scalar(child))),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if matches!(item, Value::Object(_)) {
                        out.push_str(&format!("{pad}-\n"));
                        render(item, depth + 1, out);
                    } else {
                        out.push_str(&format!("{pad}- {}\n", scalar(item)));
                    }
                }
            }
            other => out.push_str(&format!("{pad}{}\n", scalar(other))),
        }
    }

    fn is_empty(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "none".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(_) => "[]".dimmed().to_string(),
            Value::Object(_) => "{}".dimmed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report {
        target: String,
        modules: Vec<String>,
        dry_run: bool,
    }

    fn report() -> Report {
        Report {
            target: "vmware_rest".to_string(),
            modules: vec!["vcenter_vm".to_string(), "vcenter_vm_info".to_string()],
            dry_run: false,
        }
    }

    #[test]
    fn test_json_format() {
        let output = format_output(&report(), OutputFormat::Json).unwrap();
        assert!(output.contains("\"target\": \"vmware_rest\""));
        assert!(output.contains("\"dry_run\": false"));
    }

    #[test]
    fn test_text_format() {
        let output = format_output(&report(), OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "target: vmware_rest\nmodules[0]: vcenter_vm\nmodules[1]: vcenter_vm_info\ndry_run: false"
        );
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = format_output(&report(), OutputFormat::Pretty).unwrap();
        assert!(output.contains("target: vmware_rest"));
        assert!(output.contains("modules:\n  - vcenter_vm\n  - vcenter_vm_info"));
    }

    #[test]
    fn test_pretty_empty_list() {
        #[derive(Serialize)]
        struct Empty {
            modules: Vec<String>,
        }
        colored::control::set_override(false);
        let output = pretty::format(&Empty { modules: vec![] }).unwrap();
        assert_eq!(output, "modules: []");
    }
}
