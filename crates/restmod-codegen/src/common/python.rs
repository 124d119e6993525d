//! Python code generation utilities.
//!
//! Renders JSON values as Python literals and maps API schema names onto
//! the Python/Ansible vocabulary.
//!
//! # Examples
//!
//! ```
//! use restmod_codegen::common::python;
//! use serde_json::json;
//!
//! let literal = python::to_literal(&json!({"get": {"path": {"vm": "vm"}}}));
//! assert_eq!(literal, "{'get': {'path': {'vm': 'vm'}}}");
//! ```

use serde_json::Value;
use std::fmt::Write;

/// Maps a JSON schema type onto the Ansible option type.
///
/// Unknown types are returned unchanged.
///
/// # Examples
///
/// ```
/// use restmod_codegen::common::python::python_type;
///
/// assert_eq!(python_type("array"), "list");
/// assert_eq!(python_type("boolean"), "bool");
/// assert_eq!(python_type("list"), "list");
/// ```
#[must_use]
pub fn python_type(value: &str) -> &str {
    match value {
        "array" => "list",
        "boolean" => "bool",
        "integer" => "int",
        "object" => "dict",
        "string" => "str",
        other => other,
    }
}

/// Turns an API parameter name into a valid Python identifier.
///
/// # Examples
///
/// ```
/// use restmod_codegen::common::python::normalize_parameter_name;
///
/// assert_eq!(normalize_parameter_name("filter.vms"), "filter_vms");
/// assert_eq!(normalize_parameter_name("~action"), "action");
/// ```
#[must_use]
pub fn normalize_parameter_name(name: &str) -> String {
    name.replace("filter.", "filter_").replace("~action", "action")
}

/// Renders a string the way Python's `repr()` does.
///
/// # Examples
///
/// ```
/// use restmod_codegen::common::python::string_repr;
///
/// assert_eq!(string_repr("vm"), "'vm'");
/// assert_eq!(string_repr("it's"), "\"it's\"");
/// ```
#[must_use]
pub fn string_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Renders a list of strings as a Python list literal.
///
/// # Examples
///
/// ```
/// use restmod_codegen::common::python::list_repr;
///
/// assert_eq!(list_repr(&["check_in".to_string()]), "['check_in']");
/// assert_eq!(list_repr(&[]), "[]");
/// ```
#[must_use]
pub fn list_repr(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| string_repr(s)).collect();
    format!("[{}]", inner.join(", "))
}

/// Renders a JSON value as a Python literal.
#[must_use]
pub fn to_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_repr(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(to_literal).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", string_repr(k), to_literal(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}
