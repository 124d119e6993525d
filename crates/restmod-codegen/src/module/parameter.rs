//! Normalized module parameters.
//!
//! [`property_to_parameter`] flattens the raw parameter list of one operation
//! into [`Parameter`]s. Request bodies are unwrapped to their properties, and
//! `spec` envelopes one level deeper, so every option maps to one key of the
//! payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// One option of a generated module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Option name as found in the API
    pub name: String,
    /// JSON schema type
    #[serde(rename = "type")]
    pub param_type: String,
    /// Free-text description
    pub description: String,
    /// Whether every state requires the option
    pub required: bool,
    /// Location in the request payload, `spec/<name>` for nested keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_in_payload: Option<String>,
    /// Swagger `in` field: `path`, `query`, `body`
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Accepted values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Element type of list options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    /// Keys of dict (or list of dict) options
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subkeys: Vec<SubKey>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Operations using this option
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation_ids: Vec<String>,
    /// States requiring this option when it is not always required
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_with_states: Vec<String>,
}

impl Parameter {
    /// Creates a parameter with a name and a type.
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            ..Self::default()
        }
    }

    /// Returns the option name as a Python identifier.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        crate::common::python::normalize_parameter_name(&self.name)
    }
}

/// A key of a dict option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubKey {
    /// Key name
    pub name: String,
    /// JSON schema type
    #[serde(rename = "type")]
    pub key_type: String,
    /// Free-text description
    pub description: String,
    /// Whether the key must be set
    pub required: bool,
    /// Accepted values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Nested properties, kept raw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Python-style truthiness of an optional JSON value.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(value_to_string).collect())
        .unwrap_or_default()
}

fn enum_of(value: &Value) -> Option<Vec<String>> {
    value
        .get("enum")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(value_to_string).collect())
}

struct Candidate<'a> {
    name: String,
    value: Option<&'a Value>,
    parent: Option<&'static str>,
    required: bool,
}

/// Unwraps body schemas into their property maps.
///
/// Returns the unwrapped entries and the `required` list of the last schema.
fn unwrap_schemas(raw: &[Value]) -> (Vec<&Value>, Vec<String>) {
    let mut required_keys = Vec::new();
    let entries = raw
        .iter()
        .map(|item| {
            let Some(schema) = item.get("schema") else {
                return item;
            };
            if let Some(properties) = schema.get("properties") {
                if schema.get("required").is_some() {
                    required_keys = string_list(schema.get("required"));
                }
                properties
            } else if let Some(properties) = schema
                .get("additionalProperties")
                .and_then(|a| a.get("properties"))
            {
                properties
            } else {
                item
            }
        })
        .collect();
    (entries, required_keys)
}

fn candidates(raw: &[Value]) -> Vec<Candidate<'_>> {
    let (entries, mut required_keys) = unwrap_schemas(raw);
    let mut out = Vec::new();

    for entry in entries {
        match entry {
            Value::String(name) => out.push(Candidate {
                name: name.clone(),
                value: None,
                parent: None,
                required: false,
            }),
            Value::Object(map) => {
                if let Some(spec_properties) = map
                    .get("spec")
                    .and_then(|spec| spec.get("properties"))
                    .and_then(Value::as_object)
                {
                    if let Some(required) = map.get("spec").and_then(|s| s.get("required")) {
                        required_keys = string_list(Some(required));
                    }
                    for (name, property) in spec_properties {
                        out.push(Candidate {
                            name: name.clone(),
                            value: Some(property),
                            parent: Some("spec"),
                            required: required_keys.contains(name),
                        });
                    }
                } else if let Some(Value::String(name)) = map.get("name") {
                    out.push(Candidate {
                        name: name.clone(),
                        value: Some(entry),
                        parent: None,
                        required: is_truthy(map.get("required")),
                    });
                } else {
                    for (name, data) in map {
                        out.push(Candidate {
                            name: name.clone(),
                            value: Some(data),
                            parent: None,
                            required: required_keys.contains(name)
                                || is_truthy(data.get("required")),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn subkeys_of(items: &Map<String, Value>, required: &[String]) -> Vec<SubKey> {
    items
        .iter()
        .filter_map(|(name, value)| {
            let value = value.as_object()?;
            Some(SubKey {
                name: name.clone(),
                key_type: value
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("str")
                    .to_string(),
                description: value
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                required: required.contains(name),
                enum_values: value.get("enum").and_then(Value::as_array).map(|items| {
                    items.iter().map(value_to_string).collect()
                }),
                properties: value.get("properties").and_then(Value::as_object).cloned(),
            })
        })
        .collect()
}

fn to_parameter(candidate: Candidate<'_>) -> Parameter {
    let empty = Value::Object(Map::new());
    let v = candidate.value.unwrap_or(&empty);
    let loc = match candidate.parent {
        Some(parent) => format!("{parent}/{}", candidate.name),
        None => candidate.name.clone(),
    };

    let mut parameter = Parameter {
        param_type: v
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("str")
            .to_string(),
        description: v
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        required: candidate.required,
        loc_in_payload: Some(loc),
        location: v.get("in").and_then(Value::as_str).map(str::to_string),
        enum_values: enum_of(v),
        name: candidate.name,
        ..Parameter::default()
    };

    let items = v.get("items");
    let sub_items = if let Some(properties) = v.get("properties").and_then(Value::as_object) {
        Some((properties, string_list(v.get("required"))))
    } else if let Some(properties) = items
        .and_then(|i| i.get("properties"))
        .and_then(Value::as_object)
    {
        Some((properties, string_list(items.and_then(|i| i.get("required")))))
    } else if let Some(items) = items {
        if is_truthy(items.get("name")) {
            items.as_object().map(|map| (map, Vec::new()))
        } else {
            if items.get("name").is_none() {
                parameter.elements = Some(
                    items
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("str")
                        .to_string(),
                );
            }
            None
        }
    } else {
        None
    };

    if let Some((properties, required)) = sub_items {
        let subkeys = subkeys_of(properties, &required);
        if !subkeys.is_empty() {
            parameter.subkeys = subkeys;
            parameter.elements = Some("dict".to_string());
        }
    }
    parameter
}

/// Flattens the raw parameters of one operation.
///
/// The result is sorted by name, then description.
///
/// # Examples
///
/// ```
/// use restmod_codegen::module::property_to_parameter;
/// use serde_json::json;
///
/// let raw = vec![json!({
///     "in": "query",
///     "name": "filter.vms",
///     "type": "array",
///     "items": {"type": "string"}
/// })];
/// let parameters = property_to_parameter(&raw);
/// assert_eq!(parameters[0].name, "filter.vms");
/// assert_eq!(parameters[0].elements.as_deref(), Some("string"));
/// ```
#[must_use]
pub fn property_to_parameter(raw: &[Value]) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = candidates(raw).into_iter().map(to_parameter).collect();
    parameters.sort_by(|a, b| (&a.name, &a.description).cmp(&(&b.name, &b.description)));
    parameters
}
