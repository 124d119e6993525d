//! The `DOCUMENTATION` block of a generated module.

use super::description::Description;
use crate::common::python::{normalize_parameter_name, python_type};
use crate::module::Parameter;
use crate::module::parameter::value_to_string;
use restmod_core::{DocumentationConfig, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Module documentation, fields in rendering order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDocumentation {
    /// Module name
    pub module: String,
    /// One-line description
    pub short_description: String,
    /// Long description
    pub description: String,
    /// Options keyed by Python name
    pub options: BTreeMap<String, OptionDocumentation>,
    /// Module authors
    pub author: Vec<String>,
    /// Collection version the module appeared in
    pub version_added: String,
    /// Python requirements
    pub requirements: Vec<String>,
    /// Free-form notes, left out of the block when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Documentation of one option. Fields are declared alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionDocumentation {
    /// Accepted values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Description lines
    pub description: Vec<String>,
    /// Element type of list options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    /// Set when the option is mandatory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Ansible type
    #[serde(rename = "type")]
    pub option_type: String,
}

impl OptionDocumentation {
    fn connection(description: &[&str], option_type: &str) -> Self {
        Self {
            description: description.iter().map(ToString::to_string).collect(),
            option_type: option_type.to_string(),
            ..Self::default()
        }
    }
}

fn env_fallback_line(variable: &str) -> String {
    format!(
        "If the value is not specified in the task, the value of environment variable C({variable}) will be used instead."
    )
}

fn connection_options() -> BTreeMap<String, OptionDocumentation> {
    let mut options = BTreeMap::new();
    for (name, text, variable) in [
        (
            "vcenter_hostname",
            "The hostname or IP address of the vSphere vCenter",
            "VMWARE_HOST",
        ),
        ("vcenter_username", "The vSphere vCenter username", "VMWARE_USER"),
        ("vcenter_password", "The vSphere vCenter password", "VMWARE_PASSWORD"),
    ] {
        let fallback = env_fallback_line(variable);
        let mut option = OptionDocumentation::connection(&[text, fallback.as_str()], "str");
        option.required = Some(true);
        options.insert(name.to_string(), option);
    }

    let fallback = env_fallback_line("VMWARE_VALIDATE_CERTS");
    let mut validate_certs = OptionDocumentation::connection(
        &[
            "Allows connection when SSL certificates are not valid. Set to C(false) when certificates are not trusted.",
            fallback.as_str(),
        ],
        "bool",
    );
    validate_certs.default = Some(Value::Bool(true));
    options.insert("vcenter_validate_certs".to_string(), validate_certs);

    options.insert(
        "vcenter_rest_log_file".to_string(),
        OptionDocumentation::connection(
            &[
                "You can use this optional parameter to set the location of a log file. ",
                "This file will be used to record the HTTP REST interaction. ",
                "The file will be stored on the host that run the module. ",
                "If the value is not specified in the task, the value of ",
                "environment variable C(VMWARE_REST_LOG_FILE) will be used instead.",
            ],
            "str",
        ),
    );
    options
}

/// Raw description lines of a parameter, subkeys included.
fn describe_parameter(parameter: &Parameter) -> Vec<String> {
    let mut lines = Vec::new();
    if !parameter.description.is_empty() {
        lines.push(parameter.description.clone());
    }
    if parameter.subkeys.is_empty() {
        return lines;
    }

    lines.push("Valid attributes are:".to_string());
    for subkey in &parameter.subkeys {
        lines.push(format!(
            " - C({}) ({}): {}",
            subkey.name,
            python_type(&subkey.key_type),
            subkey.description
        ));
        if subkey.required {
            lines.push("   This key is required.".to_string());
        }
        if let Some(values) = &subkey.enum_values {
            lines.push("   - Accepted values:".to_string());
            lines.extend(values.iter().map(|v| format!("     - {v}")));
        }
        if let Some(properties) = &subkey.properties {
            lines.push("   - Accepted keys:".to_string());
            for (key, property) in properties {
                let field = |name: &str| property.get(name).map(value_to_string).unwrap_or_default();
                lines.push(format!(
                    "     - {key} ({}): {}",
                    field("type"),
                    field("description")
                ));
                let values = property
                    .get("enum")
                    .and_then(Value::as_array)
                    .filter(|values| !values.is_empty());
                if let Some(values) = values {
                    lines.push("Accepted value for this field:".to_string());
                    lines.extend(
                        values
                            .iter()
                            .map(|v| format!("       - C({})", value_to_string(v))),
                    );
                }
            }
        }
    }
    lines
}

/// Builds the documentation of a module.
///
/// The connection options are always present; every parameter adds one
/// option keyed by its Python name.
///
/// # Errors
///
/// Returns an error if a description references an unknown resource type.
pub fn gen_documentation(
    name: &str,
    description: &str,
    parameters: &[Parameter],
    metadata: &DocumentationConfig,
    normalizer: &Description<'_>,
) -> Result<ModuleDocumentation> {
    let mut options = connection_options();

    for parameter in parameters {
        let mut option = OptionDocumentation {
            description: normalizer.normalize(&describe_parameter(parameter))?,
            option_type: python_type(&parameter.param_type).to_string(),
            ..OptionDocumentation::default()
        };
        if parameter.required {
            option.required = Some(true);
        }
        if let Some(values) = &parameter.enum_values {
            let mut choices = values.clone();
            choices.sort();
            option.choices = Some(choices);
        }
        if parameter.param_type == "array" {
            option.elements = parameter
                .elements
                .as_deref()
                .map(|e| python_type(e).to_string());
        }
        if let Some(default) = parameter.default.as_ref().filter(|d| !d.is_empty()) {
            option.default = Some(Value::String(default.clone()));
        }
        options.insert(normalize_parameter_name(&parameter.name), option);
    }

    Ok(ModuleDocumentation {
        module: name.to_string(),
        short_description: description.to_string(),
        description: description.to_string(),
        options,
        author: metadata.author.clone(),
        version_added: metadata.version_added.clone(),
        requirements: metadata.requirements.clone(),
        notes: metadata.notes.clone(),
    })
}

fn sanitize(text: &str) -> String {
    text.replace("':'", ":")
}

fn sanitize_all(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| sanitize(l)).collect()
}

/// Renders the documentation as the raw Python string assigned to
/// `DOCUMENTATION`.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn format_documentation(documentation: &ModuleDocumentation) -> Result<String> {
    let options = documentation
        .options
        .iter()
        .map(|(name, option)| {
            let option = OptionDocumentation {
                description: sanitize_all(&option.description),
                ..option.clone()
            };
            (name.clone(), option)
        })
        .collect();
    let sanitized = ModuleDocumentation {
        module: sanitize(&documentation.module),
        short_description: sanitize(&documentation.short_description),
        description: sanitize(&documentation.description),
        options,
        author: sanitize_all(&documentation.author),
        version_added: sanitize(&documentation.version_added),
        requirements: sanitize_all(&documentation.requirements),
        notes: sanitize_all(&documentation.notes),
    };
    let yaml = serde_yaml::to_string(&sanitized)?;
    Ok(format!("r'''\n{}'''", fold_scalars(&yaml)))
}

const LINE_WIDTH: usize = 80;

/// Breaks long plain and single-quoted scalars the way libyaml does at its
/// default width: a lone space becomes a line break once the column is past
/// [`LINE_WIDTH`]. The continuation is indented two columns deeper than the
/// key or dash that introduced the value.
fn fold_scalars(yaml: &str) -> String {
    let mut folded = String::with_capacity(yaml.len());
    let mut block_depth: Option<usize> = None;

    for line in yaml.lines() {
        let depth = line.len() - line.trim_start_matches(' ').len();
        if let Some(block) = block_depth
            && (line.trim().is_empty() || depth > block)
        {
            folded.push_str(line);
            folded.push('\n');
            continue;
        }
        block_depth = None;

        let Some(offset) = value_offset(line, depth) else {
            folded.push_str(line);
            folded.push('\n');
            continue;
        };
        let value = &line[offset..];
        if is_foldable(value) {
            fold_line(line, offset, depth + 2, &mut folded);
        } else {
            folded.push_str(line);
        }
        folded.push('\n');

        if value.starts_with(['|', '>']) {
            block_depth = Some(depth);
        }
    }
    folded
}

/// Byte offset of the value introduced by a `- ` dash or a `key: `.
fn value_offset(line: &str, depth: usize) -> Option<usize> {
    let rest = &line[depth..];
    if rest.starts_with("- ") {
        Some(depth + 2)
    } else if rest.starts_with(['\'', '"']) {
        None
    } else {
        Some(depth + rest.find(": ")? + 2)
    }
}

fn is_foldable(value: &str) -> bool {
    match value.chars().next() {
        None | Some('"' | '|' | '>' | '[' | '{' | '&' | '*' | '!') => false,
        Some('\'') => value.len() >= 2 && value.ends_with('\''),
        Some(_) => true,
    }
}

fn fold_line(line: &str, offset: usize, indent: usize, out: &mut String) {
    let (prefix, value) = line.split_at(offset);
    let quoted = value.starts_with('\'');
    let body: Vec<char> = if quoted {
        value[1..value.len() - 1].chars().collect()
    } else {
        value.chars().collect()
    };

    out.push_str(prefix);
    let mut column = prefix.chars().count();
    if quoted {
        out.push('\'');
        column += 1;
    }

    let last = body.len().saturating_sub(1);
    let mut previous_space = false;
    for (i, &c) in body.iter().enumerate() {
        if c == ' ' {
            let next_space = body.get(i + 1) == Some(&' ');
            let inner = !quoted || (i != 0 && i != last);
            if !previous_space && !next_space && inner && column > LINE_WIDTH {
                out.push('\n');
                out.push_str(&" ".repeat(indent));
                column = indent;
            } else {
                out.push(' ');
                column += 1;
            }
            previous_space = true;
        } else {
            out.push(c);
            column += 1;
            previous_space = false;
        }
    }

    if quoted {
        out.push('\'');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::SubKey;
    use restmod_core::GeneratorConfig;
    use serde_json::json;

    fn generate(parameters: &[Parameter]) -> ModuleDocumentation {
        let config = GeneratorConfig::default();
        gen_documentation(
            "vcenter_vm_power",
            "Manage the power of a VM",
            parameters,
            &config.documentation,
            &Description::from_config(&config),
        )
        .unwrap()
    }

    #[test]
    fn test_connection_options() {
        let doc = generate(&[]);
        assert_eq!(doc.options.len(), 5);
        let password = &doc.options["vcenter_password"];
        assert_eq!(password.required, Some(true));
        assert_eq!(password.description[0], "The vSphere vCenter password");
        let certs = &doc.options["vcenter_validate_certs"];
        assert_eq!(certs.default, Some(Value::Bool(true)));
        assert_eq!(certs.option_type, "bool");
        assert_eq!(doc.options["vcenter_rest_log_file"].description.len(), 5);
    }

    #[test]
    fn test_parameter_option() {
        let mut state = Parameter::new("state", "string");
        state.enum_values = Some(vec!["stop".to_string(), "start".to_string()]);
        state.default = Some("start".to_string());
        state.description = "Set to {@code true} to boot.".to_string();
        let mut vms = Parameter::new("filter.vms", "array");
        vms.elements = Some("string".to_string());
        vms.required = true;

        let doc = generate(&[state, vms]);
        let state = &doc.options["state"];
        assert_eq!(state.option_type, "str");
        assert_eq!(
            state.choices,
            Some(vec!["start".to_string(), "stop".to_string()])
        );
        assert_eq!(state.default, Some(json!("start")));
        assert_eq!(state.description, vec!["Set to C(True) to boot."]);

        let vms = &doc.options["filter_vms"];
        assert_eq!(vms.option_type, "list");
        assert_eq!(vms.elements.as_deref(), Some("str"));
        assert_eq!(vms.required, Some(true));
    }

    #[test]
    fn test_subkey_listing() {
        let mut placement = Parameter::new("placement", "object");
        placement.description = "Placement of the VM.".to_string();
        placement.subkeys = vec![
            SubKey {
                name: "folder".to_string(),
                key_type: "string".to_string(),
                description: "Target folder".to_string(),
                required: true,
                ..SubKey::default()
            },
            SubKey {
                name: "mode".to_string(),
                key_type: "string".to_string(),
                description: "Mode".to_string(),
                enum_values: Some(vec!["A".to_string(), "B".to_string()]),
                ..SubKey::default()
            },
            SubKey {
                name: "spec".to_string(),
                key_type: "object".to_string(),
                description: "Nested".to_string(),
                properties: json!({"kind": {"type": "string", "description": "Kind", "enum": ["X"]}})
                    .as_object()
                    .cloned(),
                ..SubKey::default()
            },
        ];
        let doc = generate(&[placement]);
        assert_eq!(
            doc.options["placement"].description,
            vec![
                "Placement of the VM.",
                "Valid attributes are:",
                " - C(folder) (str): Target folder",
                "   This key is required.",
                " - C(mode) (str): Mode",
                "   - Accepted values:",
                "     - A",
                "     - B",
                " - C(spec) (dict): Nested",
                "   - Accepted keys:",
                "     - kind (string): Kind",
                "Accepted value for this field:",
                "       - C(X)",
            ]
        );
    }

    #[test]
    fn test_format_documentation() {
        let mut option = Parameter::new("name", "string");
        option.description = "the key':'value pair".to_string();
        let doc = generate(&[option]);
        let rendered = format_documentation(&doc).unwrap();
        assert!(rendered.starts_with("r'''\nmodule: vcenter_vm_power\n"));
        assert!(rendered.ends_with("'''"));

        let yaml = rendered
            .trim_start_matches("r'''\n")
            .trim_end_matches("'''");
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed["short_description"], "Manage the power of a VM");
        assert_eq!(
            parsed["options"]["name"]["description"][0],
            "the key:value pair"
        );
        assert_eq!(parsed["version_added"], "1.0.0");

        let keys: Vec<&str> = parsed
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(serde_yaml::Value::as_str)
            .collect();
        assert_eq!(
            keys,
            vec![
                "module",
                "short_description",
                "description",
                "options",
                "author",
                "version_added",
                "requirements",
                "notes"
            ]
        );
    }

    fn foo_documentation() -> ModuleDocumentation {
        let lines = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();
        let mut options = BTreeMap::new();
        options.insert(
            "aaa".to_string(),
            OptionDocumentation {
                description: lines(&[
                    "a second parameter",
                    "Validate attributes are:",
                    " - C(a_subkey) (ccc): more blabla",
                ]),
                required: Some(true),
                option_type: "int".to_string(),
                ..OptionDocumentation::default()
            },
        );
        options.insert(
            "ccc".to_string(),
            OptionDocumentation {
                choices: Some(lines(&["a", "b", "c"])),
                description: lines(&[
                    "3rd parameter is ':' enum,",
                    "and this string is long and comes with a ' on purpose. This way, we can use it to ensure format_documentation() can break it up.",
                ]),
                option_type: "list".to_string(),
                ..OptionDocumentation::default()
            },
        );
        ModuleDocumentation {
            module: "foo".to_string(),
            short_description: "bar".to_string(),
            description: "bar".to_string(),
            options,
            author: lines(&["Ansible VMware team"]),
            version_added: "1.0.0".to_string(),
            requirements: lines(&["python >= 3.6"]),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_format_documentation_layout() {
        let expected = "r'''
module: foo
short_description: bar
description: bar
options:
  aaa:
    description:
    - a second parameter
    - 'Validate attributes are:'
    - ' - C(a_subkey) (ccc): more blabla'
    required: true
    type: int
  ccc:
    choices:
    - a
    - b
    - c
    description:
    - '3rd parameter is : enum,'
    - and this string is long and comes with a ' on purpose. This way, we can use
      it to ensure format_documentation() can break it up.
    type: list
author:
- Ansible VMware team
version_added: 1.0.0
requirements:
- python >= 3.6
'''";
        assert_eq!(format_documentation(&foo_documentation()).unwrap(), expected);
    }

    #[test]
    fn test_format_documentation_renders_configured_notes() {
        let mut doc = foo_documentation();
        doc.notes = vec!["Tested on vSphere 7.0.2".to_string()];
        let rendered = format_documentation(&doc).unwrap();
        assert!(rendered.ends_with("- python >= 3.6\nnotes:\n- Tested on vSphere 7.0.2\n'''"));
    }

    #[test]
    fn test_fold_scalars() {
        let unfolded = "short_description: Handle resource of type vcenter_datacenter, a long sentence that runs past the limit
options:
  datacenter:
    description:
    - 'Identifier of the datacenter: this text keeps going on and on so that it gets folded twice by the emitter, once at eighty columns and then again later on'
";
        let folded = "short_description: Handle resource of type vcenter_datacenter, a long sentence that
  runs past the limit
options:
  datacenter:
    description:
    - 'Identifier of the datacenter: this text keeps going on and on so that it gets
      folded twice by the emitter, once at eighty columns and then again later on'
";
        assert_eq!(fold_scalars(unfolded), folded);
    }

    #[test]
    fn test_fold_scalars_keeps_literal_blocks() {
        let yaml = format!(
            "description: |-\n  {}\n  second line\nmodule: x\n",
            "word ".repeat(30).trim_end()
        );
        assert_eq!(fold_scalars(&yaml), yaml);
    }
}
