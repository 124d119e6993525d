//! Python fragments declaring the module options.

use crate::common::python::{list_repr, normalize_parameter_name, python_type, string_repr, to_literal};
use crate::module::Parameter;
use serde_json::{Value, json};

const SECRET_OPTIONS: [&str; 3] = ["user_name", "username", "password"];

/// Renders one `argument_spec['name'] = {...}` line per parameter.
///
/// Each line starts with a newline. The option named after `list_index` is
/// never flagged as required: the module falls back on a lookup when it is
/// missing.
///
/// # Examples
///
/// ```
/// use restmod_codegen::documentation::gen_arguments_py;
/// use restmod_codegen::module::Parameter;
///
/// let spec = gen_arguments_py(&[Parameter::new("aaa", "boolean")], None);
/// assert_eq!(spec, "\nargument_spec['aaa'] = {'type': 'bool'}");
/// ```
#[must_use]
pub fn gen_arguments_py(parameters: &[Parameter], list_index: Option<&str>) -> String {
    let mut result = String::new();
    for parameter in parameters {
        let name = normalize_parameter_name(&parameter.name);
        let mut values: Vec<String> = Vec::new();

        if SECRET_OPTIONS.contains(&name.as_str()) {
            values.push("'no_log': True".to_string());
        }
        if parameter.required && list_index != Some(parameter.name.as_str()) {
            values.push("'required': True".to_string());
        }

        let option_type = python_type(&parameter.param_type);
        values.push(format!("'type': {}", string_repr(option_type)));
        if let Some(choices) = &parameter.enum_values {
            let mut choices = choices.clone();
            choices.sort();
            values.push(format!("'choices': {}", list_repr(&choices)));
        }
        if option_type == "list" {
            let elements = python_type(parameter.elements.as_deref().unwrap_or("str"));
            values.push(format!("'elements': {}", string_repr(elements)));
        }

        if name == "bus" {
            values.push("'default': 0".to_string());
        } else if let Some(default) = &parameter.default {
            values.push(format!("'default': {}", string_repr(default)));
        }

        result.push_str(&format!(
            "\nargument_spec['{name}'] = {{{}}}",
            values.join(", ")
        ));
    }
    result
}

/// Renders the `required_if` list handed to `AnsibleModule`.
///
/// # Examples
///
/// ```
/// use restmod_codegen::documentation::required_if_py;
///
/// let entries = vec![("check_in".to_string(), vec!["vm".to_string()])];
/// assert_eq!(required_if_py(&entries), "[['state', 'check_in', ['vm'], True]]");
/// ```
#[must_use]
pub fn required_if_py(entries: &[(String, Vec<String>)]) -> String {
    let rows: Vec<Value> = entries
        .iter()
        .map(|(state, fields)| json!(["state", state, fields, true]))
        .collect();
    to_literal(&Value::Array(rows))
}

/// Indents every line of `text` by `indent` spaces, each line ending with a
/// newline.
#[must_use]
pub fn indent(text: &str, indent: usize) -> String {
    let padding = " ".repeat(indent);
    text.split('\n')
        .map(|line| format!("{padding}{line}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_arguments_py() {
        let first = Parameter::new("aaa", "boolean");
        let mut second = Parameter::new("aaa", "integer");
        second.required = true;
        let mut third = Parameter::new("ccc", "str");
        third.enum_values = Some(vec!["a".to_string(), "c".to_string(), "b".to_string()]);

        assert_eq!(
            gen_arguments_py(&[first, second, third], None),
            "\nargument_spec['aaa'] = {'type': 'bool'}\nargument_spec['aaa'] = {'required': True, 'type': 'int'}\nargument_spec['ccc'] = {'type': 'str', 'choices': ['a', 'b', 'c']}"
        );
    }

    #[test]
    fn test_list_index_never_required() {
        let mut vm = Parameter::new("vm", "string");
        vm.required = true;
        assert_eq!(
            gen_arguments_py(&[vm], Some("vm")),
            "\nargument_spec['vm'] = {'type': 'str'}"
        );
    }

    #[test]
    fn test_secrets_lists_and_defaults() {
        let mut password = Parameter::new("password", "string");
        password.required = true;
        let mut vms = Parameter::new("filter.vms", "array");
        vms.elements = Some("string".to_string());
        let bus = Parameter::new("bus", "integer");
        let mut state = Parameter::new("state", "str");
        state.default = Some("present".to_string());

        let spec = gen_arguments_py(&[password, vms, bus, state], None);
        let lines: Vec<&str> = spec.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "argument_spec['password'] = {'no_log': True, 'required': True, 'type': 'str'}",
                "argument_spec['filter_vms'] = {'type': 'list', 'elements': 'str'}",
                "argument_spec['bus'] = {'type': 'int', 'default': 0}",
                "argument_spec['state'] = {'type': 'str', 'default': 'present'}",
            ]
        );
    }

    #[test]
    fn test_required_if_empty() {
        assert_eq!(required_if_py(&[]), "[]");
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb", 4), "    a\n    b\n");
    }
}
