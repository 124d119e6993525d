//! Variables a task reads through Jinja2 expressions.
//!
//! The parsing is deliberately naive: only the leading variable of a
//! `{{ ... }}` expression is kept, which is enough to link a task to the
//! `register` or `set_fact` that produced its input.

use serde_yaml::Value;
use std::collections::BTreeSet;

/// Leading variable of a Jinja2 expression.
///
/// Returns `None` for lookups and loop variables.
///
/// # Examples
///
/// ```
/// use restmod_examples::naive_variable_from_jinja2;
///
/// assert_eq!(naive_variable_from_jinja2("{{ my_vm.id }}").as_deref(), Some("my_vm"));
/// assert_eq!(naive_variable_from_jinja2("{{ not result.changed }}").as_deref(), Some("result"));
/// assert_eq!(naive_variable_from_jinja2("{{ item.name }}"), None);
/// assert_eq!(naive_variable_from_jinja2("{{ lookup('env', 'HOME') }}"), None);
/// ```
#[must_use]
pub fn naive_variable_from_jinja2(raw: &str) -> Option<String> {
    let expression = raw.trim_matches(|c: char| matches!(c, ' ' | '{' | '}'));
    if expression.contains("lookup(") {
        return None;
    }
    let expression = expression.strip_prefix("not ").unwrap_or(expression);
    let variable = expression.split('.').next().unwrap_or_default();
    if variable == "item" {
        return None;
    }
    Some(variable.to_string())
}

/// Variables referenced anywhere in `task`, `_` prefixed ones excluded.
///
/// Strings are only inspected when they carry a `{{ ... }}` expression,
/// except for `with_items` which names its source variable directly.
/// The result is sorted and free of duplicates.
#[must_use]
pub fn list_dependencies(task: &Value) -> Vec<String> {
    let mut dependencies = BTreeSet::new();
    collect(task, &mut dependencies);
    dependencies
        .into_iter()
        .filter(|name| !name.starts_with('_'))
        .collect()
}

fn collect(node: &Value, out: &mut BTreeSet<String>) {
    match node {
        Value::String(text) => {
            if text.starts_with('{') {
                out.extend(naive_variable_from_jinja2(text));
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Mapping(map) => {
            for (key, value) in map {
                match value {
                    Value::Mapping(_) | Value::Sequence(_) => collect(value, out),
                    Value::String(text) if text.contains("{{") => {
                        out.extend(naive_variable_from_jinja2(text));
                    }
                    Value::String(text) if key.as_str() == Some("with_items") => {
                        if let Some(variable) = text.split('.').next() {
                            out.insert(variable.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Tagged(tagged) => collect(&tagged.value, out),
        _ => {}
    }
}
