//! The module model: which options a resource exposes and how they map onto
//! its operations.

use super::naming::describe;
use super::parameter::{Parameter, property_to_parameter};
use crate::common::python;
use crate::swagger::Resource;
use indexmap::IndexMap;
use regex::Regex;
use restmod_core::TrustMatcher;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static LIST_INDEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([-\w]+)\}$").expect("valid regex"));

/// Flavor of a generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Acts on the resource: every operation except `get` and `list`
    Default,
    /// Reads the resource through `get` and `list`
    Info,
}

/// Template a module is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleTemplate {
    /// State-driven module
    DefaultModule,
    /// Info module of a resource with a `list` operation
    InfoListAndGetModule,
    /// Info module of a resource with only `get`
    InfoNoListModule,
}

impl ModuleTemplate {
    /// Registered template name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultModule => "default_module",
            Self::InfoListAndGetModule => "info_list_and_get_module",
            Self::InfoNoListModule => "info_no_list_module",
        }
    }
}

/// Per-operation payload layout: option name to location in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayloadFormat {
    /// Options sent in the query string
    pub query: IndexMap<String, String>,
    /// Options sent in the JSON body
    pub body: IndexMap<String, String>,
    /// Options substituted in the URL
    pub path: IndexMap<String, String>,
}

/// An Ansible module built on top of one resource.
#[derive(Debug, Clone)]
pub struct AnsibleModule<'a> {
    resource: &'a Resource,
    kind: ModuleKind,
    name: String,
    default_operation_ids: Vec<String>,
}

impl<'a> AnsibleModule<'a> {
    /// The state-driven module of `resource`.
    #[must_use]
    pub fn default_module(resource: &'a Resource) -> Self {
        let default_operation_ids = resource
            .operations
            .keys()
            .filter(|id| !matches!(id.as_str(), "get" | "list"))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            resource,
            kind: ModuleKind::Default,
            name: resource.name.clone(),
            default_operation_ids,
        }
    }

    /// The `_info` module of `resource`.
    #[must_use]
    pub fn info_module(resource: &'a Resource) -> Self {
        Self {
            resource,
            kind: ModuleKind::Info,
            name: format!("{}_info", resource.name),
            default_operation_ids: vec!["get".to_string(), "list".to_string()],
        }
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module flavor.
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Underlying resource.
    #[must_use]
    pub const fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// Operations this module drives, sorted.
    #[must_use]
    pub fn default_operation_ids(&self) -> &[String] {
        &self.default_operation_ids
    }

    /// Template to render the module with.
    #[must_use]
    pub fn template(&self) -> ModuleTemplate {
        match self.kind {
            ModuleKind::Default => ModuleTemplate::DefaultModule,
            ModuleKind::Info if self.resource.operations.contains_key("list") => {
                ModuleTemplate::InfoListAndGetModule
            }
            ModuleKind::Info => ModuleTemplate::InfoNoListModule,
        }
    }

    /// One-line description of the module.
    #[must_use]
    pub fn description(&self) -> String {
        describe(&self.name)
    }

    /// Returns `true` if the module is published under `trust`.
    #[must_use]
    pub fn is_trusted(&self, trust: &TrustMatcher) -> bool {
        trust.is_trusted(&self.name)
    }

    /// Returns `true` if the resource implements one of the module operations.
    #[must_use]
    pub fn has_operations(&self) -> bool {
        self.default_operation_ids
            .iter()
            .any(|id| self.resource.operations.contains_key(id))
    }

    /// Path of the first operation of the resource.
    #[must_use]
    pub fn get_path(&self) -> Option<&str> {
        self.resource
            .operations
            .values()
            .next()
            .map(|op| op.path.as_str())
    }

    /// Path of the `list` operation.
    #[must_use]
    pub fn list_path(&self) -> Option<&str> {
        self.resource
            .operations
            .get("list")
            .map(|op| op.path.as_str())
    }

    /// Path of the `get` operation.
    #[must_use]
    pub fn item_path(&self) -> Option<&str> {
        self.resource
            .operations
            .get("get")
            .map(|op| op.path.as_str())
    }

    /// Name of the key identifying one item: the trailing `{key}` of the
    /// first of the `get`, `update` or `delete` paths.
    #[must_use]
    pub fn list_index(&self) -> Option<String> {
        let operation = ["get", "update", "delete"]
            .iter()
            .find_map(|id| self.resource.operations.get(*id))?;
        LIST_INDEX_REGEX
            .captures(&operation.path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Where each option of each module operation goes in the request.
    #[must_use]
    pub fn payload(&self) -> IndexMap<String, PayloadFormat> {
        let mut payload = IndexMap::new();
        for (operation_id, operation) in &self.resource.operations {
            if !self.default_operation_ids.contains(operation_id) {
                continue;
            }
            let mut format = PayloadFormat::default();
            for parameter in property_to_parameter(&operation.parameters) {
                let target = match parameter.location.as_deref() {
                    Some("query") => &mut format.query,
                    Some("path") => &mut format.path,
                    _ => &mut format.body,
                };
                let loc = parameter
                    .loc_in_payload
                    .unwrap_or_else(|| parameter.name.clone());
                target.insert(parameter.name, loc);
            }
            payload.insert(operation_id.clone(), format);
        }
        payload
    }

    /// Fields of the `value` object returned by `get`.
    #[must_use]
    pub fn answer(&self) -> Option<&'a Map<String, Value>> {
        self.resource
            .operations
            .get("get")?
            .responses
            .get("200")?
            .get("schema")?
            .get("properties")?
            .get("value")?
            .get("properties")?
            .as_object()
    }

    /// Merged, sorted option list of the module.
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut results: IndexMap<String, Parameter> = IndexMap::new();

        for operation_id in sort_operation_ids(&self.default_operation_ids) {
            let Some(operation) = self.resource.operations.get(&operation_id) else {
                continue;
            };
            for parameter in property_to_parameter(&operation.parameters) {
                let entry = results
                    .entry(parameter.name.clone())
                    .or_insert_with(|| Parameter {
                        enum_values: None,
                        operation_ids: Vec::new(),
                        ..parameter.clone()
                    });
                if parameter.description.len() > entry.description.len() {
                    entry.description.clone_from(&parameter.description);
                }
                if let Some(values) = parameter.enum_values {
                    entry.enum_values.get_or_insert_with(Vec::new).extend(values);
                }
                entry.operation_ids.push(operation_id.clone());
                entry.operation_ids.sort();
            }
        }

        if self.answer().is_some_and(|fields| fields.contains_key("label")) {
            results.insert("label".to_string(), Parameter::new("label", "str"));
        }

        for parameter in results.values_mut() {
            if let Some(values) = parameter.enum_values.as_mut() {
                values.sort();
                values.dedup();
            }
            if !parameter.required {
                continue;
            }
            let needed_everywhere = self
                .default_operation_ids
                .iter()
                .all(|id| parameter.operation_ids.contains(id));
            if needed_everywhere {
                parameter.description.push_str(" This parameter is mandatory.");
            } else {
                let states = ansible_state(&parameter.operation_ids);
                parameter.description.push_str(&format!(
                    " Required with I(state={})",
                    python::list_repr(&states)
                ));
                parameter.required_with_states = states;
                parameter.required = false;
            }
        }

        let states: BTreeSet<String> = self
            .default_operation_ids
            .iter()
            .map(|id| match id.as_str() {
                "create" | "update" => "present".to_string(),
                "delete" => "absent".to_string(),
                other => other.to_string(),
            })
            .collect();
        let mut state = Parameter::new("state", "str");
        if states.contains("present") {
            state.default = Some("present".to_string());
        } else if states.contains("set") {
            state.default = Some("set".to_string());
        } else if !states.is_empty() {
            state.required = true;
        }
        state.enum_values = Some(states.into_iter().collect());
        results.insert("state".to_string(), state);

        if self.resource.operations.len() == 1 || self.kind == ModuleKind::Info {
            results.shift_remove("state");
        }

        let mut parameters: Vec<Parameter> = results.into_values().collect();
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        parameters
    }
}

/// Sorted operationIds with `create` first.
fn sort_operation_ids(ids: &[String]) -> Vec<String> {
    let mut sorted: Vec<String> = ids.to_vec();
    sorted.sort();
    sorted.dedup();
    if let Some(position) = sorted.iter().position(|id| id == "create") {
        let create = sorted.remove(position);
        sorted.insert(0, create);
    }
    sorted
}

/// Maps operationIds onto the `state` values selecting them.
///
/// `update` only counts when the resource can also be created.
///
/// # Examples
///
/// ```
/// use restmod_codegen::module::ansible_state;
///
/// let ids = vec!["create".to_string(), "delete".to_string(), "update".to_string()];
/// assert_eq!(ansible_state(&ids), vec!["absent", "present"]);
/// assert_eq!(ansible_state(&["update".to_string()]), Vec::<String>::new());
/// ```
#[must_use]
pub fn ansible_state(operation_ids: &[String]) -> Vec<String> {
    let has_create = operation_ids.iter().any(|id| id == "create");
    operation_ids
        .iter()
        .filter(|id| *id != "update" || has_create)
        .map(|id| match id.as_str() {
            "create" | "update" => "present".to_string(),
            "delete" => "absent".to_string(),
            other => other.to_string(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Groups the state-conditional options by state for `required_if`.
///
/// Each entry reads `["state", <state>, [<options>], True]` once rendered.
#[must_use]
pub fn gen_required_if(parameters: &[Parameter]) -> Vec<(String, Vec<String>)> {
    let mut by_state: IndexMap<String, Vec<String>> = IndexMap::new();
    for parameter in parameters {
        for state in &parameter.required_with_states {
            by_state
                .entry(state.clone())
                .or_default()
                .push(parameter.name.clone());
        }
    }
    by_state.into_iter().collect()
}
