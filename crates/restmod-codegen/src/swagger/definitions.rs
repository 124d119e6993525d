//! Schema definitions and `$ref` expansion.

use restmod_core::{Error, Result};
use serde_json::{Map, Value};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Definition that references itself through nested localizable messages.
const LOCALIZATION_PARAM: &str = "vapi.std.localization_param";

/// The `definitions` table of an API description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    definitions: Map<String, Value>,
}

impl Definitions {
    /// Wraps a raw `definitions` object.
    #[must_use]
    pub const fn new(definitions: Map<String, Value>) -> Self {
        Self { definitions }
    }

    /// Strips the `#/definitions/` prefix of a reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_codegen::swagger::Definitions;
    ///
    /// assert_eq!(Definitions::ref_to_dotted("#/definitions/vcenter.VM_resp"), "vcenter.VM_resp");
    /// assert_eq!(Definitions::ref_to_dotted("vcenter.VM_resp"), "vcenter.VM_resp");
    /// ```
    #[must_use]
    pub fn ref_to_dotted(reference: &str) -> &str {
        reference
            .strip_prefix(DEFINITIONS_PREFIX)
            .unwrap_or(reference)
    }

    /// Looks a definition up by reference or dotted name.
    ///
    /// `appliance.networking_change_task` is an alias of
    /// `appliance.networking_change$task`, and names missing from the table
    /// are retried with the `com.vmware.` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefinitionNotFound`] if neither name exists.
    pub fn get(&self, reference: &str) -> Result<&Value> {
        let mut dotted = Self::ref_to_dotted(reference);
        if dotted == "appliance.networking_change_task" {
            dotted = "appliance.networking_change$task";
        }
        self.definitions
            .get(dotted)
            .or_else(|| self.definitions.get(&format!("com.vmware.{dotted}")))
            .ok_or_else(|| Error::DefinitionNotFound {
                reference: reference.to_string(),
            })
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns an inline copy of `node` with every `$ref` resolved.
    ///
    /// A `description` next to a `$ref` replaces the description of the
    /// definition. A reference already being expanded higher in the tree, and
    /// any reference to `vapi.std.localization_param`, becomes
    /// `{"go_to": "<name>"}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefinitionNotFound`] for a dangling reference.
    pub fn expand(&self, node: &Value) -> Result<Value> {
        let mut chain = Vec::new();
        self.expand_node(node, &mut chain)
    }

    fn expand_node(&self, node: &Value, chain: &mut Vec<String>) -> Result<Value> {
        match node {
            Value::Array(items) => items
                .iter()
                .map(|item| self.expand_node(item, chain))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.expand_ref(reference, map.get("description"), chain);
                }
                let mut expanded = Map::with_capacity(map.len());
                for (key, value) in map {
                    expanded.insert(key.clone(), self.expand_node(value, chain)?);
                }
                Ok(Value::Object(expanded))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn expand_ref(
        &self,
        reference: &str,
        description: Option<&Value>,
        chain: &mut Vec<String>,
    ) -> Result<Value> {
        let dotted = Self::ref_to_dotted(reference).to_string();
        if dotted == LOCALIZATION_PARAM || chain.contains(&dotted) {
            tracing::debug!("Cutting recursive reference to {dotted}");
            return Ok(serde_json::json!({ "go_to": dotted }));
        }

        let definition = self.get(reference)?;
        chain.push(dotted);
        let expanded = self.expand_node(definition, chain);
        chain.pop();

        let mut expanded = expanded?;
        if let (Some(description), Value::Object(map)) = (description, &mut expanded) {
            map.insert("description".to_string(), description.clone());
        }
        Ok(expanded)
    }
}

/// Resolves every `$ref` below `document["paths"]` in place.
///
/// # Errors
///
/// Returns [`Error::DefinitionNotFound`] for a dangling reference.
///
/// # Examples
///
/// ```
/// use restmod_codegen::swagger::expand_ref;
/// use serde_json::json;
///
/// let mut doc = json!({
///     "paths": {"/a": {"get": {"parameters": [{"schema": {"$ref": "#/definitions/A"}}]}}},
///     "definitions": {"A": {"type": "object"}}
/// });
/// expand_ref(&mut doc).unwrap();
/// assert_eq!(doc["paths"]["/a"]["get"]["parameters"][0]["schema"], json!({"type": "object"}));
/// ```
pub fn expand_ref(document: &mut Value) -> Result<()> {
    let definitions = match document.get("definitions") {
        Some(Value::Object(map)) => Definitions::new(map.clone()),
        _ => Definitions::default(),
    };
    if let Some(paths) = document.get_mut("paths") {
        *paths = definitions.expand(paths)?;
    }
    Ok(())
}
