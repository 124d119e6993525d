//! HTTP paths, operations and resource naming.

use serde::Serialize;
use serde_json::{Map, Value};

/// One HTTP verb of one path, keyed by its operationId.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// Lowercase HTTP verb
    pub verb: String,
    /// Normalized path the operation is served on
    pub path: String,
    /// Raw parameter objects, `$ref`s already expanded
    pub parameters: Vec<Value>,
    /// Raw responses object keyed by status code
    pub responses: Value,
}

/// A path of the API description with its verbs.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Normalized path
    pub path: String,
    /// Raw verb map
    pub value: Map<String, Value>,
    /// Operations kept after filtering, keyed by raw operationId
    pub operations: indexmap::IndexMap<String, Operation>,
}

impl Path {
    /// Creates a path, prefixing pre-7.0 paths with `/rest`.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_codegen::swagger::Path;
    ///
    /// assert_eq!(Path::new("/vcenter/vm", Default::default()).path, "/rest/vcenter/vm");
    /// assert_eq!(Path::new("/api/vcenter/vm", Default::default()).path, "/api/vcenter/vm");
    /// ```
    #[must_use]
    pub fn new(path: &str, value: Map<String, Value>) -> Self {
        let path = if path.starts_with("/rest") || path.starts_with("/api") {
            path.to_string()
        } else {
            format!("/rest{path}")
        };
        Self {
            path,
            value,
            operations: indexmap::IndexMap::new(),
        }
    }

    /// Summary of `verb`, empty when absent.
    #[must_use]
    pub fn summary(&self, verb: &str) -> &str {
        self.value
            .get(verb)
            .and_then(|v| v.get("summary"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns `true` if any verb is flagged as a Technology Preview.
    #[must_use]
    pub fn is_tech_preview(&self) -> bool {
        self.value
            .keys()
            .any(|verb| self.summary(verb).contains("Technology Preview"))
    }
}

/// Derives the resource name of a path.
///
/// Segments holding a `{key}` are dropped; once two keys were seen the
/// remaining segments are sub-actions folded into the main resource. A
/// trailing power action is dropped, then the API prefix is removed.
///
/// # Examples
///
/// ```
/// use restmod_codegen::swagger::path_to_name;
///
/// assert_eq!(path_to_name("/rest/vcenter/vm/{vm}/power/start"), "vcenter_vm_power");
/// assert_eq!(
///     path_to_name("/rest/com/vmware/cis/tagging/category/id:{category_id}?~action=add-to-used-by"),
///     "cis_tagging_category"
/// );
/// ```
#[must_use]
pub fn path_to_name(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    let trimmed = trimmed.split('?').next().unwrap_or_default();

    let mut elements: Vec<&str> = Vec::new();
    let mut keys = 0usize;
    for segment in trimmed.split('/') {
        if segment.contains('{') {
            keys += 1;
        } else if keys > 1 {
            continue;
        } else {
            elements.push(segment);
        }
    }

    if matches!(
        elements.last(),
        Some(&("stop" | "start" | "suspend" | "reset"))
    ) {
        elements.pop();
    }

    let skip = if elements.starts_with(&["rest", "com", "vmware"]) {
        3
    } else if elements.starts_with(&["rest", "hvc"])
        || elements.starts_with(&["rest", "appliance"])
        || elements.starts_with(&["rest", "vcenter"])
        || elements.starts_with(&["api"])
    {
        1
    } else {
        0
    };

    elements[skip..].join("_").replace('-', "")
}
