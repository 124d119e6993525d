//! Template contexts for module rendering.

use serde::Serialize;

/// Context for rendering one module template.
///
/// Every field is always present: templates render in strict mode.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleContext {
    /// Template name, echoed in the module header
    pub template: String,
    /// Module name
    pub name: String,
    /// Raw Python string literal holding the YAML documentation
    pub documentation: String,
    /// Python literal of the payload layout
    pub payload_format: String,
    /// Indented `argument_spec[...]` lines
    pub arguments: String,
    /// Python literal of the `required_if` rules
    pub required_if: String,
    /// URL of the item (or of the first operation for state modules)
    pub path: String,
    /// URL of the `list` operation, empty when absent
    pub list_path: String,
    /// Key identifying one item, empty when absent
    pub list_index: String,
    /// Info module without a `get` operation
    pub url_list_only: bool,
    /// Info module able to both list and fetch one item
    pub url_with_list: bool,
    /// Operations of a state module, sorted
    pub operations: Vec<OperationContext>,
}

/// One `_<operation>` function of a state module.
///
/// # Examples
///
/// ```
/// use restmod_codegen::generator::OperationContext;
///
/// let op = OperationContext::new("delete", "delete", "/rest/vcenter/folder/{folder}");
/// assert!(op.is_delete);
/// assert!(!op.is_create);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationContext {
    /// operationId, `$task` already stripped
    pub operation: String,
    /// Lowercase HTTP verb
    pub verb: String,
    /// URL of the operation
    pub path: String,
    /// Rendered with the create template
    pub is_create: bool,
    /// Rendered with the update template
    pub is_update: bool,
    /// Rendered with the delete template
    pub is_delete: bool,
}

impl OperationContext {
    /// Creates the context of one operation.
    #[must_use]
    pub fn new(operation: &str, verb: &str, path: &str) -> Self {
        Self {
            operation: operation.to_string(),
            verb: verb.to_string(),
            path: path.to_string(),
            is_create: operation == "create",
            is_update: operation == "update",
            is_delete: operation == "delete",
        }
    }
}
