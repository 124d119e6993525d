//! Rendering one module into its Python file.

use super::types::{ModuleContext, OperationContext};
use crate::common::python::to_literal;
use crate::common::types::GeneratedFile;
use crate::documentation::{
    Description, format_documentation, gen_arguments_py, gen_documentation, indent,
    required_if_py,
};
use crate::module::{AnsibleModule, ModuleKind, gen_required_if};
use crate::template_engine::TemplateEngine;
use restmod_core::{GeneratorConfig, Result};
use tracing::debug;

/// Renders [`AnsibleModule`]s into `plugins/modules/<name>.py`.
///
/// # Examples
///
/// ```
/// use restmod_codegen::generator::ModuleGenerator;
/// use restmod_core::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// let generator = ModuleGenerator::new(&config).unwrap();
/// ```
#[derive(Debug)]
pub struct ModuleGenerator<'a> {
    engine: TemplateEngine<'a>,
    config: &'a GeneratorConfig,
}

impl<'a> ModuleGenerator<'a> {
    /// Creates a generator bound to a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the built-in templates fail to register.
    pub fn new(config: &'a GeneratorConfig) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            config,
        })
    }

    /// Builds the template context of a module.
    ///
    /// # Errors
    ///
    /// Returns error if a description references an unknown resource type
    /// or the documentation cannot be serialized.
    pub fn context(&self, module: &AnsibleModule<'_>) -> Result<ModuleContext> {
        let parameters = module.parameters();
        let list_index = module.list_index();

        let documentation = format_documentation(&gen_documentation(
            module.name(),
            &module.description(),
            &parameters,
            &self.config.documentation,
            &Description::from_config(self.config),
        )?)?;

        let arguments = gen_arguments_py(&parameters, list_index.as_deref());
        let arguments = match arguments.trim_start_matches('\n') {
            "" => String::new(),
            lines => indent(lines, 4),
        };

        let payload_format = to_literal(&serde_json::to_value(module.payload())?);

        let (path, required_if, operations) = match module.kind() {
            ModuleKind::Default => (
                module.get_path(),
                required_if_py(&gen_required_if(&parameters)),
                Self::operations(module),
            ),
            ModuleKind::Info => (module.item_path(), required_if_py(&[]), Vec::new()),
        };
        let list_path = module.list_path();

        Ok(ModuleContext {
            template: module.template().as_str().to_string(),
            name: module.name().to_string(),
            documentation,
            payload_format,
            arguments,
            required_if,
            path: path.unwrap_or_default().to_string(),
            list_path: list_path.unwrap_or_default().to_string(),
            list_index: list_index.unwrap_or_default(),
            url_list_only: path.is_none(),
            url_with_list: list_path.is_some() && path.is_some_and(|p| p.ends_with('}')),
            operations,
        })
    }

    fn operations(module: &AnsibleModule<'_>) -> Vec<OperationContext> {
        let resource = module.resource();
        module
            .default_operation_ids()
            .iter()
            .filter_map(|id| {
                let operation = resource.operations.get(id)?;
                if id.contains('$') {
                    debug!("skipping operation {id} for {}", operation.path);
                    return None;
                }
                Some(OperationContext::new(id, &operation.verb, &operation.path))
            })
            .collect()
    }

    /// Renders a module.
    ///
    /// # Errors
    ///
    /// Returns error if the context cannot be built or rendering fails.
    pub fn render(&self, module: &AnsibleModule<'_>) -> Result<GeneratedFile> {
        let context = self.context(module)?;
        let content = self.engine.render(module.template().as_str(), &context)?;
        debug!("Rendered {} with {}", module.name(), context.template);

        Ok(GeneratedFile {
            path: format!("plugins/modules/{}.py", module.name()),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{Operation, Resource};
    use serde_json::{Value, json};

    fn operation(verb: &str, path: &str, parameters: Value) -> Operation {
        Operation {
            verb: verb.to_string(),
            path: path.to_string(),
            parameters: parameters.as_array().cloned().unwrap_or_default(),
            responses: Value::Null,
        }
    }

    fn folder_resource() -> Resource {
        let mut resource = Resource::new("vcenter_folder");
        resource.operations.insert(
            "list".to_string(),
            operation(
                "get",
                "/rest/vcenter/folder",
                json!([{
                    "in": "query",
                    "name": "filter.names",
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Names that folders must have to match the filter."
                }]),
            ),
        );
        resource.operations.insert(
            "create".to_string(),
            operation(
                "post",
                "/rest/vcenter/folder",
                json!([{
                    "in": "body",
                    "name": "request_body",
                    "schema": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": {"type": "string", "description": "Folder name."}
                        }
                    }
                }]),
            ),
        );
        resource.operations.insert(
            "delete".to_string(),
            operation(
                "delete",
                "/rest/vcenter/folder/{folder}",
                json!([{
                    "in": "path",
                    "name": "folder",
                    "type": "string",
                    "required": true,
                    "description": "Identifier of the folder."
                }]),
            ),
        );
        resource
    }

    #[test]
    fn test_default_module_context() {
        let config = GeneratorConfig::default();
        let generator = ModuleGenerator::new(&config).unwrap();
        let resource = folder_resource();
        let context = generator
            .context(&AnsibleModule::default_module(&resource))
            .unwrap();

        assert_eq!(context.template, "default_module");
        assert_eq!(context.path, "/rest/vcenter/folder");
        assert_eq!(context.list_index, "folder");
        let names: Vec<&str> = context
            .operations
            .iter()
            .map(|o| o.operation.as_str())
            .collect();
        assert_eq!(names, vec!["create", "delete"]);
        assert!(context.required_if.contains("'absent', ['folder'], True"));
        assert!(context.required_if.contains("'present', ['name'], True"));
        assert!(context.arguments.starts_with("    argument_spec['folder']"));
    }

    #[test]
    fn test_info_module_context() {
        let config = GeneratorConfig::default();
        let generator = ModuleGenerator::new(&config).unwrap();
        let resource = folder_resource();
        let context = generator
            .context(&AnsibleModule::info_module(&resource))
            .unwrap();

        assert_eq!(context.template, "info_list_and_get_module");
        assert!(context.url_list_only);
        assert_eq!(context.list_path, "/rest/vcenter/folder");
        assert_eq!(context.required_if, "[]");
        assert!(context.operations.is_empty());
        assert_eq!(
            context.payload_format,
            "{'list': {'query': {'filter.names': 'filter.names'}, 'body': {}, 'path': {}}}"
        );
    }

    #[test]
    fn test_render_default_module() {
        let config = GeneratorConfig::default();
        let generator = ModuleGenerator::new(&config).unwrap();
        let resource = folder_resource();
        let file = generator
            .render(&AnsibleModule::default_module(&resource))
            .unwrap();

        assert_eq!(file.path, "plugins/modules/vcenter_folder.py");
        let content = &file.content;
        assert!(content.starts_with("#!/usr/bin/python\n"));
        assert!(content.contains("# template: default_module"));
        assert!(content.contains("DOCUMENTATION = r'''\nmodule: vcenter_folder\n"));
        assert!(content.contains("EXAMPLES = r\"\"\"\n\"\"\""));
        assert!(content.contains("async def _create(params, session):"));
        assert!(content.contains("async def _delete(params, session):"));
        assert!(content.contains("params[\"folder\"]"));
        assert!(content.contains("async with session.delete(_url, json=payload) as resp:"));
        assert!(content.contains("\"/rest/vcenter/folder/{folder}\""));
        assert!(content.contains("if __name__ == \"__main__\":"));
    }

    #[test]
    fn test_render_info_module() {
        let config = GeneratorConfig::default();
        let generator = ModuleGenerator::new(&config).unwrap();
        let resource = folder_resource();
        let file = generator
            .render(&AnsibleModule::info_module(&resource))
            .unwrap();

        assert_eq!(file.path, "plugins/modules/vcenter_folder_info.py");
        assert!(file.content.contains("# template: URL_LIST_ONLY"));
        assert!(file.content.contains("argument_spec['filter_names']"));
        assert!(!file.content.contains("argument_spec['state']"));
        assert!(file.content.contains("async def entry_point(module, session):"));
    }
}
