//! Template engine for module generation using Handlebars.
//!
//! Wraps Handlebars with the built-in module templates and their shared
//! partials pre-registered. Output is Python, so HTML escaping is disabled.
//!
//! # Examples
//!
//! ```
//! use restmod_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "# {{name}}").unwrap();
//! let rendered = engine.render("greeting", &json!({"name": "vcenter_vm"})).unwrap();
//! assert_eq!(rendered, "# vcenter_vm");
//! ```

use handlebars::Handlebars;
use restmod_core::{Error, Result};
use serde::Serialize;

const TEMPLATES: [(&str, &str); 3] = [
    (
        "default_module",
        include_str!("../templates/default_module.py.hbs"),
    ),
    (
        "info_list_and_get_module",
        include_str!("../templates/info_list_and_get_module.py.hbs"),
    ),
    (
        "info_no_list_module",
        include_str!("../templates/info_no_list_module.py.hbs"),
    ),
];

const PARTIALS: [(&str, &str); 12] = [
    ("header", include_str!("../templates/partials/header.py.hbs")),
    (
        "argument_spec",
        include_str!("../templates/partials/argument_spec.py.hbs"),
    ),
    ("main", include_str!("../templates/partials/main.py.hbs")),
    ("footer", include_str!("../templates/partials/footer.py.hbs")),
    (
        "func_with_data",
        include_str!("../templates/partials/func_with_data.py.hbs"),
    ),
    (
        "func_create",
        include_str!("../templates/partials/func_create.py.hbs"),
    ),
    (
        "func_update",
        include_str!("../templates/partials/func_update.py.hbs"),
    ),
    (
        "func_delete",
        include_str!("../templates/partials/func_delete.py.hbs"),
    ),
    (
        "url_with_list",
        include_str!("../templates/partials/url_with_list.py.hbs"),
    ),
    (
        "url_list_only",
        include_str!("../templates/partials/url_list_only.py.hbs"),
    ),
    (
        "url_with_args",
        include_str!("../templates/partials/url_with_args.py.hbs"),
    ),
    (
        "info_entry_point",
        include_str!("../templates/partials/info_entry_point.py.hbs"),
    ),
];

/// Template engine for module generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the module templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in PARTIALS {
            handlebars
                .register_partial(name, source)
                .map_err(|e| Error::TemplateError {
                    template: name.to_string(),
                    message: format!("failed to register partial: {e}"),
                })?;
        }
        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| Error::TemplateError {
                    template: name.to_string(),
                    message: format!("failed to register template: {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns error if the template is unknown, the context cannot be
    /// serialized or a variable is missing.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                template: template_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Registers a custom template.
    ///
    /// # Errors
    ///
    /// Returns error if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
