//! Rewriting vendor prose into Ansible documentation markup.

use indexmap::IndexMap;
use regex::Regex;
use restmod_core::{Error, GeneratorConfig, Result};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static WHEN_OPERATIONS_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"When operations return.*\.($|\s)").expect("valid regex"));

static RESOURCE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resource type:\s([a-zA-Z][\w\.]+[a-z])").expect("valid regex")
});

static DOTTED_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][\w+]+\.[A-Z][\w+\.-]+").expect("valid regex"));

static ENUMERATED_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r": The\s\S+\senumerated type").expect("valid regex"));

static CODE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@code\s+?(.*)\}").expect("valid regex"));

static PARAM_NAME_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@param.name\s+?(.*)\}").expect("valid regex"));

/// Description normalizer bound to a resource type map and a markup table.
///
/// # Examples
///
/// ```
/// use restmod_codegen::documentation::Description;
/// use restmod_core::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// let description = Description::from_config(&config);
/// let lines = description
///     .normalize(&["Set to {@code true} to enable.".to_string()])
///     .unwrap();
/// assert_eq!(lines, vec!["Set to C(True) to enable."]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Description<'a> {
    resource_types: &'a BTreeMap<String, String>,
    markup: &'a BTreeMap<String, String>,
}

impl<'a> Description<'a> {
    /// Creates a normalizer from explicit tables.
    #[must_use]
    pub const fn new(
        resource_types: &'a BTreeMap<String, String>,
        markup: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            resource_types,
            markup,
        }
    }

    /// Creates a normalizer from the configured tables.
    #[must_use]
    pub const fn from_config(config: &'a GeneratorConfig) -> Self {
        Self::new(&config.resource_types, &config.markup)
    }

    /// Splits embedded line breaks, then rewrites module references, option
    /// references and vendor markup, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownResourceType`] if a line references a resource
    /// type missing from the map.
    pub fn normalize(&self, lines: &[String]) -> Result<Vec<String>> {
        lines
            .iter()
            .flat_map(|line| line.split('\n'))
            .map(|line| {
                let line = self.write_m(line)?;
                let line = write_i(&line);
                Ok(self.clean_up(&line))
            })
            .collect()
    }

    /// Replaces resource type identifiers with `M(module)` references.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownResourceType`] for unmapped resource types.
    pub fn write_m(&self, line: &str) -> Result<String> {
        let line = WHEN_OPERATIONS_RETURN.replace_all(line, "").into_owned();

        let Some(resource_type) = RESOURCE_TYPE
            .captures(&line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return Ok(line);
        };
        let module_name =
            self.resource_types
                .get(&resource_type)
                .ok_or_else(|| Error::UnknownResourceType {
                    resource_type: resource_type.clone(),
                })?;

        let single = format!("must be an identifier for the resource type: {resource_type}");
        if line.contains(&single) {
            return Ok(line.replace(
                &single,
                &format!("must be the id of a resource returned by M({module_name})"),
            ));
        }
        let plural = format!("identifiers for the resource type: {resource_type}");
        if line.contains(&plural) {
            return Ok(line
                .replace(
                    &plural,
                    &format!("the id of resources returned by M({module_name})"),
                )
                .trim_end()
                .to_string());
        }
        Ok(line)
    }

    /// Rewrites vendor markup.
    #[must_use]
    pub fn clean_up(&self, line: &str) -> String {
        let mut line = line
            .replace(" {@term enumerated type}", "")
            .replace("{@name DayOfWeek}", "day of the week");
        line = ENUMERATED_TYPE.replace_all(&line, ": This option").into_owned();
        line = line
            .replace(" <p> ", " ")
            .replace("{@code true}", "C(True)")
            .replace("{@code false}", "C(False)");
        line = CODE_MARKUP.replace_all(&line, "C(${1})").into_owned();
        line = PARAM_NAME_MARKUP.replace_all(&line, "C(${1})").into_owned();
        for (from, to) in self.markup {
            line = line.replace(from.as_str(), to);
        }
        line
    }
}

/// Replaces dotted `Type.field` references with `I(field)`.
///
/// Longer option names are substituted first so a short name never
/// clobbers the prefix of a longer reference.
#[must_use]
pub fn write_i(line: &str) -> String {
    let mut refs: IndexMap<String, &str> = IndexMap::new();
    for found in DOTTED_REFERENCE.find_iter(line) {
        refs.insert(ref_to_parameter(found.as_str()), found.as_str());
    }
    let mut names: Vec<&String> = refs.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut result = line.to_string();
    for name in names {
        result = result.replace(refs[name.as_str()], &format!("I({name})"));
    }
    result
}

/// Converts a dotted reference to an option name.
///
/// # Examples
///
/// ```
/// use restmod_codegen::documentation::ref_to_parameter;
///
/// assert_eq!(ref_to_parameter("Abb.Bccc.Ccc-aaa-eee"), "ccc_aaa_eee");
/// assert_eq!(ref_to_parameter("Cpu.Info.hotAddEnabled"), "hot_add_enabled");
/// ```
#[must_use]
pub fn ref_to_parameter(reference: &str) -> String {
    let last = reference.rsplit('.').next().unwrap_or(reference);
    let mut out = String::with_capacity(last.len() + 4);
    for (i, ch) in last.replace('-', "_").chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}
