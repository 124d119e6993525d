//! Loading an API description and grouping its paths into resources.

use super::definitions::{Definitions, expand_ref};
use super::path::{Operation, Path, path_to_name};
use indexmap::IndexMap;
use restmod_core::{BrokenOperation, Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// A logical resource: every operation whose path maps to the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Resource name, e.g. `vcenter_vm_hardware_cdrom`
    pub name: String,
    /// Operations keyed by operationId, `$task` suffixes removed
    pub operations: IndexMap<String, Operation>,
}

impl Resource {
    /// Creates an empty resource.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: IndexMap::new(),
        }
    }
}

/// A parsed API description.
#[derive(Debug, Clone)]
pub struct SwaggerFile {
    /// Source label used in logs and errors
    pub source: String,
    /// The `definitions` table
    pub definitions: Definitions,
    /// Kept paths keyed by normalized path
    pub paths: IndexMap<String, Path>,
}

impl SwaggerFile {
    /// Parses an API description from JSON text.
    ///
    /// References are expanded before the paths are loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid, `paths` is missing, or a
    /// reference cannot be resolved.
    pub fn parse(source: &str, content: &str, broken: &[BrokenOperation]) -> Result<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| Error::serialization(format!("failed to parse {source}"), e))?;
        Self::from_value(source, document, broken)
    }

    /// Builds an API description from an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if `paths` is missing or a reference cannot be
    /// resolved.
    pub fn from_value(
        source: &str,
        mut document: Value,
        broken: &[BrokenOperation],
    ) -> Result<Self> {
        expand_ref(&mut document)?;

        let definitions = match document.get("definitions") {
            Some(Value::Object(map)) => Definitions::new(map.clone()),
            _ => Definitions::default(),
        };
        let Some(Value::Object(raw_paths)) = document.get("paths") else {
            return Err(Error::SwaggerError {
                file: source.to_string(),
                message: "missing 'paths' object".to_string(),
            });
        };

        let paths = Self::load_paths(raw_paths, broken)?;
        info!("Loaded {} paths from {source}", paths.len());

        Ok(Self {
            source: source.to_string(),
            definitions,
            paths,
        })
    }

    /// Reads and parses an API description file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(file: &std::path::Path, broken: &[BrokenOperation]) -> Result<Self> {
        let content = std::fs::read_to_string(file)
            .map_err(|e| Error::io(file.display().to_string(), e))?;
        Self::parse(&file.display().to_string(), &content, broken)
    }

    /// Builds [`Path`]s from the raw `paths` object.
    ///
    /// Technology Preview paths and the `broken` operations are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SwaggerError`] if a verb has no operationId.
    pub fn load_paths(
        raw_paths: &Map<String, Value>,
        broken: &[BrokenOperation],
    ) -> Result<IndexMap<String, Path>> {
        let mut result = IndexMap::new();

        for (raw_path, raw_value) in raw_paths {
            let verbs = raw_value.as_object().cloned().unwrap_or_default();
            let mut path = Path::new(raw_path, verbs);
            if path.is_tech_preview() {
                debug!("Skipping {} (Technology Preview)", path.path);
                continue;
            }

            for (verb, desc) in &path.value {
                let operation_id = desc
                    .get("operationId")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::SwaggerError {
                        file: path.path.clone(),
                        message: format!("verb '{verb}' has no operationId"),
                    })?;
                if broken.iter().any(|b| b.matches(&path.path, operation_id)) {
                    debug!("Skipping {} {operation_id} (broken)", path.path);
                    continue;
                }
                let parameters = desc
                    .get("parameters")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let responses = desc.get("responses").cloned().unwrap_or(Value::Null);
                path.operations.insert(
                    operation_id.to_string(),
                    Operation {
                        verb: verb.clone(),
                        path: path.path.clone(),
                        parameters,
                        responses,
                    },
                );
            }
            result.insert(path.path.clone(), path);
        }
        Ok(result)
    }

    /// Groups paths into resources by [`path_to_name`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOperation`] when a resource receives the same
    /// operationId twice.
    pub fn init_resources<'a>(
        paths: impl IntoIterator<Item = &'a Path>,
        skip: &[String],
    ) -> Result<IndexMap<String, Resource>> {
        let mut resources: IndexMap<String, Resource> = IndexMap::new();
        for path in paths {
            let name = path_to_name(&path.path);
            if skip.contains(&name) {
                continue;
            }
            let resource = resources
                .entry(name.clone())
                .or_insert_with(|| Resource::new(name.clone()));

            for (operation_id, operation) in &path.operations {
                if resource.operations.contains_key(operation_id) {
                    return Err(Error::DuplicateOperation {
                        resource: name,
                        operation: operation_id.clone(),
                    });
                }
                resource
                    .operations
                    .insert(operation_id.replace("$task", ""), operation.clone());
            }
        }
        Ok(resources)
    }

    /// Groups the paths of this file into resources.
    ///
    /// # Errors
    ///
    /// See [`SwaggerFile::init_resources`].
    pub fn resources(&self, skip: &[String]) -> Result<IndexMap<String, Resource>> {
        Self::init_resources(self.paths.values(), skip)
    }
}
