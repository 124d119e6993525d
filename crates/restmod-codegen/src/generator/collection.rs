//! Generating a whole collection: every trusted module plus the side files
//! shipped next to them.

use super::module::ModuleGenerator;
use crate::common::types::{GeneratedCode, GeneratedFile};
use crate::module::AnsibleModule;
use crate::swagger::SwaggerFile;
use restmod_core::{Error, GeneratorConfig, Result, TrustMatcher};
use serde::Serialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

const GENERATOR_URL: &str = "https://github.com/ansible-collections/vmware_rest_code_generator";
const MODULE_UTILS_TARGET: &str = "plugins/module_utils/vmware_rest.py";

const MODULE_UTILS_SANITY: [&str; 6] = [
    "compile-2.6!skip",
    "compile-2.7!skip",
    "compile-3.5!skip",
    "import-3.5!skip",
    "metaclass-boilerplate!skip",
    "future-import-boilerplate!skip",
];

const MODULE_SANITY: [&str; 8] = [
    "compile-2.6!skip",
    "compile-2.7!skip",
    "compile-3.5!skip",
    "import-3.5!skip",
    "future-import-boilerplate!skip",
    "metaclass-boilerplate!skip",
    "validate-modules:missing-if-name-main",
    "validate-modules:missing-main-call",
];

/// Generated collection content.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneratedCollection {
    /// Every file to write, relative to the collection root
    pub code: GeneratedCode,
    /// Names of the generated modules, in generation order
    pub modules: Vec<String>,
}

/// Generates the modules of a collection from API descriptions.
///
/// # Examples
///
/// ```
/// use restmod_codegen::generator::CollectionGenerator;
/// use restmod_codegen::swagger::SwaggerFile;
/// use restmod_core::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// let generator = CollectionGenerator::new(&config).unwrap();
/// let swagger = SwaggerFile::parse(
///     "folder.json",
///     r#"{"paths": {"/rest/vcenter/folder": {"get": {"operationId": "list", "parameters": []}}}}"#,
///     &config.broken_operations,
/// )
/// .unwrap();
/// let collection = generator.generate(&[swagger], "abc123").unwrap();
/// assert_eq!(collection.modules, vec!["vcenter_folder_info"]);
/// ```
#[derive(Debug)]
pub struct CollectionGenerator<'a> {
    modules: ModuleGenerator<'a>,
    trust: TrustMatcher,
    config: &'a GeneratorConfig,
}

impl<'a> CollectionGenerator<'a> {
    /// Creates a generator bound to a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the built-in templates fail to register or a
    /// `trust.allow` pattern is not a valid regex.
    pub fn new(config: &'a GeneratorConfig) -> Result<Self> {
        Ok(Self {
            modules: ModuleGenerator::new(config)?,
            trust: config.trust.compile()?,
            config,
        })
    }

    /// Renders every trusted module of `files` and the side files.
    ///
    /// `revision` is the generator version stamped in `dev.md` and
    /// `commit_message`.
    ///
    /// # Errors
    ///
    /// Returns error if resources cannot be built, a module fails to
    /// render, or the configured `module_utils` file cannot be read.
    pub fn generate(&self, files: &[SwaggerFile], revision: &str) -> Result<GeneratedCollection> {
        let mut collection = GeneratedCollection::default();

        for file in files {
            info!("Generating modules from {}", file.source);
            let resources = file.resources(&self.config.skip_resources)?;

            for resource in resources.values() {
                let has_list = resource.operations.contains_key("list");
                let has_get = resource.operations.contains_key("get");
                if has_list || has_get {
                    self.add_module(&mut collection, &AnsibleModule::info_module(resource))?;
                }
                self.add_module(&mut collection, &AnsibleModule::default_module(resource))?;
            }
        }

        for file in self.side_files(&collection.modules, revision)? {
            collection.code.add_file(file);
        }

        info!(
            "Generated {} modules ({} files)",
            collection.modules.len(),
            collection.code.file_count()
        );
        Ok(collection)
    }

    fn add_module(
        &self,
        collection: &mut GeneratedCollection,
        module: &AnsibleModule<'_>,
    ) -> Result<()> {
        if !module.is_trusted(&self.trust) {
            debug!("Skipping untrusted module {}", module.name());
            return Ok(());
        }
        if module.default_operation_ids().is_empty() {
            debug!("Skipping {}: no operation", module.name());
            return Ok(());
        }
        let file = self.modules.render(module)?;
        info!("Generated {}", file.path);
        collection.code.add_file(file);
        collection.modules.push(module.name().to_string());
        Ok(())
    }

    /// Builds the sanity ignore files, `dev.md`, `commit_message` and the
    /// optional `module_utils` copy.
    ///
    /// # Errors
    ///
    /// Returns error if the configured `module_utils` file cannot be read.
    pub fn side_files(&self, modules: &[String], revision: &str) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();

        let ignore = sanity_ignore(modules);
        for version in &self.config.sanity_versions {
            files.push(GeneratedFile {
                path: format!("tests/sanity/ignore-{version}.txt"),
                content: ignore.clone(),
            });
        }

        let generated_by = format!(
            "The modules are autogenerated by:\n{GENERATOR_URL}\nversion: {revision}\n"
        );
        files.push(GeneratedFile {
            path: "dev.md".to_string(),
            content: generated_by.clone(),
        });
        files.push(GeneratedFile {
            path: "commit_message".to_string(),
            content: format!("bump auto-generated modules\n\n{generated_by}"),
        });

        if let Some(source) = &self.config.module_utils {
            let content = std::fs::read_to_string(source)
                .map_err(|e| Error::io(source.display().to_string(), e))?;
            files.push(GeneratedFile {
                path: MODULE_UTILS_TARGET.to_string(),
                content,
            });
        }
        Ok(files)
    }
}

/// Content of `tests/sanity/ignore-<version>.txt`.
///
/// # Examples
///
/// ```
/// use restmod_codegen::generator::sanity_ignore;
///
/// let content = sanity_ignore(&["vcenter_vm_info".to_string()]);
/// assert!(content.contains("plugins/modules/vcenter_vm_info.py import-3.5!skip\n"));
/// ```
#[must_use]
pub fn sanity_ignore(modules: &[String]) -> String {
    let mut content = String::new();
    for test in MODULE_UTILS_SANITY {
        content.push_str(&format!("{MODULE_UTILS_TARGET} {test}\n"));
    }
    for module in modules {
        for test in MODULE_SANITY {
            content.push_str(&format!("plugins/modules/{module}.py {test}\n"));
        }
    }
    content
}

/// Commit hash of the git checkout at `dir`.
///
/// # Errors
///
/// Returns [`Error::IoError`] if git cannot be run or fails.
pub fn git_revision(dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["log", "--no-decorate", "-1", "--pretty=tformat:%H"])
        .env("PAGER", "cat")
        .current_dir(dir)
        .output()
        .map_err(|e| Error::io(dir.display().to_string(), e))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::io(
            dir.display().to_string(),
            std::io::Error::other(format!("git log failed: {}", stderr.trim())),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end_matches('\n')
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "paths": {
            "/rest/vcenter/datacenter": {
                "get": {"operationId": "list", "parameters": []},
                "post": {"operationId": "create", "parameters": []}
            },
            "/rest/vcenter/datacenter/{datacenter}": {
                "delete": {"operationId": "delete", "parameters": [
                    {"in": "path", "name": "datacenter", "type": "string", "required": true}
                ]}
            },
            "/rest/appliance/networking": {
                "get": {"operationId": "get", "parameters": []}
            }
        }
    }"#;

    #[test]
    fn test_generate_filters_untrusted() {
        let config = GeneratorConfig::default();
        let generator = CollectionGenerator::new(&config).unwrap();
        let swagger = SwaggerFile::parse("sample.json", SAMPLE, &[]).unwrap();
        let collection = generator.generate(&[swagger], "deadbeef").unwrap();

        assert_eq!(
            collection.modules,
            vec![
                "vcenter_datacenter_info".to_string(),
                "vcenter_datacenter".to_string()
            ]
        );
        assert!(collection.code.get("plugins/modules/vcenter_datacenter.py").is_some());
        assert!(collection.code.get("plugins/modules/appliance_networking_info.py").is_none());
        assert!(collection.code.get("tests/sanity/ignore-2.9.txt").is_some());
        assert!(collection.code.get("tests/sanity/ignore-2.10.txt").is_some());
        assert!(collection.code.get(MODULE_UTILS_TARGET).is_none());
    }

    #[test]
    fn test_invalid_trust_pattern_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.trust.allow.push("^vcenter_(".to_string());
        let err = CollectionGenerator::new(&config).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_side_files() {
        let config = GeneratorConfig::default();
        let generator = CollectionGenerator::new(&config).unwrap();
        let files = generator
            .side_files(&["vcenter_vm".to_string()], "0123abcd")
            .unwrap();

        let dev = files.iter().find(|f| f.path == "dev.md").unwrap();
        assert_eq!(
            dev.content,
            "The modules are autogenerated by:\nhttps://github.com/ansible-collections/vmware_rest_code_generator\nversion: 0123abcd\n"
        );
        let commit = files.iter().find(|f| f.path == "commit_message").unwrap();
        assert!(commit.content.starts_with("bump auto-generated modules\n\nThe modules"));
    }

    #[test]
    fn test_sanity_ignore_layout() {
        let content = sanity_ignore(&["vcenter_vm".to_string()]);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "plugins/module_utils/vmware_rest.py compile-2.6!skip");
        assert_eq!(
            lines[13],
            "plugins/modules/vcenter_vm.py validate-modules:missing-main-call"
        );
    }

    #[test]
    fn test_module_utils_copy() {
        let mut source = tempfile::NamedTempFile::new().unwrap();
        write!(source, "# helper").unwrap();
        let config = GeneratorConfig {
            module_utils: Some(source.path().to_path_buf()),
            ..GeneratorConfig::default()
        };
        let generator = CollectionGenerator::new(&config).unwrap();
        let files = generator.side_files(&[], "rev").unwrap();
        let copy = files.iter().find(|f| f.path == MODULE_UTILS_TARGET).unwrap();
        assert_eq!(copy.content, "# helper");
    }

    #[test]
    fn test_module_utils_missing() {
        let config = GeneratorConfig {
            module_utils: Some("/nonexistent/vmware_rest.py".into()),
            ..GeneratorConfig::default()
        };
        let generator = CollectionGenerator::new(&config).unwrap();
        let err = generator.side_files(&[], "rev").unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_git_revision_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(git_revision(dir.path()).is_err());
    }
}
