//! Generator configuration.
//!
//! A [`GeneratorConfig`] describes one target collection: which API
//! descriptions to read, which resources become modules, how vendor prose is
//! rewritten, and the metadata stamped on every module. The defaults describe
//! the `vmware.vmware_rest` collection, so running without a config file
//! reproduces it.
//!
//! # Examples
//!
//! ```
//! use restmod_core::GeneratorConfig;
//!
//! let config = GeneratorConfig::default();
//! assert!(config.api_files.contains(&"vcenter.json".to_string()));
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "restmod.toml";

/// Top-level configuration of a generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// API description files, relative to the schema directory.
    pub api_files: Vec<String>,
    /// Resource names that are never turned into modules.
    pub skip_resources: Vec<String>,
    /// Ansible versions that get a `tests/sanity/ignore-<version>.txt`.
    pub sanity_versions: Vec<String>,
    /// Integration test targets mined for `EXAMPLES`.
    pub scenarios: Vec<String>,
    /// Runtime helper copied to `plugins/module_utils/vmware_rest.py`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_utils: Option<PathBuf>,
    /// Which modules are published.
    pub trust: TrustPolicy,
    /// Metadata written into every `DOCUMENTATION` block.
    pub documentation: DocumentationConfig,
    /// Vendor resource type to the module returning its identifiers.
    pub resource_types: BTreeMap<String, String>,
    /// Literal markup replacements applied to descriptions.
    pub markup: BTreeMap<String, String>,
    /// Operations the API declares but the server does not implement.
    pub broken_operations: Vec<BrokenOperation>,
}

/// Allow and deny lists deciding which generated modules are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustPolicy {
    /// Regexes matched against the module name; one hit is enough.
    pub allow: Vec<String>,
    /// Exact module names rejected even when allowed.
    pub deny: Vec<String>,
    /// Module name prefixes rejected even when allowed.
    pub deny_prefixes: Vec<String>,
}

/// Static metadata of the generated documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    /// Module authors.
    pub author: Vec<String>,
    /// Free-form notes.
    pub notes: Vec<String>,
    /// Python requirements.
    pub requirements: Vec<String>,
    /// Collection version the modules appeared in.
    pub version_added: String,
}

/// A path/operationId pair excluded from loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenOperation {
    /// Path prefix, matched against the normalized path.
    pub path: String,
    /// Raw operationId, including any `$task` suffix.
    pub operation: String,
}

impl BrokenOperation {
    fn new(path: &str, operation: &str) -> Self {
        Self {
            path: path.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Returns `true` if the operation of `path` is excluded by this entry.
    #[must_use]
    pub fn matches(&self, path: &str, operation: &str) -> bool {
        path.starts_with(&self.path) && operation == self.operation
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn table(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            allow: strings(&[
                "^vcenter_cluster_info$",
                "^vcenter_datacenter_info$",
                "^vcenter_datacenter$",
                "^vcenter_datastore_info$",
                "^vcenter_folder_info$",
                "^vcenter_host_info$",
                "^vcenter_host$",
                "^vcenter_network_info$",
                "^vcenter_vm($|_.+)",
                "^vcenter_storage_policies_info$",
                "^vcenter_resourcepool*",
                "^content_library_item_info$",
                "^content_locallibrary$",
                "^content_locallibrary_info$",
                "^content_subscribedlibrary$",
                "^content_subscribedlibrary_info$",
            ]),
            deny: strings(&[
                "vcenter_vm_guest_customization",
                "vcenter_vm_guest_power",
                "vcenter_vm_guest_power_info",
                "vcenter_vm_hardware_action_upgrade",
                "vcenter_vm_tools_installer",
                "vcenter_vm_tools_installer_info",
                "vcenter_vm_storage_policy_compliance",
                "appliance_logging_forwarding",
            ]),
            deny_prefixes: strings(&["vcenter_trustedinfrastructure"]),
        }
    }
}

impl TrustPolicy {
    /// Compiles the allow patterns into a [`TrustMatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first invalid pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_core::TrustPolicy;
    ///
    /// let trust = TrustPolicy::default().compile().unwrap();
    /// assert!(trust.is_trusted("vcenter_vm_hardware_cdrom"));
    /// assert!(!trust.is_trusted("vcenter_vm_guest_power"));
    /// assert!(!trust.is_trusted("appliance_networking"));
    /// ```
    pub fn compile(&self) -> Result<TrustMatcher> {
        let allow = self
            .allow
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| Error::ConfigError {
                    message: format!("invalid trust.allow pattern '{pattern}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TrustMatcher {
            allow,
            deny: self.deny.clone(),
            deny_prefixes: self.deny_prefixes.clone(),
        })
    }
}

/// A [`TrustPolicy`] with its allowlist compiled.
#[derive(Debug, Clone)]
pub struct TrustMatcher {
    allow: Vec<Regex>,
    deny: Vec<String>,
    deny_prefixes: Vec<String>,
}

impl TrustMatcher {
    /// Returns `true` if `module_name` passes the allowlist and not the denylist.
    #[must_use]
    pub fn is_trusted(&self, module_name: &str) -> bool {
        if self.deny.iter().any(|d| d == module_name)
            || self.deny_prefixes.iter().any(|p| module_name.starts_with(p))
        {
            return false;
        }
        self.allow.iter().any(|re| re.is_match(module_name))
    }
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            author: strings(&["Goneri Le Bouder (@goneri) <goneri@lebouder.net>"]),
            notes: strings(&["Tested on vSphere 7.0.2"]),
            requirements: strings(&["python >= 3.6", "aiohttp"]),
            version_added: "1.0.0".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_files: strings(&["vcenter.json", "content.json"]),
            skip_resources: strings(&["esx_settings_clusters_software_drafts"]),
            sanity_versions: strings(&["2.9", "2.10"]),
            scenarios: strings(&["prepare_lab", "vcenter_vm_scenario1", "appliance"]),
            module_utils: None,
            trust: TrustPolicy::default(),
            documentation: DocumentationConfig::default(),
            resource_types: default_resource_types(),
            markup: default_markup(),
            broken_operations: vec![
                BrokenOperation::new("/rest/vcenter/vm/{vm}/tools", "upgrade"),
                BrokenOperation::new("/api/appliance/infraprofile/configs", "validate$task"),
            ],
        }
    }
}

fn default_resource_types() -> BTreeMap<String, String> {
    table(&[
        ("ClusterComputeResource", "vcenter_cluster_info"),
        ("Datacenter", "vcenter_datacenter_info"),
        ("Datastore", "vcenter_datastore_info"),
        ("Folder", "vcenter_folder_info"),
        ("HostSystem", "vcenter_host_info"),
        ("Network", "vcenter_network_info"),
        ("ResourcePool", "vcenter_resourcepool_info"),
        ("vcenter.StoragePolicy", "vcenter_storage_policies"),
        ("vcenter.vm.hardware.Cdrom", "vcenter_vm_hardware_cdrom"),
        ("vcenter.vm.hardware.Disk", "vcenter_vm_hardware_disk"),
        ("vcenter.vm.hardware.Ethernet", "vcenter_vm_hardware_ethernet"),
        ("vcenter.vm.hardware.Floppy", "vcenter_vm_hardware_floppy"),
        ("vcenter.vm.hardware.ParallelPort", "vcenter_vm_hardware_parallel"),
        ("vcenter.vm.hardware.SataAdapter", "vcenter_vm_hardware_adapter_sata"),
        ("vcenter.vm.hardware.ScsiAdapter", "vcenter_vm_hardware_adapter_scsi"),
        ("vcenter.vm.hardware.SerialPort", "vcenter_vm_hardware_serial"),
        ("VirtualMachine", "vcenter_vm_info"),
    ])
}

fn default_markup() -> BTreeMap<String, String> {
    table(&[
        ("{@name LibraryType}", "Library Type"),
        ("{@term field}", "field"),
        ("{@name Vcenter}", "vCenter"),
        ("{@link LibraryModel}", "Library"),
        ("{@term unset}", "not set"),
        ("{@link StorageBacking}", "storage backing"),
        ("{@name LibraryModel}", "Library"),
        ("{@name AuthenticationMethod}", "authentication_method"),
        ("{@link PublishInfo}", "C(publish_info)"),
        ("{@link PublishInfo#published}", "C(publish_info.published)"),
        ("{@link SubscriptionInfo}", "C(subscription_info)"),
        (
            "{@link SubscriptionInfo#automaticSyncEnabled}",
            "C(subscription_info.automaticSyncEnabled)",
        ),
        (
            "{@link SubscriptionInfo#subscriptionUrl}",
            "C(subscription_info.subscriptionurl)",
        ),
        ("{@link LibraryModel#name}", "C(Library name)"),
        ("{@link StorageBacking#storageUri}", "C(Storage Backing URI)"),
        (
            "{@link PublishInfo#persistJsonEnabled}",
            "C(publish_info.persistJsonEnabled)",
        ),
        ("{@link PublishInfo#publishUrl}", "C(publish_info.publishUrl)"),
        (
            "{@link ConfigurationModel#automaticSyncEnabled}",
            "C(configuration_model.automaticSyncEnabled)",
        ),
        ("{@link SubscribedLibrary#sync}", "Subscribed Library Sync"),
        ("{@link SubscribedItem#sync}", "Subscribed Item Sync"),
        ("{@link SubscribedItem#evict}", "Subscribed Item evict"),
    ])
}

impl GeneratorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Missing sections fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the TOML is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_core::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_toml("api_files = [\"appliance.json\"]").unwrap();
    /// assert_eq!(config.api_files, vec!["appliance.json".to_string()]);
    /// assert_eq!(config.sanity_versions, vec!["2.9", "2.10"]);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigError {
            message: format!("failed to parse config: {e}"),
        })
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::serialization("failed to serialize config", e))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    /// Loads `explicit` if given, else `restmod.toml` from `dir` if present,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected file cannot be read or parsed.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        debug!("No {CONFIG_FILE_NAME} found, using defaults");
        Ok(Self::default())
    }

    /// Checks the configuration for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.api_files.is_empty() {
            return Err(Error::ConfigError {
                message: "api_files must list at least one API description".to_string(),
            });
        }
        if self.trust.allow.is_empty() {
            return Err(Error::ConfigError {
                message: "trust.allow is empty, no module would be generated".to_string(),
            });
        }
        self.trust.compile()?;
        if let Some(version) = self.sanity_versions.iter().find(|v| v.trim().is_empty()) {
            return Err(Error::ConfigError {
                message: format!("invalid sanity version '{version}'"),
            });
        }
        if let Some(op) = self
            .broken_operations
            .iter()
            .find(|op| !op.path.starts_with('/') || op.operation.is_empty())
        {
            return Err(Error::ConfigError {
                message: format!(
                    "broken operation '{}' on '{}' needs an absolute path and an operationId",
                    op.operation, op.path
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toml_roundtrip_keeps_markup_keys() {
        let config = GeneratorConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(
            parsed.markup.get("{@term unset}").map(String::as_str),
            Some("not set")
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GeneratorConfig::from_toml(
            r#"
            [documentation]
            version_added = "2.0.0"
            "#,
        )
        .unwrap();
        assert_eq!(config.documentation.version_added, "2.0.0");
        assert_eq!(config.documentation.requirements, vec!["python >= 3.6", "aiohttp"]);
        assert_eq!(config.api_files, vec!["vcenter.json", "content.json"]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = GeneratorConfig::from_toml("api_files = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let mut config = GeneratorConfig::default();
        config.trust.allow.push("^vcenter_(".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("trust.allow"));
    }

    #[test]
    fn test_compile_reports_bad_pattern() {
        let policy = TrustPolicy {
            allow: vec!["^vcenter_vm$".to_string(), "^vcenter_(".to_string()],
            ..TrustPolicy::default()
        };
        let err = policy.compile().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("^vcenter_("));
    }

    #[test]
    fn test_compiled_policy_keeps_deny_lists() {
        let policy = TrustPolicy {
            allow: vec!["^vcenter_".to_string()],
            deny: vec!["vcenter_vm".to_string()],
            deny_prefixes: vec!["vcenter_trusted".to_string()],
        };
        let trust = policy.compile().unwrap();
        assert!(trust.is_trusted("vcenter_folder"));
        assert!(!trust.is_trusted("vcenter_vm"));
        assert!(!trust.is_trusted("vcenter_trustedinfrastructure_hosts"));
        assert!(!trust.is_trusted("appliance_health"));
    }

    #[test]
    fn test_validate_rejects_empty_api_files() {
        let config = GeneratorConfig {
            api_files: vec![],
            ..GeneratorConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_trust_policy() {
        let policy = TrustPolicy::default().compile().unwrap();
        assert!(policy.is_trusted("vcenter_vm"));
        assert!(policy.is_trusted("vcenter_vm_info"));
        assert!(policy.is_trusted("vcenter_datacenter"));
        assert!(policy.is_trusted("vcenter_resourcepool_info"));
        assert!(!policy.is_trusted("vcenter_vmtemplate_libraryitems"));
        assert!(!policy.is_trusted("vcenter_datacenter_foo"));
        assert!(!policy.is_trusted("vcenter_vm_tools_installer"));
        assert!(!policy.is_trusted("appliance_logging_forwarding"));
    }

    #[test]
    fn test_broken_operation_matches_prefix() {
        let op = BrokenOperation::new("/rest/vcenter/vm/{vm}/tools", "upgrade");
        assert!(op.matches("/rest/vcenter/vm/{vm}/tools?action=upgrade", "upgrade"));
        assert!(!op.matches("/rest/vcenter/vm/{vm}/tools", "get"));
    }

    #[test]
    fn test_discover_prefers_local_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "scenarios = [\"appliance\"]\n",
        )
        .unwrap();
        let config = GeneratorConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.scenarios, vec!["appliance"]);

        let empty = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::discover(None, empty.path()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/restmod.toml")).unwrap_err();
        assert!(err.is_io_error());
    }
}
