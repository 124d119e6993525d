//! Config command implementation.
//!
//! The generator reads `restmod.toml` from the working directory, or the
//! file passed with `--config`, falling back on the per-user file and then
//! on the built-in vSphere defaults.

use super::common::{current_dir, load_config};
use crate::actions::ConfigAction;
use anyhow::{Context, Result, bail};
use restmod_core::cli::{ExitCode, OutputFormat};
use restmod_core::{CONFIG_FILE_NAME, GeneratorConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of `config init`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Written file
    pub path: String,
    /// Status message
    pub message: String,
}

/// Result of `config validate`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the configuration is usable
    pub valid: bool,
    /// Problem found, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of API descriptions to load
    pub api_files: usize,
    /// Number of example scenarios
    pub scenarios: usize,
}

/// Writes the default configuration to `path`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init_config(path: &Path, force: bool) -> Result<InitResult> {
    if path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let content = GeneratorConfig::default().to_toml()?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Wrote default configuration to {}", path.display());

    Ok(InitResult {
        path: path.display().to_string(),
        message: "default configuration written".to_string(),
    })
}

/// Checks `config` and summarizes it.
#[must_use]
pub fn validate_config(config: &GeneratorConfig) -> ValidationResult {
    let error = config.validate().err().map(|e| e.to_string());
    ValidationResult {
        valid: error.is_none(),
        error,
        api_files: config.api_files.len(),
        scenarios: config.scenarios.len(),
    }
}

/// Runs the config command.
pub fn run(
    action: ConfigAction,
    config_path: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!("Config action: {action:?}");

    match action {
        ConfigAction::Init { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            let result = init_config(&path, force)?;
            println!("{}", crate::formatters::format_output(&result, output_format)?);
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Show => {
            let config = load_config(config_path, &current_dir()?)?;
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Validate => {
            let config = load_config(config_path, &current_dir()?)?;
            let result = validate_config(&config);
            println!("{}", crate::formatters::format_output(&result, output_format)?);
            if result.valid {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::INVALID_INPUT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let result = init_config(&path, false).unwrap();
        assert!(result.path.ends_with(CONFIG_FILE_NAME));

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded, GeneratorConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "scenarios = []\n").unwrap();

        let err = init_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        init_config(&path, true).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn test_validate_reports_problem() {
        let config = GeneratorConfig {
            api_files: Vec::new(),
            ..GeneratorConfig::default()
        };
        let result = validate_config(&config);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("api_files"));

        let result = validate_config(&GeneratorConfig::default());
        assert!(result.valid);
        assert_eq!(result.api_files, 2);
        assert_eq!(result.scenarios, 3);
    }
}
