//! Generate command implementation.
//!
//! Loads the configured API descriptions from the schema directory, renders
//! every trusted module and writes the collection tree under the target
//! directory.

use super::common::{current_dir, load_config};
use anyhow::{Context, Result};
use restmod_codegen::generator::{CollectionGenerator, git_revision};
use restmod_codegen::swagger::SwaggerFile;
use restmod_core::GeneratorConfig;
use restmod_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Options of the generate command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Root of the collection to write
    pub target_dir: PathBuf,
    /// Directory holding the API description files
    pub schema_dir: PathBuf,
    /// Generator version stamped in `dev.md`; the git revision of the
    /// working directory when absent
    pub revision: Option<String>,
    /// Render without writing anything
    pub dry_run: bool,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    /// Root of the collection
    pub target_dir: String,
    /// Generator version stamped in the side files
    pub revision: String,
    /// Generated modules, in generation order
    pub modules: Vec<String>,
    /// Number of files rendered, side files included
    pub files: usize,
    /// Whether the files were left unwritten
    pub dry_run: bool,
}

/// Generates the collection described by `config`.
///
/// # Errors
///
/// Returns an error if an API description cannot be loaded, a module fails
/// to render, or the output cannot be written.
pub fn generate_collection(
    config: &GeneratorConfig,
    options: &GenerateOptions,
) -> Result<GenerateReport> {
    let files = config
        .api_files
        .iter()
        .map(|name| {
            let path = options.schema_dir.join(name);
            SwaggerFile::load(&path, &config.broken_operations)
                .with_context(|| format!("failed to load {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let revision = match &options.revision {
        Some(revision) => revision.clone(),
        None => resolve_revision(&current_dir()?),
    };

    let collection = CollectionGenerator::new(config)?
        .generate(&files, &revision)
        .context("module generation failed")?;

    if options.dry_run {
        info!("Dry run: {} files not written", collection.code.file_count());
    } else {
        collection
            .code
            .write_to(&options.target_dir)
            .with_context(|| format!("failed to write {}", options.target_dir.display()))?;
    }

    Ok(GenerateReport {
        target_dir: options.target_dir.display().to_string(),
        revision,
        files: collection.code.file_count(),
        modules: collection.modules,
        dry_run: options.dry_run,
    })
}

fn resolve_revision(dir: &Path) -> String {
    git_revision(dir).unwrap_or_else(|e| {
        warn!("Cannot read the generator revision: {e}");
        "unknown".to_string()
    })
}

/// Runs the generate command.
///
/// Returns [`ExitCode::INVALID_INPUT`] for an invalid configuration and
/// [`ExitCode::GENERATION_ERROR`] when generation fails.
pub fn run(
    config_path: Option<&Path>,
    options: &GenerateOptions,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let config = load_config(config_path, &current_dir()?)?;
    if let Err(e) = config.validate() {
        error!("{e}");
        return Ok(ExitCode::for_error(&e));
    }

    let report = match generate_collection(&config, options) {
        Ok(report) => report,
        Err(e) => {
            error!("{e:#}");
            return Ok(ExitCode::GENERATION_ERROR);
        }
    };

    let formatted = crate::formatters::format_output(&report, output_format)?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
