//! Examples command implementation.
//!
//! Refreshes the `EXAMPLES` block of the generated modules from the
//! integration test scenarios of the collection.

use super::common::{current_dir, load_config};
use anyhow::{Context, Result};
use restmod_core::cli::{ExitCode, OutputFormat};
use restmod_examples::{RefreshReport, refresh_examples};
use std::path::Path;
use tracing::{error, info};

/// Refreshes the examples of the collection at `target_dir`.
///
/// `scenarios` overrides the configured list when not empty.
pub fn refresh(
    config_path: Option<&Path>,
    target_dir: &Path,
    scenarios: &[String],
) -> Result<RefreshReport> {
    let config = load_config(config_path, &current_dir()?)?;
    let scenarios = if scenarios.is_empty() {
        config.scenarios.as_slice()
    } else {
        scenarios
    };
    info!("Scenarios: {}", scenarios.join(", "));

    refresh_examples(target_dir, scenarios)
        .with_context(|| format!("failed to refresh examples in {}", target_dir.display()))
}

/// Runs the examples command.
///
/// A failure maps to the [`ExitCode`] of the underlying library error.
pub fn run(
    config_path: Option<&Path>,
    target_dir: &Path,
    scenarios: &[String],
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let report = match refresh(config_path, target_dir, scenarios) {
        Ok(report) => report,
        Err(e) => {
            error!("{e:#}");
            return Ok(e
                .downcast_ref::<restmod_core::Error>()
                .map_or(ExitCode::ERROR, ExitCode::for_error));
        }
    };

    let formatted = crate::formatters::format_output(&report, output_format)?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
