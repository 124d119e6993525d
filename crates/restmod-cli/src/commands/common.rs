//! Configuration lookup shared by the commands.

use anyhow::{Context, Result};
use restmod_core::{CONFIG_FILE_NAME, GeneratorConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-user configuration file: `<config dir>/restmod/restmod.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("restmod").join(CONFIG_FILE_NAME))
}

/// Loads the effective configuration.
///
/// Lookup order: `explicit`, `restmod.toml` in `dir`, the per-user file,
/// then the built-in defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<GeneratorConfig> {
    if explicit.is_none()
        && !dir.join(CONFIG_FILE_NAME).is_file()
        && let Some(user) = user_config_path().filter(|p| p.is_file())
    {
        debug!("Using user configuration {}", user.display());
        return GeneratorConfig::load(&user)
            .with_context(|| format!("failed to load {}", user.display()));
    }
    GeneratorConfig::discover(explicit, dir).context("failed to load configuration")
}

/// Current working directory.
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to determine the working directory")
}
