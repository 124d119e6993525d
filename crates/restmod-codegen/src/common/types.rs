//! Output types of the generator.
//!
//! # Examples
//!
//! ```
//! use restmod_codegen::{GeneratedCode, GeneratedFile};
//!
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile {
//!     path: "plugins/modules/vcenter_vm_info.py".to_string(),
//!     content: "#!/usr/bin/python\n".to_string(),
//! });
//!
//! assert_eq!(code.file_count(), 1);
//! ```

use restmod_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result of code generation containing all generated files.
///
/// Paths are relative to the root of the target collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// List of generated files with paths and contents
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates a new empty generated code container.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a generated file to the collection.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of generated files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns an iterator over the generated files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Looks a file up by its relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_codegen::{GeneratedCode, GeneratedFile};
    ///
    /// let mut code = GeneratedCode::new();
    /// code.add_file(GeneratedFile {
    ///     path: "dev.md".to_string(),
    ///     content: String::new(),
    /// });
    /// assert!(code.get("dev.md").is_some());
    /// assert!(code.get("README.md").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Writes every file below `target_dir`, creating parent directories.
    ///
    /// Existing files are overwritten. Returns the written paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if a directory or file cannot be written.
    pub fn write_to(&self, target_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let destination = target_dir.join(&file.path);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::io(parent.display().to_string(), e))?;
            }
            std::fs::write(&destination, &file.content)
                .map_err(|e| Error::io(destination.display().to_string(), e))?;
            tracing::debug!("Wrote {}", destination.display());
            written.push(destination);
        }
        Ok(written)
    }
}

/// A single generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Relative path where the file should be written
    pub path: String,
    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Returns the file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
