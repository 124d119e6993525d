//! Rewriting the `EXAMPLES` block of generated modules.

use crate::extract::{ModuleExamples, flatten_module_examples};
use indexmap::IndexMap;
use restmod_core::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const EXAMPLES_START: &str = "EXAMPLES = r\"\"\"";
const EXAMPLES_END: &str = "\"\"\"";

/// Replaces the body of the `EXAMPLES` block of each module in
/// `<target_dir>/plugins/modules`.
///
/// Symlinked modules are aliases of another module and are left alone.
/// Files are replaced atomically.
///
/// Returns the paths of the updated modules.
///
/// # Errors
///
/// Returns error if a module file cannot be read or written, or if its
/// examples cannot be serialized.
pub fn inject(
    target_dir: &Path,
    examples: &IndexMap<String, ModuleExamples>,
) -> Result<Vec<PathBuf>> {
    let module_dir = target_dir.join("plugins").join("modules");
    let mut updated = Vec::new();

    for (module_fqcn, module_examples) in examples {
        let module_name = module_fqcn.rsplit('.').next().unwrap_or(module_fqcn);
        let module_path = module_dir.join(format!("{module_name}.py"));
        if fs::symlink_metadata(&module_path).is_ok_and(|m| m.file_type().is_symlink()) {
            debug!("Skipping symlinked module {}", module_path.display());
            continue;
        }

        let section = flatten_module_examples(module_examples)?;
        let content = fs::read_to_string(&module_path)
            .map_err(|e| Error::io(module_path.display().to_string(), e))?;
        write_atomic(&module_path, &replace_examples_block(&content, &section))?;

        info!("Updating {module_name}");
        updated.push(module_path);
    }
    Ok(updated)
}

/// Returns `content` with the lines between `EXAMPLES = r"""` and the
/// closing `"""` replaced by `section`.
///
/// # Examples
///
/// ```
/// use restmod_examples::replace_examples_block;
///
/// let module = "A = 1\nEXAMPLES = r\"\"\"\nold\n\"\"\"\nB = 2\n";
/// let updated = replace_examples_block(module, "\n- name: new\n");
/// assert_eq!(updated, "A = 1\nEXAMPLES = r\"\"\"\n- name: new\n\"\"\"\nB = 2\n");
/// ```
#[must_use]
pub fn replace_examples_block(content: &str, section: &str) -> String {
    let mut result = String::with_capacity(content.len() + section.len());
    let mut in_examples = false;

    for line in content.split('\n') {
        if line == EXAMPLES_START {
            in_examples = true;
            result.push_str(line);
            result.push('\n');
            result.push_str(section.trim_start_matches('\n'));
        } else if in_examples && line == EXAMPLES_END {
            in_examples = false;
            result.push_str(line);
            result.push('\n');
        } else if !in_examples {
            result.push_str(line);
            result.push('\n');
        }
    }

    let trimmed = result.trim_end_matches('\n').len();
    result.truncate(trimmed);
    result.push('\n');
    result
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let display = path.display().to_string();

    let mut temp_file =
        NamedTempFile::new_in(parent).map_err(|e| Error::io(display.clone(), e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::io(display.clone(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| Error::io(display, e.error))?;
    Ok(())
}
