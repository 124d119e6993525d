//! Example mining for generated Ansible modules.
//!
//! The integration tests of a collection exercise its modules in realistic
//! plays. This crate loads those plays, keeps the tasks calling a module of
//! the collection along with the tasks producing their inputs, and writes
//! them into the `EXAMPLES` section of each module.
//!
//! # Examples
//!
//! ```no_run
//! use restmod_examples::refresh_examples;
//! use std::path::Path;
//!
//! let scenarios = vec!["prepare_lab".to_string(), "appliance".to_string()];
//! let report = refresh_examples(Path::new("vmware_rest"), &scenarios)?;
//! println!("{} modules updated", report.modules.len());
//! # Ok::<(), restmod_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod dependencies;
pub mod extract;
pub mod inject;
pub mod tasks;

pub use dependencies::{list_dependencies, naive_variable_from_jinja2};
pub use extract::{ModuleExamples, extract, flatten_module_examples};
pub use inject::{inject, replace_examples_block};
pub use tasks::{MAIN_PLAY, Task, collection_name, get_tasks};

use restmod_core::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of an example refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    /// `namespace.name` of the collection
    pub collection: String,
    /// Number of tasks loaded from the scenarios
    pub tasks: usize,
    /// Names of the modules whose examples were rewritten
    pub modules: Vec<String>,
}

/// Refreshes the `EXAMPLES` of every module of the collection at
/// `target_dir` from the `tasks/main.yaml` play of each scenario under
/// `tests/integration/targets`.
///
/// # Errors
///
/// Returns error if `galaxy.yml`, a scenario or a module file cannot be
/// read, or if a module file cannot be rewritten.
pub fn refresh_examples(target_dir: &Path, scenarios: &[String]) -> Result<RefreshReport> {
    let collection = collection_name(&target_dir.join("galaxy.yml"))?;
    info!("Refreshing examples of {collection}");

    let targets = target_dir.join("tests").join("integration").join("targets");
    let mut tasks = Vec::new();
    for scenario in scenarios {
        tasks.extend(get_tasks(&targets.join(scenario).join("tasks"), MAIN_PLAY)?);
    }
    let task_count = tasks.len();

    let examples = extract(tasks, &collection);
    let updated = inject(target_dir, &examples)?;
    let modules = updated
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect();

    Ok(RefreshReport {
        collection,
        tasks: task_count,
        modules,
    })
}
