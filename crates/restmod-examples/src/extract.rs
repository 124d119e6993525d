//! Grouping tasks per module, together with the tasks they depend on.

use crate::dependencies::list_dependencies;
use crate::tasks::Task;
use indexmap::IndexMap;
use restmod_core::Result;
use serde_yaml::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Example blocks collected for one module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleExamples {
    /// Tasks in play order, producers of their inputs first
    pub blocks: Vec<Task>,
}

/// Groups `tasks` by the module of `collection_name` they call.
///
/// Each calling task is preceded by the `register` and `set_fact` tasks
/// that produced the variables it reads, transitively. Unnamed tasks and
/// tasks whose name starts with `_` are ignored; a `register` starting with
/// `_` is dropped from the task so the example does not expose it.
///
/// Modules appear in the order of their first call.
#[must_use]
pub fn extract(tasks: Vec<Task>, collection_name: &str) -> IndexMap<String, ModuleExamples> {
    let mut by_modules: IndexMap<String, ModuleExamples> = IndexMap::new();
    let mut registers: HashMap<String, Vec<Task>> = HashMap::new();

    for mut task in tasks {
        let Some(name) = task.get("name").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        if name.starts_with('_') {
            debug!("Skip task {name} because of the _ prefix");
            continue;
        }

        let mut depends_on = Vec::new();
        for variable in list_dependencies(&Value::Mapping(task.clone())) {
            match registers.get(&variable) {
                Some(producers) => depends_on.extend(producers.iter().cloned()),
                None => warn!("task '{name}': cannot find variable '{variable}'"),
            }
        }

        if let Some(register) = task.get("register").and_then(Value::as_str).map(str::to_string) {
            if register.starts_with('_') {
                debug!("Hiding register {register} because of the _ prefix");
                task.remove("register");
            } else {
                registers.insert(register, with_task(&depends_on, &task));
            }
        }

        if let Some(Value::Mapping(facts)) = task.get("set_fact") {
            let producers = with_task(&depends_on, &task);
            for fact in facts.keys().filter_map(Value::as_str) {
                registers.insert(fact.to_string(), producers.clone());
            }
        }

        let module_fqcn = task
            .keys()
            .filter_map(Value::as_str)
            .find(|key| key.starts_with(collection_name))
            .map(str::to_string);
        let Some(module_fqcn) = module_fqcn else {
            continue;
        };

        let examples = by_modules.entry(module_fqcn).or_default();
        examples.blocks.extend(depends_on);
        examples.blocks.push(task);
    }

    by_modules
}

fn with_task(depends_on: &[Task], task: &Task) -> Vec<Task> {
    let mut chain = depends_on.to_vec();
    chain.push(task.clone());
    chain
}

/// Renders the example blocks of a module as YAML, each distinct task once.
///
/// # Errors
///
/// Returns error if a task cannot be serialized.
pub fn flatten_module_examples(examples: &ModuleExamples) -> Result<String> {
    let mut result = String::new();
    let mut seen: Vec<&Task> = Vec::new();

    for block in &examples.blocks {
        if seen.contains(&block) {
            continue;
        }
        seen.push(block);
        result.push('\n');
        result.push_str(&task_to_string(block)?);
        result.push('\n');
    }
    Ok(result)
}

fn task_to_string(task: &Task) -> Result<String> {
    let rendered = serde_yaml::to_string(&[task])?;
    Ok(rendered.trim_end().to_string())
}
