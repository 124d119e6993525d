//! Loading Ansible task files.

use restmod_core::{Error, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

/// One Ansible task, keys kept in file order.
pub type Task = Mapping;

/// Default entry point of a task directory.
pub const MAIN_PLAY: &str = "main.yaml";

#[derive(Debug, Deserialize)]
struct Galaxy {
    namespace: String,
    name: String,
}

/// Reads `namespace.name` from a `galaxy.yml` file.
///
/// # Errors
///
/// Returns error if the file cannot be read or lacks `namespace` or `name`.
pub fn collection_name(galaxy_file: &Path) -> Result<String> {
    let content = std::fs::read_to_string(galaxy_file)
        .map_err(|e| Error::io(galaxy_file.display().to_string(), e))?;
    let galaxy: Galaxy = serde_yaml::from_str(&content).map_err(|e| {
        Error::serialization(format!("invalid {}", galaxy_file.display()), e)
    })?;
    Ok(format!("{}.{}", galaxy.namespace, galaxy.name))
}

/// Loads the tasks of `play` in `task_dir`, inlining the files pulled in
/// through `include_tasks` and `import_tasks`.
///
/// # Errors
///
/// Returns error if a file cannot be read, is not a YAML list of mappings,
/// or includes a file that does not exist.
pub fn get_tasks(task_dir: &Path, play: &str) -> Result<Vec<Task>> {
    let current_file = task_dir.join(play);
    let scenario = current_file.display().to_string();
    debug!("Loading tasks from {scenario}");

    let content =
        std::fs::read_to_string(&current_file).map_err(|e| Error::io(scenario.clone(), e))?;
    let document: Value = serde_yaml::from_str(&content)
        .map_err(|e| Error::serialization(format!("invalid {scenario}"), e))?;

    let entries = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(entries) => entries,
        _ => {
            return Err(Error::ExampleError {
                scenario,
                message: "expected a list of tasks".to_string(),
            });
        }
    };

    let mut tasks = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Mapping(task) = entry else {
            return Err(Error::ExampleError {
                scenario,
                message: "task is not a mapping".to_string(),
            });
        };
        if let Some(included) = included_play(&task) {
            tasks.extend(get_tasks(task_dir, included)?);
        } else {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

fn included_play(task: &Task) -> Option<&str> {
    task.get("include_tasks")
        .or_else(|| task.get("import_tasks"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collection_name() {
        let dir = TempDir::new().unwrap();
        let galaxy = dir.path().join("galaxy.yml");
        fs::write(&galaxy, "namespace: vmware\nname: vmware_rest\nversion: 1.0.0\n").unwrap();
        assert_eq!(collection_name(&galaxy).unwrap(), "vmware.vmware_rest");
    }

    #[test]
    fn test_collection_name_missing_field() {
        let dir = TempDir::new().unwrap();
        let galaxy = dir.path().join("galaxy.yml");
        fs::write(&galaxy, "namespace: vmware\n").unwrap();
        assert!(collection_name(&galaxy).unwrap_err().is_serialization_error());
    }

    #[test]
    fn test_get_tasks_follows_includes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MAIN_PLAY),
            "- name: first\n  debug: msg=a\n- include_tasks: other.yaml\n- import_tasks: empty.yaml\n- name: last\n  debug: msg=c\n",
        )
        .unwrap();
        fs::write(dir.path().join("other.yaml"), "- name: middle\n  debug: msg=b\n").unwrap();
        fs::write(dir.path().join("empty.yaml"), "").unwrap();

        let tasks = get_tasks(dir.path(), MAIN_PLAY).unwrap();
        let names: Vec<&str> = tasks
            .iter()
            .filter_map(|t| t.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["first", "middle", "last"]);
    }

    #[test]
    fn test_get_tasks_rejects_non_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MAIN_PLAY), "name: not a list\n").unwrap();
        assert!(get_tasks(dir.path(), MAIN_PLAY).unwrap_err().is_example_error());
    }

    #[test]
    fn test_get_tasks_missing_include() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MAIN_PLAY), "- include_tasks: nowhere.yaml\n").unwrap();
        assert!(get_tasks(dir.path(), MAIN_PLAY).unwrap_err().is_io_error());
    }
}
