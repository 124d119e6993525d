//! Integration tests for example refresh over a collection checkout.

use restmod_examples::refresh_examples;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MODULE_TEMPLATE: &str = "#!/usr/bin/python\n\nDOCUMENTATION = r'''\nmodule: NAME\n'''\n\nEXAMPLES = r\"\"\"\n\"\"\"\n\nRETURN = r\"\"\"\n\"\"\"\n";

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn collection() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        &root.join("galaxy.yml"),
        "namespace: vmware\nname: vmware_rest\nversion: 2.0.0\n",
    );

    for name in ["vcenter_datacenter_info", "vcenter_folder_info", "vcenter_vm"] {
        write(
            &root.join(format!("plugins/modules/{name}.py")),
            &MODULE_TEMPLATE.replace("NAME", name),
        );
    }

    let targets = root.join("tests/integration/targets");
    write(
        &targets.join("prepare_lab/tasks/main.yaml"),
        r"
- name: Get a list of the datacenters
  vmware.vmware_rest.vcenter_datacenter_info:
  register: my_datacenters
- include_tasks: folder.yaml
",
    );
    write(
        &targets.join("prepare_lab/tasks/folder.yaml"),
        r"
- name: Build a list of all the folders
  vmware.vmware_rest.vcenter_folder_info:
    filter_datacenters: '{{ my_datacenters.value[0].datacenter }}'
  register: my_folders
",
    );
    write(
        &targets.join("vcenter_vm_scenario1/tasks/main.yaml"),
        r"
- name: Create a VM
  vmware.vmware_rest.vcenter_vm:
    placement:
      folder: '{{ my_folders.value[0].folder }}'
    name: test_vm1
  register: _result
- name: _cleanup
  vmware.vmware_rest.vcenter_vm:
    state: absent
",
    );
    dir
}

fn scenarios() -> Vec<String> {
    vec!["prepare_lab".to_string(), "vcenter_vm_scenario1".to_string()]
}

#[test]
fn test_refresh_examples() {
    let dir = collection();
    let report = refresh_examples(dir.path(), &scenarios()).unwrap();

    assert_eq!(report.collection, "vmware.vmware_rest");
    assert_eq!(report.tasks, 4);
    assert_eq!(
        report.modules,
        vec!["vcenter_datacenter_info", "vcenter_folder_info", "vcenter_vm"]
    );

    let vm = fs::read_to_string(dir.path().join("plugins/modules/vcenter_vm.py")).unwrap();
    let examples_start = vm.find("EXAMPLES = r\"\"\"\n").unwrap();
    let examples = &vm[examples_start..];
    let datacenters = examples.find("- name: Get a list of the datacenters").unwrap();
    let folders = examples.find("- name: Build a list of all the folders").unwrap();
    let create = examples.find("- name: Create a VM").unwrap();
    assert!(datacenters < folders && folders < create);
    assert!(!examples.contains("_result"));
    assert!(!examples.contains("_cleanup"));
    assert!(vm.contains("\nRETURN = r\"\"\"\n\"\"\"\n"));
    assert!(vm.ends_with("\"\"\"\n"));
}

#[test]
fn test_refresh_is_idempotent() {
    let dir = collection();
    refresh_examples(dir.path(), &scenarios()).unwrap();
    let first = fs::read_to_string(dir.path().join("plugins/modules/vcenter_vm.py")).unwrap();
    refresh_examples(dir.path(), &scenarios()).unwrap();
    let second = fs::read_to_string(dir.path().join("plugins/modules/vcenter_vm.py")).unwrap();
    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_symlinked_module_untouched() {
    let dir = collection();
    let modules = dir.path().join("plugins/modules");
    fs::remove_file(modules.join("vcenter_folder_info.py")).unwrap();
    std::os::unix::fs::symlink(
        modules.join("vcenter_datacenter_info.py"),
        modules.join("vcenter_folder_info.py"),
    )
    .unwrap();

    let report = refresh_examples(dir.path(), &scenarios()).unwrap();
    assert!(!report.modules.contains(&"vcenter_folder_info".to_string()));
    assert!(
        fs::symlink_metadata(modules.join("vcenter_folder_info.py"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[test]
fn test_missing_galaxy_file() {
    let dir = TempDir::new().unwrap();
    let err = refresh_examples(dir.path(), &scenarios()).unwrap_err();
    assert!(err.is_io_error());
}

#[test]
fn test_missing_module_file() {
    let dir = collection();
    fs::remove_file(dir.path().join("plugins/modules/vcenter_vm.py")).unwrap();
    let err = refresh_examples(dir.path(), &scenarios()).unwrap_err();
    assert!(err.is_io_error());
}
