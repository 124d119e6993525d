//! Short descriptions derived from module names.

use regex::Regex;
use std::sync::LazyLock;

type Render = fn(&str) -> String;

static RULES: LazyLock<Vec<(Regex, Render)>> = LazyLock::new(|| {
    let rules: [(&str, Render); 10] = [
        (r"^vcenter_vm_hardware_adapter_(.*)_info", |m| {
            format!("Collect the {} adapter information from a VM", m.to_uppercase())
        }),
        (r"^vcenter_vm_hardware_adapter_(.*)", |m| {
            format!("Manage the {} adapter of a VM", m.to_uppercase())
        }),
        (r"^vcenter_vm_hardware_(.*)_info", |m| {
            format!("Collect the {} information from a VM", spaced(m))
        }),
        (r"^vcenter_vm_hardware_(.*)", |m| {
            format!("Manage the {} of a VM", spaced(m))
        }),
        (r"^vcenter_vm_(guest_.*)_info", |m| {
            format!("Collect the {} information", spaced(m))
        }),
        (r"^vcenter_vm_(guest_.*)", |m| format!("Manage the {}", spaced(m))),
        (r"^vcenter_vm_(.*)info", |m| {
            format!("Collect the {} information from a VM", spaced(m))
        }),
        (r"^vcenter_vm_(.*)", |m| format!("Manage the {} of a VM", spaced(m))),
        (r"^vcenter_(.*)_info", |m| {
            format!(
                "Collect the information associated with the vCenter {}s",
                spaced(m)
            )
        }),
        (r"^vcenter_(.*)", |m| {
            format!("Manage the {} of a vCenter", spaced(m))
        }),
    ];
    rules
        .into_iter()
        .map(|(pattern, render)| (Regex::new(pattern).expect("valid regex"), render))
        .collect()
});

fn spaced(value: &str) -> String {
    value.replace('_', " ")
}

/// Returns the one-line description of a module.
///
/// # Examples
///
/// ```
/// use restmod_codegen::module::describe;
///
/// assert_eq!(describe("vcenter_vm_hardware_adapter_sata"), "Manage the SATA adapter of a VM");
/// assert_eq!(describe("content_locallibrary"), "Handle resource of type content_locallibrary");
/// ```
#[must_use]
pub fn describe(module_name: &str) -> String {
    for (regex, render) in RULES.iter() {
        if let Some(captures) = regex.captures(module_name) {
            let matched = captures.get(1).map_or("", |m| m.as_str());
            return render(matched);
        }
    }
    tracing::debug!("generic description: {module_name}");
    format!("Handle resource of type {module_name}")
}
