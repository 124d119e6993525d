//! Module model: options, states and payload layout of each generated module.
//!
//! Every [`Resource`](crate::swagger::Resource) yields up to two modules: the
//! state-driven module and its `_info` counterpart.

pub mod model;
pub mod naming;
pub mod parameter;

pub use model::{
    AnsibleModule, ModuleKind, ModuleTemplate, PayloadFormat, ansible_state, gen_required_if,
};
pub use naming::describe;
pub use parameter::{Parameter, SubKey, property_to_parameter};
