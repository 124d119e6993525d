//! Rendering modules and whole collections.
//!
//! [`ModuleGenerator`] turns one [`AnsibleModule`](crate::module::AnsibleModule)
//! into a Python file; [`CollectionGenerator`] walks every resource of a set
//! of API descriptions and adds the files shipped alongside the modules.

pub mod collection;
pub mod module;
pub mod types;

pub use collection::{CollectionGenerator, GeneratedCollection, git_revision, sanity_ignore};
pub use module::ModuleGenerator;
pub use types::{ModuleContext, OperationContext};
