//! Documentation and option declarations of the generated modules.

pub mod arguments;
pub mod description;
pub mod options;

pub use arguments::{gen_arguments_py, indent, required_if_py};
pub use description::{Description, ref_to_parameter, write_i};
pub use options::{ModuleDocumentation, OptionDocumentation, format_documentation, gen_documentation};
