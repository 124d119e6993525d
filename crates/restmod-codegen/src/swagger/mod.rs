//! Swagger 2.0 loading: paths, operations, resources and definitions.

mod definitions;
mod file;
mod path;

pub use definitions::{Definitions, expand_ref};
pub use file::{Resource, SwaggerFile};
pub use path::{Operation, Path, path_to_name};
