//! Types and helpers shared by the module and collection generators.

pub mod python;
pub mod types;

pub use types::{GeneratedCode, GeneratedFile};
