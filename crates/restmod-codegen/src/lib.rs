//! Ansible module generation from Swagger API descriptions.
//!
//! The pipeline reads an API description ([`swagger`]), groups its paths
//! into resources, derives one state-driven module and one `_info` module
//! per resource ([`module`]), documents their options ([`documentation`])
//! and renders them through Handlebars templates ([`generator`]).
//!
//! # Examples
//!
//! ```
//! use restmod_codegen::generator::CollectionGenerator;
//! use restmod_codegen::swagger::SwaggerFile;
//! use restmod_core::GeneratorConfig;
//!
//! let config = GeneratorConfig::default();
//! let swagger = SwaggerFile::parse(
//!     "vcenter.json",
//!     r#"{"paths": {"/rest/vcenter/datacenter": {"get": {"operationId": "list"}}}}"#,
//!     &config.broken_operations,
//! )
//! .unwrap();
//! let collection = CollectionGenerator::new(&config)
//!     .unwrap()
//!     .generate(&[swagger], "0000000")
//!     .unwrap();
//! assert!(collection.code.get("plugins/modules/vcenter_datacenter_info.py").is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod common;
pub mod documentation;
pub mod generator;
pub mod module;
pub mod swagger;
pub mod template_engine;

pub use common::types::{GeneratedCode, GeneratedFile};
pub use generator::{CollectionGenerator, ModuleGenerator};
pub use swagger::SwaggerFile;
