//! Core types, configuration, and errors for the restmod generator.
//!
//! This crate provides the foundational types shared by the code generator,
//! the example refresher, and the command-line front end.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy with contextual information
//! - CLI value types (`OutputFormat`, `ExitCode`)
//! - `GeneratorConfig`, the TOML-backed description of one collection

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub mod cli;

pub use config::{
    BrokenOperation, CONFIG_FILE_NAME, DocumentationConfig, GeneratorConfig, TrustMatcher,
    TrustPolicy,
};
pub use error::{Error, Result};
