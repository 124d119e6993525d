//! Command implementations for the restmod CLI.
//!
//! Each command loads the configuration, performs its work through the
//! library crates and prints a report in the requested output format.

pub mod common;
pub mod completions;
pub mod config;
pub mod examples;
pub mod generate;
