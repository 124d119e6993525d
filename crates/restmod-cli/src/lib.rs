//! restmod CLI library.
//!
//! Exposes the command implementations and output formatters behind the
//! `restmod` binary so they can be tested without spawning a process.

#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

pub mod actions;
pub mod commands;
pub mod formatters;

pub use actions::ConfigAction;
