//! Values shared by the `restmod` subcommands: how reports are printed and
//! which status the process exits with.
//!
//! # Examples
//!
//! ```
//! use restmod_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "text".parse().unwrap();
//! assert_eq!(format.to_string(), "text");
//! assert_eq!(ExitCode::GENERATION_ERROR.as_i32(), 3);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Rendering of the report printed after a run.
///
/// Only the summary on stdout is affected; modules, ignore files and
/// `EXAMPLES` blocks are written the same way whatever the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented JSON, for release scripts
    Json,
    /// `path: value` lines
    Text,
    /// Colored outline for a terminal
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Name accepted by `--format`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Json, Self::Text, Self::Pretty]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid output format: '{s}' (expected: json, text, or pretty)"
                ))
            })
    }
}

/// Process status of a `restmod` run.
///
/// Release pipelines tell a bad `restmod.toml` (2) apart from an API
/// description the generator cannot handle (3).
///
/// ```
/// use restmod_core::Error;
/// use restmod_core::cli::ExitCode;
///
/// let err = Error::ConfigError { message: "api_files is empty".to_string() };
/// assert_eq!(ExitCode::for_error(&err), ExitCode::INVALID_INPUT);
/// assert!(!ExitCode::for_error(&err).is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Everything was generated or refreshed.
    pub const SUCCESS: Self = Self(0);

    /// Filesystem or example extraction failure.
    pub const ERROR: Self = Self(1);

    /// Rejected configuration or command line value.
    pub const INVALID_INPUT: Self = Self(2);

    /// An API description could not be turned into modules.
    pub const GENERATION_ERROR: Self = Self(3);

    /// Status matching the kind of `error`.
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        match error {
            Error::ConfigError { .. } | Error::InvalidArgument(_) => Self::INVALID_INPUT,
            Error::SwaggerError { .. }
            | Error::DefinitionNotFound { .. }
            | Error::DuplicateOperation { .. }
            | Error::UnknownResourceType { .. }
            | Error::TemplateError { .. } => Self::GENERATION_ERROR,
            Error::IoError { .. } | Error::SerializationError { .. } | Error::ExampleError { .. } => {
                Self::ERROR
            }
        }
    }

    /// Raw status passed to `std::process::exit`.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// `true` for [`ExitCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
