//! Error types for the restmod generator.
//!
//! Every library crate in the workspace reports failures through [`Error`].
//! The command-line front end wraps it in `anyhow` for context chains.
//!
//! # Examples
//!
//! ```
//! use restmod_core::{Error, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::DefinitionNotFound {
//!             reference: name.to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = lookup("").unwrap_err();
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

/// Main error type for restmod.
#[derive(Error, Debug)]
pub enum Error {
    /// The API description is malformed.
    ///
    /// Raised when a required section (`paths`, `definitions`) is missing or
    /// has an unexpected shape.
    #[error("Invalid API description {file}: {message}")]
    SwaggerError {
        /// File (or logical source) being loaded
        file: String,
        /// Description of the problem
        message: String,
    },

    /// A `$ref` points at a definition that does not exist.
    #[error("Definition not found: {reference}")]
    DefinitionNotFound {
        /// The unresolved reference
        reference: String,
    },

    /// Two paths of the same resource declare the same operationId.
    #[error("Duplicate operation '{operation}' in resource '{resource}'")]
    DuplicateOperation {
        /// Resource name
        resource: String,
        /// The repeated operationId
        operation: String,
    },

    /// API prose references a resource type with no module mapping.
    ///
    /// The generator refuses to guess which module returns identifiers of an
    /// unmapped type; add it to the `resource_types` table of the config.
    #[error("No module known for resource type '{resource_type}'")]
    UnknownResourceType {
        /// The vendor resource type, e.g. `ClusterComputeResource`
        resource_type: String,
    },

    /// Template registration or rendering failed.
    #[error("Template error in '{template}': {message}")]
    TemplateError {
        /// Template name
        template: String,
        /// Description of the failure
        message: String,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Filesystem access failed.
    #[error("I/O error on {path}: {source}")]
    IoError {
        /// Path being read or written
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON, YAML or TOML conversion fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Example extraction from test fixtures failed.
    #[error("Example extraction failed for '{scenario}': {message}")]
    ExampleError {
        /// Scenario or task file being processed
        scenario: String,
        /// Description of the failure
        message: String,
    },
}

impl Error {
    /// Wraps an I/O error with the path it happened on.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_core::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    /// let err = Error::io("vcenter.json", io);
    /// assert!(err.is_io_error());
    /// ```
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Wraps a serde error with a short description.
    pub fn serialization(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this is a malformed API description error.
    #[must_use]
    pub const fn is_swagger_error(&self) -> bool {
        matches!(self, Self::SwaggerError { .. })
    }

    /// Returns `true` if a `$ref` could not be resolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_core::Error;
    ///
    /// let err = Error::DefinitionNotFound {
    ///     reference: "#/definitions/missing".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DefinitionNotFound { .. })
    }

    /// Returns `true` if this is a duplicate operationId error.
    #[must_use]
    pub const fn is_duplicate_operation(&self) -> bool {
        matches!(self, Self::DuplicateOperation { .. })
    }

    /// Returns `true` if this is an unmapped resource type error.
    #[must_use]
    pub const fn is_unknown_resource_type(&self) -> bool {
        matches!(self, Self::UnknownResourceType { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use restmod_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "empty allowlist".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    /// Returns `true` if this is a serialization error.
    #[must_use]
    pub const fn is_serialization_error(&self) -> bool {
        matches!(self, Self::SerializationError { .. })
    }

    /// Returns `true` if this is an example extraction error.
    #[must_use]
    pub const fn is_example_error(&self) -> bool {
        matches!(self, Self::ExampleError { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON conversion failed", err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization("YAML conversion failed", err)
    }
}

/// Result type alias for restmod operations.
///
/// # Examples
///
/// ```
/// use restmod_core::{Error, Result};
///
/// fn non_empty(value: &str) -> Result<&str> {
///     if value.is_empty() {
///         return Err(Error::InvalidArgument("empty value".to_string()));
///     }
///     Ok(value)
/// }
///
/// assert!(non_empty("vm").is_ok());
/// assert!(non_empty("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
