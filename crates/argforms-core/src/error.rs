//! Core error types for argforms.
//!
//! Two kinds of failure exist. A [`ValidationError`] describes a single
//! field failing a check; these are collected per field while a form is
//! validated and never abort the process on their own. A [`FormError`]
//! describes a misdeclared form (bad field names, unsupported field types,
//! conflicting short flags) or a configuration problem, and is returned as
//! an ordinary `Result`.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single validation failure.
///
/// # Examples
///
/// ```
/// use argforms_core::error::ValidationError;
///
/// let err = ValidationError::new("this field is required", "required");
/// assert_eq!(err.to_string(), "this field is required");
/// assert_eq!(err.code, "required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error message shown to the user.
    pub message: String,
    /// A short code identifying the type of failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The error type for misdeclared forms and configuration problems.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Form declaration ─────────────────────────────────────────────

    /// The field's type cannot be expressed as a command-line argument.
    #[error("unsupported field type: {type_name} (field '{field}')")]
    UnsupportedFieldType {
        /// Name of the offending type.
        type_name: String,
        /// Full name of the field.
        field: String,
    },

    /// Field names of a single character would collide with short flags.
    #[error("field names must be at least two characters (got '{0}')")]
    FieldNameTooShort(String),

    /// A short flag was assigned to a nested form field.
    #[error("cannot assign a short argument to a FormField (field '{0}')")]
    ShortArgumentOnFormField(String),

    /// Two fields in the same form share a name.
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred (e.g. while printing errors).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
