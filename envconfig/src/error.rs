//! Error types for environment variable binding

/// Errors that can occur when binding environment variables into a struct.
///
/// Binding stops at the first error; fields after the failing one are left
/// as they were.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value passed to the binder is not a struct.
    ///
    /// Returned before any field is looked at.
    #[error("invalid specification: {type_name} is not a struct")]
    InvalidSpecification {
        /// Type name of the rejected value
        type_name: &'static str,
    },

    /// A field marked `required` has no value and no default.
    #[error("required key {key} missing value")]
    MissingRequiredKey {
        /// Primary key that was looked up (prefix included)
        key: String,
    },

    /// A value was found but could not be converted to the field's type.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Rendering the key listing as JSON failed.
    #[error("failed to render usage as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A value that could not be converted to the type of the field it was meant for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assigning {key} to {field}: converting '{value}' to type {type_name}")]
pub struct ParseError {
    /// Environment variable the value was read from
    pub key: String,
    /// Declared name of the struct field
    pub field: &'static str,
    /// Declared type of the struct field
    pub type_name: &'static str,
    /// Raw string that failed to convert
    pub value: String,
}

impl Error {
    /// Create a missing required key error
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        Self::MissingRequiredKey { key: key.into() }
    }

    /// Returns the offending key for missing and parse errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredKey { key } => Some(key),
            Self::Parse(err) => Some(&err.key),
            Self::InvalidSpecification { .. } | Self::Json(_) => None,
        }
    }
}
