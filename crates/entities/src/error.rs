//! Entity validation errors.

use thiserror::Error;

/// Errors raised while constructing or mutating an entity.
///
/// Both variants fail fast: the entity is either not built at all or left
/// exactly as it was before the rejected mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A size-like attribute (page count, duration, edition) was not positive.
    #[error("invalid {field}: {value} (must be greater than 0)")]
    InvalidAttribute { field: &'static str, value: i64 },

    /// An email address did not match the accepted address grammar.
    #[error("invalid email address: '{email}'")]
    InvalidEmail { email: String },
}

impl EntityError {
    /// Creates an invalid attribute error.
    pub fn invalid_attribute(field: &'static str, value: impl Into<i64>) -> Self {
        Self::InvalidAttribute {
            field,
            value: value.into(),
        }
    }

    /// Creates an invalid email error.
    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }
}

/// Result type for entity construction and mutation.
pub type EntityResult<T> = Result<T, EntityError>;
