//! Query execution error types
//!
//! Every error raised while resolving a field is a [`QueryError`]. The executor
//! attaches it to the field's position in the result tree; it never aborts
//! sibling fields.
//!
//! # Examples
//!
//! ```rust
//! use photoshare::errors::QueryError;
//!
//! let err = QueryError::UnknownField {
//!     type_name: "Photo".to_string(),
//!     field: "shutterSpeed".to_string(),
//! };
//! assert_eq!(err.error_code(), "UNKNOWN_FIELD");
//! assert!(err.is_client_error());
//! ```

use thiserror::Error;

/// Errors raised while executing a query or mutation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A foreign key has no matching record
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Entity type the key points into
        entity: &'static str,
        /// The dangling key
        key: String,
    },

    /// A scalar value could not be parsed or serialized
    #[error("Invalid {scalar} value '{value}': {reason}")]
    InvalidScalarInput {
        /// Scalar type name
        scalar: &'static str,
        /// Offending input, rendered as text
        value: String,
        /// Parser message
        reason: String,
    },

    /// Mutation input failed a required-field or enum-membership check
    #[error("Validation failed for '{field}': {reason}")]
    ValidationError {
        /// Input field that failed validation
        field: String,
        /// Why it failed
        reason: String,
    },

    /// Selection references a field the schema does not define
    #[error("Cannot query field \"{field}\" on type \"{type_name}\"")]
    UnknownField {
        /// Object type the field was requested on
        type_name: String,
        /// Requested field name
        field: String,
    },

    /// A non-nullable field resolved to null
    #[error("Cannot return null for non-nullable field {type_name}.{field}")]
    NonNullViolation {
        /// Parent object type
        type_name: String,
        /// Field name
        field: String,
    },

    /// No operation in the document matches the request
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Query document could not be parsed
    #[error("Failed to parse query document: {0}")]
    Parse(String),
}

impl QueryError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        QueryError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by the request rather than by stored data
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidScalarInput { .. }
                | QueryError::ValidationError { .. }
                | QueryError::UnknownField { .. }
                | QueryError::UnknownOperation(_)
                | QueryError::Parse(_)
        )
    }

    /// Get error code for GraphQL responses
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::NotFound { .. } => "NOT_FOUND",
            QueryError::InvalidScalarInput { .. } => "INVALID_SCALAR_INPUT",
            QueryError::ValidationError { .. } => "VALIDATION_ERROR",
            QueryError::UnknownField { .. } => "UNKNOWN_FIELD",
            QueryError::NonNullViolation { .. } => "NON_NULL_VIOLATION",
            QueryError::UnknownOperation(_) => "UNKNOWN_OPERATION",
            QueryError::Parse(_) => "PARSE_ERROR",
        }
    }
}
