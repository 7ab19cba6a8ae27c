//! Custom error types for the assistant
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for assistant operations
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A storage file exists but its contents cannot be used
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for user-supplied fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with this id (raised by the command layer only)
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: u64,
    },

    /// A record with this id is already stored
    #[error("{collection} already contains a record with id {id}")]
    DuplicateId {
        collection: &'static str,
        id: u64,
    },

    /// Every id up to the largest representable one is in use
    #[error("{collection} has no free ids left")]
    IdsExhausted { collection: &'static str },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Calculator input that does not form a valid expression
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Calculator division by zero
    #[error("Division by zero")]
    DivisionByZero,
}

impl AssistantError {
    /// Create an invalid expression error
    pub fn invalid_expression(reason: impl Into<String>) -> Self {
        Self::InvalidExpression(reason.into())
    }

    /// Create a "not found" error for a record
    pub fn record_not_found(entity_type: &'static str, id: u64) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Check if this is an unrecoverable storage error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this error came from the calculator
    pub fn is_calculation(&self) -> bool {
        matches!(self, Self::InvalidExpression(_) | Self::DivisionByZero)
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for AssistantError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for AssistantError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssistantError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_duplicate_id_error() {
        let err = AssistantError::DuplicateId {
            collection: "notes",
            id: 3,
        };
        assert_eq!(err.to_string(), "notes already contains a record with id 3");
    }

    #[test]
    fn test_calculation_errors() {
        let err = AssistantError::invalid_expression("unexpected '&'");
        assert_eq!(err.to_string(), "Invalid expression: unexpected '&'");
        assert!(err.is_calculation());
        assert!(AssistantError::DivisionByZero.is_calculation());
        assert!(!AssistantError::Persistence("x".into()).is_calculation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AssistantError = io_err.into();
        assert!(matches!(err, AssistantError::Io(_)));
    }
}
