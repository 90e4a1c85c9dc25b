//! Error types for the bookkeeping engine
//!
//! This module defines all error types that can occur at the boundaries of the
//! engine. The aggregation and filter engines never fail; only input
//! validation, persistence and import can.
//!
//! # Error Categories
//!
//! - **Validation Errors**: non-positive amount, empty description
//! - **Lookup Errors**: an edit referenced an id that is not in the store
//! - **Persistence Errors**: the remote store or the local snapshot failed
//! - **Import Errors**: an imported document failed structural validation
//! - **File and CSV Errors**: I/O and CSV parsing failures

use crate::types::TransactionId;
use thiserror::Error;

/// Main error type for the bookkeeping engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookError {
    /// Invalid user input
    ///
    /// Raised before any state changes; the store is left as it was.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// An operation referenced a transaction id that is not in the store
    #[error("Transaction {id} not found for {operation}")]
    NotFound {
        /// The missing id
        id: TransactionId,
        /// Operation that failed
        operation: String,
    },

    /// The remote store or the local snapshot could not be read or written
    ///
    /// Never fatal for a session: in-memory state stays usable.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Description of the failure
        message: String,
    },

    /// An imported document failed structural validation
    ///
    /// The store is left untouched.
    #[error("Import format error: {message}")]
    ImportFormat {
        /// Description of the problem
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing or writing error
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the CSV error
        message: String,
    },
}

impl From<std::io::Error> for BookError {
    fn from(error: std::io::Error) -> Self {
        BookError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BookError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BookError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

// JSON only reaches us through stored snapshots, so a bad document is a
// persistence problem. Import maps its own failures to ImportFormat.
impl From<serde_json::Error> for BookError {
    fn from(error: serde_json::Error) -> Self {
        BookError::Persistence {
            message: error.to_string(),
        }
    }
}

impl BookError {
    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        BookError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: TransactionId, operation: &str) -> Self {
        BookError::NotFound {
            id,
            operation: operation.to_string(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        BookError::Persistence {
            message: message.into(),
        }
    }

    /// Create an ImportFormat error
    pub fn import_format(message: impl Into<String>) -> Self {
        BookError::ImportFormat {
            message: message.into(),
        }
    }

    /// Whether the error came from bad user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            BookError::Validation { .. }
                | BookError::NotFound { .. }
                | BookError::ImportFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        BookError::Validation {
            field: "amount".to_string(),
            message: "must be greater than zero".to_string(),
        },
        "Invalid amount: must be greater than zero"
    )]
    #[case::not_found(
        BookError::NotFound { id: 42, operation: "update".to_string() },
        "Transaction 42 not found for update"
    )]
    #[case::persistence(
        BookError::Persistence { message: "remote unreachable".to_string() },
        "Persistence error: remote unreachable"
    )]
    #[case::import_format(
        BookError::ImportFormat { message: "missing transactions array".to_string() },
        "Import format error: missing transactions array"
    )]
    #[case::io_error(
        BookError::Io { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::csv_with_line(
        BookError::Csv { line: Some(3), message: "bad field".to_string() },
        "CSV error at line 3: bad field"
    )]
    #[case::csv_without_line(
        BookError::Csv { line: None, message: "bad field".to_string() },
        "CSV error: bad field"
    )]
    fn test_error_display(#[case] error: BookError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(
        BookError::validation("description", "must not be empty"),
        BookError::Validation {
            field: "description".to_string(),
            message: "must not be empty".to_string(),
        }
    )]
    #[case::not_found(
        BookError::not_found(7, "update"),
        BookError::NotFound { id: 7, operation: "update".to_string() }
    )]
    #[case::persistence(
        BookError::persistence("disk full"),
        BookError::Persistence { message: "disk full".to_string() }
    )]
    #[case::import_format(
        BookError::import_format("not an object"),
        BookError::ImportFormat { message: "not an object".to_string() }
    )]
    fn test_helper_functions(#[case] result: BookError, #[case] expected: BookError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case(BookError::validation("amount", "x"), true)]
    #[case(BookError::not_found(1, "update"), true)]
    #[case(BookError::import_format("x"), true)]
    #[case(BookError::persistence("x"), false)]
    #[case(BookError::Io { message: "x".to_string() }, false)]
    fn test_is_user_error(#[case] error: BookError, #[case] expected: bool) {
        assert_eq!(error.is_user_error(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BookError = io_error.into();
        assert!(matches!(error, BookError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: BookError = json_error.into();
        assert!(matches!(error, BookError::Persistence { .. }));
    }
}
