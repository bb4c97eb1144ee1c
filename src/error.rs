//! Custom error types for the accounting service
//!
//! This module defines the error hierarchy using thiserror. Every error kind
//! maps to a distinct outward status so the CLI (or any other front end) can
//! report failures without inspecting messages.

use serde::Serialize;
use thiserror::Error;

/// The main error type for accounting operations
#[derive(Error, Debug)]
pub enum AccountingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input failed structural or semantic constraints
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Entity not found, or not in the state the operation requires
    #[error("{entity_type} {identifier} not found.")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The security check of the account holder failed
    #[error("Security check failed for account holder '{account_holder_name}'")]
    InsecureHolder { account_holder_name: String },

    /// The target account cannot accept transactions
    #[error("Unprocessable transaction: {0}")]
    UnprocessableTransaction(String),

    /// The transaction has already taken place
    #[error("{0}")]
    AlreadyCompleted(String),

    /// Balance does not fit into 64 bits
    #[error("Balance overflow for account {0}")]
    BalanceOverflow(String),

    /// Talking to the security validator failed
    #[error("Security check error: {0}")]
    SecurityCheck(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Application error codes reported next to the status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    Internal,
    EntityNotFound,
    InsecureAccount,
    UnprocessableTransaction,
    CompletedTransaction,
    ConstraintViolation,
}

impl AppError {
    pub fn value(&self) -> u8 {
        match self {
            Self::Internal => 0,
            Self::EntityNotFound => 1,
            Self::InsecureAccount => 2,
            Self::UnprocessableTransaction => 3,
            Self::CompletedTransaction => 4,
            Self::ConstraintViolation => 5,
        }
    }
}

/// Serializable error body: an application code plus human-readable messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetails {
    pub code: u8,
    pub status: u16,
    pub messages: Vec<String>,
}

impl AccountingError {
    /// Create a validation error from a single field message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The application error code of this error
    pub fn app_error(&self) -> AppError {
        match self {
            Self::NotFound { .. } => AppError::EntityNotFound,
            Self::InsecureHolder { .. } => AppError::InsecureAccount,
            Self::UnprocessableTransaction(_) => AppError::UnprocessableTransaction,
            Self::AlreadyCompleted(_) => AppError::CompletedTransaction,
            Self::Validation(_) => AppError::ConstraintViolation,
            _ => AppError::Internal,
        }
    }

    /// HTTP-style status of this error
    pub fn status(&self) -> u16 {
        match self.app_error() {
            AppError::EntityNotFound => 404,
            AppError::InsecureAccount => 403,
            AppError::UnprocessableTransaction | AppError::CompletedTransaction => 422,
            AppError::ConstraintViolation => 400,
            AppError::Internal => 500,
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self.app_error() {
            AppError::ConstraintViolation => 2,
            AppError::EntityNotFound => 3,
            AppError::InsecureAccount => 4,
            AppError::UnprocessableTransaction => 5,
            AppError::CompletedTransaction => 6,
            AppError::Internal => 1,
        }
    }

    /// Build the outward error body
    pub fn error_details(&self) -> ErrorDetails {
        let messages = match self {
            Self::Validation(messages) => messages.clone(),
            Self::InsecureHolder {
                account_holder_name,
            } => vec![account_holder_name.clone()],
            Self::UnprocessableTransaction(message) | Self::AlreadyCompleted(message) => {
                vec![message.clone()]
            }
            other => vec![other.to_string()],
        };

        ErrorDetails {
            code: self.app_error().value(),
            status: self.status(),
            messages,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for AccountingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AccountingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AccountingError {
    fn from(err: reqwest::Error) -> Self {
        Self::SecurityCheck(err.to_string())
    }
}

/// Result type alias for accounting operations
pub type AccountingResult<T> = Result<T, AccountingError>;
