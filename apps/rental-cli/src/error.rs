//! # CLI Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Rental CLI                         │
//! │                                                                         │
//! │  rental end-rental 7 42                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, CliError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Config Error? ──── ConfigError::InvalidValue ─── CliError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: [NOT_FOUND] Rental not found: 7                               │
//! │  exit status: 1                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage internals are logged with `tracing::error!` and replaced by a
//! generic message, so SQL text never reaches the terminal.

use std::fmt;

use rental_db::{DbError, ErrorKind};
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "DUPLICATE_EMAIL",
///   "message": "Email 'john.doe@example.com' is already registered"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Client, car or rental missing, or rental already closed
    NotFound,

    /// Email already registered
    DuplicateEmail,

    /// Input rejected by validation
    InvalidArgument,

    /// Database operation failed
    StorageFailure,

    /// Environment configuration is unusable
    ConfigError,

    /// Internal error (output encoding)
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DuplicateEmail => "DUPLICATE_EMAIL",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::StorageFailure => "STORAGE_FAILURE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::DuplicateEmail => ErrorCode::DuplicateEmail,
            ErrorKind::InvalidArgument => ErrorCode::InvalidArgument,
            ErrorKind::StorageFailure => ErrorCode::StorageFailure,
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }
}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        let code = ErrorCode::from(err.kind());
        match err {
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::new(code, "Referenced record does not exist")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(code, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                CliError::new(code, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                CliError::new(code, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(code, "Database transaction failed")
            }
            DbError::CorruptRecord { entity, id, reason } => {
                tracing::error!(%entity, %id, %reason, "Corrupt record");
                CliError::new(code, format!("Stored {} {} is unreadable", entity, id))
            }
            DbError::PoolExhausted => CliError::new(code, "Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(code, "Database operation failed")
            }
            // NotFound, AlreadyClosed, DuplicateEmail, UniqueViolation, Validation
            other => CliError::new(code, other.to_string()),
        }
    }
}

/// Converts configuration errors to CLI errors.
impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}
