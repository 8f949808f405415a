//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      CoreError / ValidationError           │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ErrorKind ← NotFound | DuplicateEmail | InvalidArgument |             │
//! │              StorageFailure                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the app) ← Printed for the operator                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rental_core::{CoreError, RentalId, ValidationError};
use thiserror::Error;

/// The four externally visible failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced client, car or rental does not exist, or the rental is
    /// not in a closable state.
    NotFound,
    /// Client registration hit the unique email constraint.
    DuplicateEmail,
    /// Negative rate, negative distance, empty name...
    InvalidArgument,
    /// Anything the storage backend failed at.
    StorageFailure,
}

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_optional` returns no rows
    /// - ID doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A client with this email is already registered.
    #[error("Email '{email}' is already registered")]
    DuplicateEmail { email: String },

    /// Unique constraint violation not covered by a dedicated variant.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The rental was closed before this call (possibly by a concurrent caller).
    #[error("Rental {rental_id} is already closed")]
    AlreadyClosed { rental_id: RentalId },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent client_id or car_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Input rejected before reaching storage.
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// A stored row violates a domain invariant.
    ///
    /// ## When This Occurs
    /// - A rental row with only some of its closing columns set
    /// - An unparseable timestamp
    #[error("Corrupt {entity} record {id}: {reason}")]
    CorruptRecord {
        entity: String,
        id: String,
        reason: String,
    },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a CorruptRecord error.
    pub fn corrupt(entity: impl Into<String>, id: impl ToString, reason: impl Into<String>) -> Self {
        DbError::CorruptRecord {
            entity: entity.into(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Classifies this error into one of the four external kinds.
    ///
    /// ## Mapping
    /// ```text
    /// NotFound, AlreadyClosed, ForeignKeyViolation → NotFound
    /// DuplicateEmail, UniqueViolation(*.email)     → DuplicateEmail
    /// Validation                                   → InvalidArgument
    /// everything else                              → StorageFailure
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. }
            | DbError::AlreadyClosed { .. }
            | DbError::ForeignKeyViolation { .. } => ErrorKind::NotFound,
            DbError::DuplicateEmail { .. } => ErrorKind::DuplicateEmail,
            DbError::UniqueViolation { field, .. } if field.ends_with("email") => {
                ErrorKind::DuplicateEmail
            }
            DbError::Validation(_) => ErrorKind::InvalidArgument,
            _ => ErrorKind::StorageFailure,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RentalNotOpen { rental_id } => DbError::AlreadyClosed { rental_id },
            CoreError::Validation(e) => DbError::Validation(e),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(DbError::not_found("Car", 1).kind(), ErrorKind::NotFound);
        assert_eq!(
            DbError::AlreadyClosed {
                rental_id: RentalId(1)
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DbError::DuplicateEmail {
                email: "a@b.c".to_string()
            }
            .kind(),
            ErrorKind::DuplicateEmail
        );
        assert_eq!(
            DbError::UniqueViolation {
                field: "clients.email".to_string(),
                value: "a@b.c".to_string()
            }
            .kind(),
            ErrorKind::DuplicateEmail
        );
        assert_eq!(
            DbError::Validation(ValidationError::MustBeNonNegative {
                field: "kilometers_driven".to_string()
            })
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            DbError::QueryFailed("disk I/O error".to_string()).kind(),
            ErrorKind::StorageFailure
        );
        assert_eq!(DbError::PoolExhausted.kind(), ErrorKind::StorageFailure);
        assert_eq!(
            DbError::corrupt("Rental", 3, "partially closed").kind(),
            ErrorKind::StorageFailure
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let err: DbError = CoreError::RentalNotOpen {
            rental_id: RentalId(4),
        }
        .into();
        assert!(matches!(
            err,
            DbError::AlreadyClosed {
                rental_id: RentalId(4)
            }
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(DbError::not_found("Car", 12).to_string(), "Car not found: 12");
        assert_eq!(
            DbError::DuplicateEmail {
                email: "john.doe@example.com".to_string()
            }
            .to_string(),
            "Email 'john.doe@example.com' is already registered"
        );
    }
}
