//! # Validation Module
//!
//! Input validation for the rental backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (numbers parse as f64 / i64)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty names, plausible email                                  │
//! │  └── Non-negative, finite rates and distances                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE(email)                                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CLIENT_NAME_LEN, MAX_EMAIL_LEN, MAX_MODEL_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a car model name.
///
/// ## Example
/// ```rust
/// use rental_core::validation::validate_model;
///
/// assert!(validate_model("Tesla Model S").is_ok());
/// assert!(validate_model("   ").is_err());
/// ```
pub fn validate_model(model: &str) -> ValidationResult<()> {
    validate_text("model", model, MAX_MODEL_LEN)
}

/// Validates a client's display name.
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_CLIENT_NAME_LEN)
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - At most 254 characters
/// - Exactly one `@`, with something on both sides, and no whitespace
///
/// This is a sanity check, not RFC 5322 parsing.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, MAX_EMAIL_LEN)?;

    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            if domain.contains('@') {
                return Err(invalid("must contain exactly one '@'"));
            }
            Ok(())
        }
        _ => Err(invalid("must look like name@domain")),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_infinite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates one side of a rate schedule.
///
/// ## Example
/// ```rust
/// use rental_core::validation::validate_rate;
///
/// assert!(validate_rate("hourly_rate", 20.0).is_ok());
/// assert!(validate_rate("hourly_rate", 0.0).is_ok());
/// assert!(validate_rate("hourly_rate", -1.0).is_err());
/// ```
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    validate_non_negative(field, rate)
}

/// Validates the distance reported when a rental is closed.
pub fn validate_kilometers(kilometers: f64) -> ValidationResult<()> {
    validate_non_negative("kilometers_driven", kilometers)
}

// =============================================================================
// Unit Tests
// =============================================================================
