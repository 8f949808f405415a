//! # rental-core: Pure Domain Logic for the Rental Backend
//!
//! Everything the backend *knows* about cars, clients and rentals lives here,
//! as plain types and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Rental Backend Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rental CLI (apps/rental-cli)                 │   │
//! │  │   add-car ──► register-client ──► start-rental ──► end-rental   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rental-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, repositories                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  billing  │  │   clock   │  │ validation│  │   │
//! │  │   │ Car       │  │ RateSched │  │ Clock     │  │  rules    │  │   │
//! │  │   │ Rental    │  │ elapsed_h │  │ Manual    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, `Car`, `Client`, and the `Rental` state enum
//! - [`billing`] - Rate schedules and the cost formula
//! - [`clock`] - Injectable time source
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use rental_core::billing::{compute_total_cost, RateSchedule};
//!
//! let rates = RateSchedule::new(20.0, 0.5).unwrap();
//! let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
//! let end = start + Duration::hours(2);
//!
//! // 2h × 20.0 + 10km × 0.5
//! assert_eq!(compute_total_cost(&rates, start, end, 10.0), 45.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod clock;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::RateSchedule;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a car model name.
pub const MAX_MODEL_LEN: usize = 100;

/// Maximum length of a client name.
pub const MAX_CLIENT_NAME_LEN: usize = 200;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;
