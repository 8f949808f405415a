//! # rental-db: Database Layer for the Rental Backend
//!
//! SQLite persistence for cars, clients and rentals, using sqlx for async
//! access. All SQL in the workspace lives in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rental Backend Data Flow                         │
//! │                                                                         │
//! │  CLI command (end-rental 3 42.0)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rental-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (repository) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CarRepo       │    │ 001_initial_ │  │   │
//! │  │   │ Clock         │◄───│ ClientRepo    │    │ schema.sql   │  │   │
//! │  │   │               │    │ RentalRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./tesla_rental.db                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and their caller-facing kinds
//! - [`repository`] - Car, client and rental repositories
//! - [`timestamp`] - Text encoding of stored instants
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rental_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./tesla_rental.db")).await?;
//!
//! let car = db.cars().add("Tesla Model S", 20.0, 0.5).await?;
//! let client = db.clients().register("John Doe", "john.doe@example.com").await?;
//! let rental = db.rentals().start_rental(client.id, car.id).await?;
//! let closed = db.rentals().end_rental(rental.id(), 10.0).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod timestamp;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ErrorKind};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::car::CarRepository;
pub use repository::client::ClientRepository;
pub use repository::rental::RentalRepository;
