//! # Repository Module
//!
//! Database repository implementations for the rental backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.rentals().end_rental(id, 42.0)                             │
//! │       ▼                                                                 │
//! │  RentalRepository                                                      │
//! │  ├── start_rental(&self, client_id, car_id)                            │
//! │  ├── end_rental(&self, rental_id, kilometers)                          │
//! │  └── get_by_id(&self, id)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives here and nowhere else. Every call reads fresh from storage: │
//! │  no caching of cars or clients between calls.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CarRepository`](car::CarRepository) - Add and list cars
//! - [`ClientRepository`](client::ClientRepository) - Register and look up clients
//! - [`RentalRepository`](rental::RentalRepository) - Rental lifecycle and billing

pub mod car;
pub mod client;
pub mod rental;
