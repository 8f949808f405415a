//! # Domain Types
//!
//! Core domain types used throughout the rental backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │      Car        │   │     Client      │   │       Rental         │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id (CarId)     │   │  id (ClientId)  │   │  Open                │  │
//! │  │  model          │   │  name           │   │   id, client, car,   │  │
//! │  │  hourly_rate    │   │  email (unique) │   │   started_at         │  │
//! │  │  kilometer_rate │   │                 │   │  Closed              │  │
//! │  └─────────────────┘   └─────────────────┘   │   + ended_at, km,    │  │
//! │                                              │     total_cost       │  │
//! │                                              └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a storage-generated integer wrapped in a newtype,
//! so a `CarId` can never be passed where a `ClientId` is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::billing::{compute_total_cost, RateSchedule};
use crate::error::{CoreError, CoreResult};
use crate::validation::validate_kilometers;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer key.
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

entity_id!(
    /// Storage-generated identifier of a [`Car`].
    CarId
);
entity_id!(
    /// Storage-generated identifier of a [`Client`].
    ClientId
);
entity_id!(
    /// Storage-generated identifier of a [`Rental`].
    RentalId
);

// =============================================================================
// Car
// =============================================================================

/// A car available for rent, with its rate schedule.
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    pub id: CarId,

    /// Display name, e.g. "Tesla Model S".
    pub model: String,

    /// Price per hour of rental time. Partial hours are billed pro rata.
    pub hourly_rate: f64,

    /// Price per kilometer driven.
    pub kilometer_rate: f64,
}

impl Car {
    /// Returns the rate pair used for billing.
    #[inline]
    pub fn rates(&self) -> RateSchedule {
        RateSchedule {
            hourly_rate: self.hourly_rate,
            kilometer_rate: self.kilometer_rate,
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// A registered client. Email is unique across all clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Rental Status
// =============================================================================

/// Lifecycle state of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Car is out; closing fields are unset.
    Open,
    /// Car returned; end time, distance and cost are recorded.
    Closed,
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalStatus::Open => write!(f, "open"),
            RentalStatus::Closed => write!(f, "closed"),
        }
    }
}

// =============================================================================
// Rental
// =============================================================================

/// A rental session.
///
/// ## State Machine
/// ```text
/// ┌──────────────┐   close(ended_at, km, rates)   ┌──────────────────────┐
/// │    Open      │ ─────────────────────────────► │       Closed         │
/// │ id, client,  │                                │ + ended_at           │
/// │ car, start   │                                │ + kilometers_driven  │
/// └──────────────┘                                │ + total_cost         │
///                                                 └──────────────────────┘
/// ```
/// There is no way back: no reopen, no cancellation. A half-closed rental
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Rental {
    Open {
        id: RentalId,
        client_id: ClientId,
        car_id: CarId,
        started_at: DateTime<Utc>,
    },
    Closed {
        id: RentalId,
        client_id: ClientId,
        car_id: CarId,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        kilometers_driven: f64,
        total_cost: f64,
    },
}

impl Rental {
    pub fn id(&self) -> RentalId {
        match self {
            Rental::Open { id, .. } | Rental::Closed { id, .. } => *id,
        }
    }

    pub fn client_id(&self) -> ClientId {
        match self {
            Rental::Open { client_id, .. } | Rental::Closed { client_id, .. } => *client_id,
        }
    }

    pub fn car_id(&self) -> CarId {
        match self {
            Rental::Open { car_id, .. } | Rental::Closed { car_id, .. } => *car_id,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            Rental::Open { started_at, .. } | Rental::Closed { started_at, .. } => *started_at,
        }
    }

    pub fn status(&self) -> RentalStatus {
        match self {
            Rental::Open { .. } => RentalStatus::Open,
            Rental::Closed { .. } => RentalStatus::Closed,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, Rental::Open { .. })
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Rental::Open { .. } => None,
            Rental::Closed { ended_at, .. } => Some(*ended_at),
        }
    }

    pub fn kilometers_driven(&self) -> Option<f64> {
        match self {
            Rental::Open { .. } => None,
            Rental::Closed {
                kilometers_driven, ..
            } => Some(*kilometers_driven),
        }
    }

    pub fn total_cost(&self) -> Option<f64> {
        match self {
            Rental::Open { .. } => None,
            Rental::Closed { total_cost, .. } => Some(*total_cost),
        }
    }

    /// Closes an open rental, billing it against `rates`.
    ///
    /// ## Cost Formula
    /// ```text
    /// total_cost = elapsed_hours(started_at, ended_at) × hourly_rate
    ///            + kilometers_driven × kilometer_rate
    /// ```
    ///
    /// ## Errors
    /// * `CoreError::Validation` - negative or non-finite kilometers
    /// * `CoreError::RentalNotOpen` - the rental is already closed
    pub fn close(
        self,
        ended_at: DateTime<Utc>,
        kilometers_driven: f64,
        rates: &RateSchedule,
    ) -> CoreResult<Rental> {
        validate_kilometers(kilometers_driven)?;

        match self {
            Rental::Open {
                id,
                client_id,
                car_id,
                started_at,
            } => Ok(Rental::Closed {
                id,
                client_id,
                car_id,
                started_at,
                ended_at,
                kilometers_driven,
                total_cost: compute_total_cost(rates, started_at, ended_at, kilometers_driven),
            }),
            Rental::Closed { id, .. } => Err(CoreError::RentalNotOpen { rental_id: id }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
