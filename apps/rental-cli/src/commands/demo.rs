//! # Demo Command
//!
//! End-to-end walkthrough against the configured database.
//!
//! ```text
//! add "Tesla Model S" (20.0/h, 0.5/km)
//!        │
//!        ▼
//! register "John Doe" <john.doe@example.com>   (reused if already there)
//!        │
//!        ▼
//! look both up again ──► start rental ──► print ids
//! ```
//!
//! Running it twice adds a second car and a second rental for the same client.

use rental_db::{Database, DbError};
use serde::Serialize;
use tracing::info;

use crate::commands::car::CarDto;
use crate::commands::client::ClientDto;
use crate::commands::rental::RentalDto;
use crate::error::CliError;

pub const DEMO_MODEL: &str = "Tesla Model S";
pub const DEMO_HOURLY_RATE: f64 = 20.0;
pub const DEMO_KILOMETER_RATE: f64 = 0.5;
pub const DEMO_CLIENT_NAME: &str = "John Doe";
pub const DEMO_CLIENT_EMAIL: &str = "john.doe@example.com";

/// What the demo created, for printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub car_id: i64,
    pub client_id: i64,
    pub rental_id: i64,
    pub car: CarDto,
    pub client: ClientDto,
    pub rental: RentalDto,
}

/// Runs the walkthrough.
pub async fn run_demo(db: &Database) -> Result<DemoReport, CliError> {
    let car = db
        .cars()
        .add(DEMO_MODEL, DEMO_HOURLY_RATE, DEMO_KILOMETER_RATE)
        .await?;

    let client = match db.clients().register(DEMO_CLIENT_NAME, DEMO_CLIENT_EMAIL).await {
        Ok(client) => client,
        Err(DbError::DuplicateEmail { .. }) => {
            info!(email = DEMO_CLIENT_EMAIL, "Demo client already registered, reusing");
            db.clients().get_by_email(DEMO_CLIENT_EMAIL).await?
        }
        Err(e) => return Err(e.into()),
    };

    // Read back what was stored
    let car = db.cars().get_by_id(car.id).await?;
    let client = db.clients().get_by_email(&client.email).await?;

    let rental = db.rentals().start_rental(client.id, car.id).await?;

    info!(
        car_id = %car.id,
        client_id = %client.id,
        rental_id = %rental.id(),
        "Demo rental started"
    );

    Ok(DemoReport {
        car_id: car.id.get(),
        client_id: client.id.get(),
        rental_id: rental.id().get(),
        car: car.into(),
        client: client.into(),
        rental: rental.into(),
    })
}
