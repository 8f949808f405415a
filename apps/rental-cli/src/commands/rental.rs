//! # Rental Commands
//!
//! `start-rental`, `end-rental`, `rental` and `rentals`.
//!
//! Closed rentals carry both the raw `totalCost` and a two-decimal
//! `totalCostDisplay`; the stored value itself is never rounded.

use chrono::{DateTime, Utc};
use rental_core::billing::format_amount;
use rental_core::{CarId, ClientId, Rental, RentalId, RentalStatus};
use rental_db::Database;
use serde::Serialize;

use crate::error::CliError;

/// Rental DTO for output. Closing fields are null while the rental is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalDto {
    pub id: i64,
    pub client_id: i64,
    pub car_id: i64,
    pub status: RentalStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub kilometers_driven: Option<f64>,
    pub total_cost: Option<f64>,
    pub total_cost_display: Option<String>,
}

impl From<Rental> for RentalDto {
    fn from(rental: Rental) -> Self {
        RentalDto {
            id: rental.id().get(),
            client_id: rental.client_id().get(),
            car_id: rental.car_id().get(),
            status: rental.status(),
            started_at: rental.started_at(),
            ended_at: rental.ended_at(),
            kilometers_driven: rental.kilometers_driven(),
            total_cost: rental.total_cost(),
            total_cost_display: rental.total_cost().map(format_amount),
        }
    }
}

/// Starts a rental now.
pub async fn start_rental(
    db: &Database,
    client_id: ClientId,
    car_id: CarId,
) -> Result<RentalDto, CliError> {
    let rental = db.rentals().start_rental(client_id, car_id).await?;
    Ok(rental.into())
}

/// Ends an open rental now and bills it.
pub async fn end_rental(
    db: &Database,
    rental_id: RentalId,
    kilometers: f64,
) -> Result<RentalDto, CliError> {
    let rental = db.rentals().end_rental(rental_id, kilometers).await?;
    Ok(rental.into())
}

/// Shows a rental in whichever state it is.
pub async fn get_rental(db: &Database, rental_id: RentalId) -> Result<RentalDto, CliError> {
    let rental = db.rentals().get_by_id(rental_id).await?;
    Ok(rental.into())
}

/// Lists a client's rentals (open and closed), or every open rental when no
/// client is given.
pub async fn list_rentals(
    db: &Database,
    client_id: Option<ClientId>,
) -> Result<Vec<RentalDto>, CliError> {
    let rentals = match client_id {
        Some(client_id) => {
            // Unknown client is an error, not an empty list
            db.clients().get_by_id(client_id).await?;
            db.rentals().list_for_client(client_id).await?
        }
        None => db.rentals().list_open().await?,
    };
    Ok(rentals.into_iter().map(RentalDto::from).collect())
}
