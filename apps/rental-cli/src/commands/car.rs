//! # Car Commands
//!
//! `add-car` and `cars`.

use rental_core::Car;
use rental_db::Database;
use serde::Serialize;
use tracing::info;

use crate::error::CliError;

/// Car DTO (Data Transfer Object) for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDto {
    pub id: i64,
    pub model: String,
    pub hourly_rate: f64,
    pub kilometer_rate: f64,
}

impl From<Car> for CarDto {
    fn from(car: Car) -> Self {
        CarDto {
            id: car.id.get(),
            model: car.model,
            hourly_rate: car.hourly_rate,
            kilometer_rate: car.kilometer_rate,
        }
    }
}

/// Adds a car to the fleet.
pub async fn add_car(
    db: &Database,
    model: &str,
    hourly_rate: f64,
    kilometer_rate: f64,
) -> Result<CarDto, CliError> {
    let car = db.cars().add(model, hourly_rate, kilometer_rate).await?;
    info!(car_id = %car.id, model = %car.model, "Car added");
    Ok(car.into())
}

/// Lists every car, oldest first.
pub async fn list_cars(db: &Database) -> Result<Vec<CarDto>, CliError> {
    let cars = db.cars().get_all().await?;
    Ok(cars.into_iter().map(CarDto::from).collect())
}
