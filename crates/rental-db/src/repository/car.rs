//! # Car Repository
//!
//! Database operations for cars. Cars are immutable once added, so the
//! repository only inserts and reads.

use rental_core::validation::validate_model;
use rental_core::{Car, CarId, RateSchedule};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for car database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CarRepository::new(pool);
///
/// let car = repo.add("Tesla Model S", 20.0, 0.5).await?;
/// let all = repo.get_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Adds a car to the fleet.
    ///
    /// ## Arguments
    /// * `model` - Display name, stored exactly as given
    /// * `hourly_rate` - Price per hour, must be ≥ 0
    /// * `kilometer_rate` - Price per kilometer, must be ≥ 0
    ///
    /// ## Returns
    /// * `Ok(Car)` - The stored car with its generated id
    /// * `Err(DbError::Validation)` - Empty model or negative rate
    pub async fn add(&self, model: &str, hourly_rate: f64, kilometer_rate: f64) -> DbResult<Car> {
        validate_model(model)?;
        let rates = RateSchedule::new(hourly_rate, kilometer_rate)?;

        debug!(model = %model, hourly_rate, kilometer_rate, "Adding car");

        let result = sqlx::query(
            r#"
            INSERT INTO cars (model, hourly_rate, kilometer_rate)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(model)
        .bind(rates.hourly_rate)
        .bind(rates.kilometer_rate)
        .execute(&self.pool)
        .await?;

        Ok(Car {
            id: CarId(result.last_insert_rowid()),
            model: model.to_string(),
            hourly_rate: rates.hourly_rate,
            kilometer_rate: rates.kilometer_rate,
        })
    }

    /// Lists every car in insertion (id) order.
    pub async fn get_all(&self) -> DbResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT id, model, hourly_rate, kilometer_rate
            FROM cars
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = cars.len(), "Listed cars");
        Ok(cars)
    }

    /// Gets a car by its ID.
    ///
    /// ## Returns
    /// * `Ok(Car)` - Car found
    /// * `Err(DbError::NotFound)` - No such car
    pub async fn get_by_id(&self, id: CarId) -> DbResult<Car> {
        sqlx::query_as::<_, Car>(
            r#"
            SELECT id, model, hourly_rate, kilometer_rate
            FROM cars
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Car", id))
    }

    /// Counts cars (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::test_support::memory_db;

    #[tokio::test]
    async fn test_add_then_get_all() {
        let db = memory_db().await;
        let repo = db.cars();

        let car = repo.add("Tesla Model S", 20.0, 0.5).await.unwrap();
        let all = repo.get_all().await.unwrap();

        assert_eq!(all, vec![car.clone()]);
        assert_eq!(car.model, "Tesla Model S");
        assert_eq!(car.hourly_rate, 20.0);
        assert_eq!(car.kilometer_rate, 0.5);
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_ordered() {
        let db = memory_db().await;
        let repo = db.cars();

        let a = repo.add("Tesla Model 3", 15.0, 0.4).await.unwrap();
        let b = repo.add("Tesla Model X", 25.0, 0.6).await.unwrap();
        let c = repo.add("Tesla Model Y", 0.0, 0.0).await.unwrap();

        assert!(a.id < b.id && b.id < c.id);
        let ids: Vec<CarId> = repo.get_all().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_all_empty() {
        let db = memory_db().await;
        assert!(db.cars().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = memory_db().await;
        let repo = db.cars();
        let car = repo.add("Tesla Model S", 20.0, 0.5).await.unwrap();

        assert_eq!(repo.get_by_id(car.id).await.unwrap(), car);

        let err = repo.get_by_id(CarId(999)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_negative_rates_rejected() {
        let db = memory_db().await;
        let repo = db.cars();

        let err = repo.add("Tesla Model S", -20.0, 0.5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = repo.add("Tesla Model S", 20.0, -0.5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = repo.add("  ", 20.0, 0.5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
