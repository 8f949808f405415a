//! # Rental Repository
//!
//! The rental lifecycle: start, end (with billing), and lookups.
//!
//! ## Rental Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rental Lifecycle                                  │
//! │                                                                         │
//! │  1. START                                                              │
//! │     └── start_rental(client, car)                                      │
//! │         ├── client exists?  car exists?   (one transaction)            │
//! │         └── INSERT start_time = now        → Rental::Open              │
//! │                                                                         │
//! │  2. END                                                                │
//! │     └── end_rental(rental, km)                                         │
//! │         ├── km ≥ 0?                        → InvalidArgument           │
//! │         ├── read rental, read its car (fresh rates)                    │
//! │         ├── Rental::close() computes total_cost                        │
//! │         └── UPDATE ... WHERE id = ? AND end_time IS NULL               │
//! │             ├── 1 row  → Rental::Closed                                │
//! │             └── 0 rows → AlreadyClosed (someone else won)              │
//! │                                                                         │
//! │  There is no reopen and no cancel.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## At-Most-Once Closure
//! The closing UPDATE is a single statement guarded by `end_time IS NULL`,
//! so it is both the write and the compare-and-swap. SQLite serializes
//! writers; whichever UPDATE runs second matches zero rows. All three closing
//! columns land in that one statement, so a failure leaves the rental open.

use std::sync::Arc;

use rental_core::validation::validate_kilometers;
use rental_core::{CarId, ClientId, Clock, Rental, RentalId};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::car::CarRepository;
use crate::timestamp;

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw `rentals` row, before the all-or-none invariant is checked.
#[derive(Debug, sqlx::FromRow)]
struct RentalRow {
    id: RentalId,
    client_id: ClientId,
    car_id: CarId,
    start_time: String,
    end_time: Option<String>,
    kilometers_driven: Option<f64>,
    total_cost: Option<f64>,
}

impl TryFrom<RentalRow> for Rental {
    type Error = DbError;

    fn try_from(row: RentalRow) -> DbResult<Rental> {
        let parse = |text: &str| {
            timestamp::decode(text).map_err(|e| {
                DbError::corrupt("Rental", row.id, format!("bad timestamp '{}': {}", text, e))
            })
        };

        let started_at = parse(&row.start_time)?;

        match (&row.end_time, row.kilometers_driven, row.total_cost) {
            (None, None, None) => Ok(Rental::Open {
                id: row.id,
                client_id: row.client_id,
                car_id: row.car_id,
                started_at,
            }),
            (Some(end_time), Some(kilometers_driven), Some(total_cost)) => Ok(Rental::Closed {
                id: row.id,
                client_id: row.client_id,
                car_id: row.car_id,
                started_at,
                ended_at: parse(end_time)?,
                kilometers_driven,
                total_cost,
            }),
            _ => Err(DbError::corrupt(
                "Rental",
                row.id,
                "closing columns are only partially set",
            )),
        }
    }
}

const SELECT_RENTAL: &str = r#"
    SELECT id, client_id, car_id, start_time, end_time, kilometers_driven, total_cost
    FROM rentals
"#;

fn into_rentals(rows: Vec<RentalRow>) -> DbResult<Vec<Rental>> {
    rows.into_iter().map(Rental::try_from).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the rental lifecycle.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl RentalRepository {
    /// Creates a new RentalRepository stamping times from `clock`.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        RentalRepository { pool, clock }
    }

    /// Starts a rental of `car_id` by `client_id` at the current time.
    ///
    /// ## What This Does
    /// 1. Opens a transaction
    /// 2. Checks that both the client and the car exist
    /// 3. Inserts the rental with `start_time = now`
    /// 4. Commits
    ///
    /// Any early return drops the transaction, which rolls it back.
    ///
    /// ## Returns
    /// * `Ok(Rental::Open)` - The new rental
    /// * `Err(DbError::NotFound)` - Unknown client or car; no row is created
    ///
    /// A car that is already out on another open rental is not rejected.
    pub async fn start_rental(&self, client_id: ClientId, car_id: CarId) -> DbResult<Rental> {
        debug!(client_id = %client_id, car_id = %car_id, "Starting rental");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let client: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE id = ?1")
            .bind(client_id)
            .fetch_optional(&mut *tx)
            .await?;
        if client.is_none() {
            return Err(DbError::not_found("Client", client_id));
        }

        let car: Option<i64> = sqlx::query_scalar("SELECT id FROM cars WHERE id = ?1")
            .bind(car_id)
            .fetch_optional(&mut *tx)
            .await?;
        if car.is_none() {
            return Err(DbError::not_found("Car", car_id));
        }

        let started_at = timestamp::truncate(self.clock.now());

        let result = sqlx::query(
            r#"
            INSERT INTO rentals (client_id, car_id, start_time)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(client_id)
        .bind(car_id)
        .bind(timestamp::encode(started_at))
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let rental = Rental::Open {
            id: RentalId(result.last_insert_rowid()),
            client_id,
            car_id,
            started_at,
        };

        info!(
            rental_id = %rental.id(),
            client_id = %client_id,
            car_id = %car_id,
            started_at = %timestamp::encode(started_at),
            "Rental started"
        );
        Ok(rental)
    }

    /// Ends an open rental and bills it.
    ///
    /// ## Cost
    /// `elapsed_hours × hourly_rate + kilometers_driven × kilometer_rate`,
    /// using the car's rates as stored right now and the clock's current time.
    ///
    /// ## Returns
    /// * `Ok(Rental::Closed)` - The closed, billed rental
    /// * `Err(DbError::Validation)` - Negative or non-finite kilometers
    /// * `Err(DbError::NotFound)` - No such rental
    /// * `Err(DbError::AlreadyClosed)` - Rental was closed before, possibly
    ///   by a concurrent call; the stored values are untouched
    pub async fn end_rental(&self, rental_id: RentalId, kilometers_driven: f64) -> DbResult<Rental> {
        validate_kilometers(kilometers_driven)?;

        debug!(rental_id = %rental_id, kilometers_driven, "Ending rental");

        let rental = self.get_by_id(rental_id).await?;
        if !rental.is_open() {
            return Err(DbError::AlreadyClosed { rental_id });
        }

        let car = CarRepository::new(self.pool.clone())
            .get_by_id(rental.car_id())
            .await?;

        let ended_at = timestamp::truncate(self.clock.now());
        let closed = rental.close(ended_at, kilometers_driven, &car.rates())?;

        self.write_closure(&closed).await?;

        info!(
            rental_id = %rental_id,
            car_id = %car.id,
            kilometers_driven,
            total_cost = ?closed.total_cost(),
            "Rental ended"
        );
        Ok(closed)
    }

    /// Persists the closing columns of `closed`, provided the stored row is
    /// still open.
    ///
    /// ## Returns
    /// * `Ok(())` - Exactly one open row was closed
    /// * `Err(DbError::AlreadyClosed)` - Zero rows matched; the stored row
    ///   was closed after it was read
    async fn write_closure(&self, closed: &Rental) -> DbResult<()> {
        let (rental_id, ended_at, kilometers_driven, total_cost) = match closed {
            Rental::Closed {
                id,
                ended_at,
                kilometers_driven,
                total_cost,
                ..
            } => (*id, *ended_at, *kilometers_driven, *total_cost),
            Rental::Open { id, .. } => {
                return Err(DbError::Internal(format!("rental {} is not closed", id)))
            }
        };

        let result = sqlx::query(
            r#"
            UPDATE rentals SET
                end_time = ?2,
                kilometers_driven = ?3,
                total_cost = ?4
            WHERE id = ?1 AND end_time IS NULL
            "#,
        )
        .bind(rental_id)
        .bind(timestamp::encode(ended_at))
        .bind(kilometers_driven)
        .bind(total_cost)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(rental_id = %rental_id, "Rental closed concurrently");
            return Err(DbError::AlreadyClosed { rental_id });
        }

        Ok(())
    }

    /// Gets a rental by its ID.
    ///
    /// ## Returns
    /// * `Ok(Rental)` - Open or closed rental
    /// * `Err(DbError::NotFound)` - No such rental
    /// * `Err(DbError::CorruptRecord)` - Stored row breaks the all-or-none rule
    pub async fn get_by_id(&self, id: RentalId) -> DbResult<Rental> {
        let row = sqlx::query_as::<_, RentalRow>(&format!("{SELECT_RENTAL} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Rental", id))?;

        Rental::try_from(row)
    }

    /// Lists a client's rentals, oldest first.
    pub async fn list_for_client(&self, client_id: ClientId) -> DbResult<Vec<Rental>> {
        let rows = sqlx::query_as::<_, RentalRow>(&format!(
            "{SELECT_RENTAL} WHERE client_id = ?1 ORDER BY id"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        into_rentals(rows)
    }

    /// Lists all open rentals, oldest first.
    pub async fn list_open(&self) -> DbResult<Vec<Rental>> {
        let rows = sqlx::query_as::<_, RentalRow>(&format!(
            "{SELECT_RENTAL} WHERE end_time IS NULL ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_rentals(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pool::Database;
    use crate::repository::test_support::{memory_db, memory_db_with_clock, t0, TempDb};
    use chrono::{Duration, Utc};
    use rental_core::{Car, Client, RentalStatus};

    async fn seed(db: &Database) -> (Client, Car) {
        let car = db.cars().add("Tesla Model S", 20.0, 0.5).await.unwrap();
        let client = db
            .clients()
            .register("John Doe", "john.doe@example.com")
            .await
            .unwrap();
        (client, car)
    }

    async fn rental_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM rentals")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_then_get_is_open() {
        let db = memory_db().await;
        let (client, car) = seed(&db).await;

        let before = Utc::now();
        let started = db.rentals().start_rental(client.id, car.id).await.unwrap();
        let fetched = db.rentals().get_by_id(started.id()).await.unwrap();

        assert_eq!(fetched, started);
        assert_eq!(fetched.status(), RentalStatus::Open);
        assert_eq!(fetched.client_id(), client.id);
        assert_eq!(fetched.car_id(), car.id);
        assert!(fetched.ended_at().is_none());
        assert!(fetched.kilometers_driven().is_none());
        assert!(fetched.total_cost().is_none());

        let drift = fetched.started_at() - before;
        assert!(drift >= Duration::zero() - Duration::microseconds(1));
        assert!(drift < Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_start_with_unknown_ids() {
        let db = memory_db().await;
        let (client, car) = seed(&db).await;

        let err = db
            .rentals()
            .start_rental(ClientId(999), car.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Client"));

        let err = db
            .rentals()
            .start_rental(client.id, CarId(999))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Car"));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(rental_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_end_after_two_hours() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;

        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();
        assert_eq!(rental.started_at(), t0());

        clock.advance(Duration::hours(2));
        let closed = db.rentals().end_rental(rental.id(), 10.0).await.unwrap();

        assert_eq!(closed.total_cost(), Some(45.0));
        assert_eq!(closed.kilometers_driven(), Some(10.0));
        assert_eq!(closed.ended_at(), Some(t0() + Duration::hours(2)));

        let stored = db.rentals().get_by_id(rental.id()).await.unwrap();
        assert_eq!(stored, closed);
    }

    #[tokio::test]
    async fn test_fractional_hours_billed_pro_rata() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;

        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();
        clock.advance(Duration::minutes(90));

        let closed = db.rentals().end_rental(rental.id(), 0.0).await.unwrap();
        assert_eq!(closed.total_cost(), Some(30.0));
    }

    #[tokio::test]
    async fn test_end_twice() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;

        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();
        clock.advance(Duration::hours(2));
        let first = db.rentals().end_rental(rental.id(), 10.0).await.unwrap();

        clock.advance(Duration::hours(5));
        let err = db.rentals().end_rental(rental.id(), 99.0).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyClosed { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let stored = db.rentals().get_by_id(rental.id()).await.unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_end_unknown_rental() {
        let db = memory_db().await;
        let err = db.rentals().end_rental(RentalId(404), 1.0).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_end_with_negative_kilometers() {
        let db = memory_db().await;
        let (client, car) = seed(&db).await;
        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();

        let err = db.rentals().end_rental(rental.id(), -5.0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        assert!(db.rentals().get_by_id(rental.id()).await.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_concurrent_end_rental() {
        let temp = TempDb::new();
        let db = Database::new(temp.config()).await.unwrap();
        let (client, car) = seed(&db).await;
        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();

        let id = rental.id();
        let a = db.rentals();
        let b = db.rentals();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.end_rental(id, 10.0).await }),
            tokio::spawn(async move { b.end_rental(id, 20.0).await }),
        );
        let results = [ra.unwrap(), rb.unwrap()];

        let winners: Vec<&Rental> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);

        let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(loser.kind(), ErrorKind::NotFound);

        let stored = db.rentals().get_by_id(rental.id()).await.unwrap();
        assert_eq!(&stored, winners[0]);
        assert_eq!(stored.kilometers_driven(), winners[0].kilometers_driven());

        db.close().await;
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_rental_open() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;
        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();

        // Every write to rentals fails from here on; reads still work
        sqlx::query(
            "CREATE TRIGGER fail_rental_update BEFORE UPDATE ON rentals \
             BEGIN SELECT RAISE(ABORT, 'disk I/O error'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        clock.advance(Duration::hours(2));
        let err = db.rentals().end_rental(rental.id(), 10.0).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(ref msg) if msg.contains("disk I/O error")));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);

        let stored = db.rentals().get_by_id(rental.id()).await.unwrap();
        assert!(stored.is_open());
        assert_eq!(stored, rental);
    }

    #[tokio::test]
    async fn test_closing_write_loses_to_earlier_close() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;
        let repo = db.rentals();
        let rental = repo.start_rental(client.id, car.id).await.unwrap();

        // Read while open, then let another caller close it first
        let stale = repo.get_by_id(rental.id()).await.unwrap();
        clock.advance(Duration::hours(2));
        let winner = repo.end_rental(rental.id(), 10.0).await.unwrap();

        clock.advance(Duration::hours(1));
        let late = stale
            .close(clock.now(), 99.0, &car.rates())
            .unwrap();
        let err = repo.write_closure(&late).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyClosed { rental_id } if rental_id == rental.id()));

        let stored = repo.get_by_id(rental.id()).await.unwrap();
        assert_eq!(stored, winner);
        assert_eq!(stored.kilometers_driven(), Some(10.0));
    }

    #[tokio::test]
    async fn test_partially_closed_row_is_corrupt() {
        let db = memory_db().await;
        let (client, car) = seed(&db).await;
        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();

        // Bypass the CHECK constraint to simulate a row written by something else
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE rentals SET kilometers_driven = 3.0 WHERE id = ?1")
            .bind(rental.id())
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.rentals().get_by_id(rental.id()).await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRecord { .. }));
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }

    #[tokio::test]
    async fn test_list_for_client_and_open() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;
        let other = db
            .clients()
            .register("Jane Roe", "jane.roe@example.com")
            .await
            .unwrap();

        let r1 = db.rentals().start_rental(client.id, car.id).await.unwrap();
        let r2 = db.rentals().start_rental(other.id, car.id).await.unwrap();
        let r3 = db.rentals().start_rental(client.id, car.id).await.unwrap();

        clock.advance(Duration::hours(1));
        db.rentals().end_rental(r1.id(), 5.0).await.unwrap();

        let mine: Vec<RentalId> = db
            .rentals()
            .list_for_client(client.id)
            .await
            .unwrap()
            .iter()
            .map(Rental::id)
            .collect();
        assert_eq!(mine, vec![r1.id(), r3.id()]);

        let open: Vec<RentalId> = db
            .rentals()
            .list_open()
            .await
            .unwrap()
            .iter()
            .map(Rental::id)
            .collect();
        assert_eq!(open, vec![r2.id(), r3.id()]);
    }

    #[tokio::test]
    async fn test_rates_read_fresh_at_close() {
        let (db, clock) = memory_db_with_clock().await;
        let (client, car) = seed(&db).await;
        let rental = db.rentals().start_rental(client.id, car.id).await.unwrap();

        // No API changes rates; do it underneath to prove nothing is cached
        sqlx::query("UPDATE cars SET hourly_rate = 30.0 WHERE id = ?1")
            .bind(car.id)
            .execute(db.pool())
            .await
            .unwrap();

        clock.advance(Duration::hours(1));
        let closed = db.rentals().end_rental(rental.id(), 0.0).await.unwrap();
        assert_eq!(closed.total_cost(), Some(30.0));
    }
}
