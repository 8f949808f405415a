//! # CLI Commands Module
//!
//! Subcommands of the `rental` binary.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (parser + dispatch)
//! ├── car.rs      ◄─── add-car, cars
//! ├── client.rs   ◄─── register-client, client
//! ├── rental.rs   ◄─── start-rental, end-rental, rental, rentals
//! └── demo.rs     ◄─── demo (end-to-end walkthrough)
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CLI Command Flow                                     │
//! │                                                                         │
//! │  $ rental --db fleet.db end-rental 7 42.5                              │
//! │         │                                                               │
//! │         │ (clap derive)                                                 │
//! │         ▼                                                               │
//! │  Commands::EndRental { rental_id: 7, kilometers: 42.5 }                │
//! │         │                                                               │
//! │         │ execute(&db, command)                                         │
//! │         ▼                                                               │
//! │  rental::end_rental(db, RentalId(7), 42.5)                             │
//! │      -> Result<RentalDto, CliError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: { "id": 7, "status": "closed", "totalCost": 66.25, ... }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod car;
pub mod client;
pub mod demo;
pub mod rental;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rental_core::{CarId, ClientId, RentalId};
use rental_db::Database;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CliError, ErrorCode};

#[derive(Debug, Parser)]
#[command(name = "rental")]
#[command(about = "Car rental backend: fleet, clients and billed rentals.")]
pub struct CommandLine {
    /// SQLite database file (overrides RENTAL_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a car, start a rental for John Doe, print the ids
    Demo,
    /// Add a car to the fleet
    #[command(allow_negative_numbers = true)]
    AddCar {
        model: String,
        hourly_rate: f64,
        kilometer_rate: f64,
    },
    /// List every car
    Cars,
    /// Register a new client
    RegisterClient { name: String, email: String },
    /// Look a client up by email
    Client { email: String },
    /// Start a rental
    StartRental { client_id: i64, car_id: i64 },
    /// End an open rental and bill it
    #[command(allow_negative_numbers = true)]
    EndRental { rental_id: i64, kilometers: f64 },
    /// Show a rental
    Rental { rental_id: i64 },
    /// List open rentals, or every rental of one client
    Rentals {
        #[arg(long, value_name = "CLIENT_ID")]
        client: Option<i64>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runs one subcommand and returns its JSON result.
pub async fn execute(db: &Database, command: Commands) -> Result<Value, CliError> {
    match command {
        Commands::Demo => to_json(demo::run_demo(db).await?),
        Commands::AddCar {
            model,
            hourly_rate,
            kilometer_rate,
        } => to_json(car::add_car(db, &model, hourly_rate, kilometer_rate).await?),
        Commands::Cars => to_json(car::list_cars(db).await?),
        Commands::RegisterClient { name, email } => {
            to_json(client::register_client(db, &name, &email).await?)
        }
        Commands::Client { email } => to_json(client::get_client_by_email(db, &email).await?),
        Commands::StartRental { client_id, car_id } => {
            to_json(rental::start_rental(db, ClientId(client_id), CarId(car_id)).await?)
        }
        Commands::EndRental {
            rental_id,
            kilometers,
        } => to_json(rental::end_rental(db, RentalId(rental_id), kilometers).await?),
        Commands::Rental { rental_id } => to_json(rental::get_rental(db, RentalId(rental_id)).await?),
        Commands::Rentals { client } => {
            to_json(rental::list_rentals(db, client.map(ClientId)).await?)
        }
    }
}

fn to_json(value: impl Serialize) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::new(ErrorCode::Internal, e.to_string()))
}
