//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://accounts.db`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8000
/// - `DAILY_TRANSFER_LIMIT` (optional): maximum aggregate amount an account may
///   send out per UTC calendar day, defaults to 200000
/// - `SEED_CSV_PATH` (optional): CSV file used to populate an empty database,
///   defaults to `accounts.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_daily_limit")]
    pub daily_transfer_limit: Decimal,

    #[serde(default = "default_seed_csv_path")]
    pub seed_csv_path: String,
}

fn default_database_url() -> String {
    "sqlite://accounts.db".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8000
}

fn default_daily_limit() -> Decimal {
    Decimal::from(200_000)
}

fn default_seed_csv_path() -> String {
    "accounts.csv".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types (e.g. a non-numeric DAILY_TRANSFER_LIMIT).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}
