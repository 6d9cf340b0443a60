//! Runtime configuration.
//!
//! Values come from the process environment, optionally primed from a `.env`
//! file. Everything except `JWT_SECRET` has a default.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// What happens to the flight's remaining seats when a seat-holding ticket
/// is cancelled by its customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SeatRestorePolicy {
    /// Give the seat back to the flight inventory.
    Restore,
    /// Leave the inventory untouched.
    Keep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// MySQL connection url. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// How long a PENDING ticket may wait for payment before it is cancelled.
    pub pending_ticket_ttl_minutes: i64,
    pub sweep_interval_secs: u64,
    pub seat_restore_policy: SeatRestorePolicy,
    /// Compare-and-swap attempts before a seat reservation gives up.
    pub booking_max_retries: u32,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: None,
            max_connections: 10,
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            pending_ticket_ttl_minutes: 30,
            sweep_interval_secs: 60,
            seat_restore_policy: SeatRestorePolicy::Restore,
            booking_max_retries: 16,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let defaults = AppConfig::default();

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        Ok(AppConfig {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            jwt_secret,
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            bcrypt_cost: parse_or("BCRYPT_COST", defaults.bcrypt_cost)?,
            pending_ticket_ttl_minutes: parse_or(
                "PENDING_TICKET_TTL_MINUTES",
                defaults.pending_ticket_ttl_minutes,
            )?,
            sweep_interval_secs: parse_or("SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs)?,
            seat_restore_policy: parse_or("SEAT_RESTORE_POLICY", defaults.seat_restore_policy)?,
            booking_max_retries: parse_or("BOOKING_MAX_RETRIES", defaults.booking_max_retries)?,
            seed_demo_data: parse_or("SEED_DEMO_DATA", defaults.seed_demo_data)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
