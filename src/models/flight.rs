use chrono::{NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Airport {
    pub airport_code: String,
    pub airport_name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Airline {
    pub iata_code: String,
    pub airline_name: String,
    pub airport_base: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
}

// Flight Status Enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub airline_code: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub date: NaiveDate,
    pub departure_time_local: NaiveTime,
    pub landing_time_local: NaiveTime,
    pub capacity: i32,
    pub remaining_tickets: i32,
    pub flight_status: FlightStatus,
    /// Bumped on every write; seat reservations compare against it.
    pub version: i32,
}

impl Flight {
    pub fn is_scheduled(&self) -> bool {
        self.flight_status == FlightStatus::Scheduled
    }

    pub fn has_seats(&self) -> bool {
        self.remaining_tickets > 0
    }
}

// Flight row as handed to a repository for insertion
#[derive(Debug, Clone)]
pub struct NewFlight {
    pub flight_number: String,
    pub airline_code: String,
    pub origin_airport: String,
    pub destination_airport: String,
    pub date: NaiveDate,
    pub departure_time_local: NaiveTime,
    pub landing_time_local: NaiveTime,
    pub capacity: i32,
    pub remaining_tickets: i32,
    pub flight_status: FlightStatus,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct NewFlightRequest {
    #[validate(length(min = 1, max = 10, message = "Flight Number is required"))]
    pub flight_number: String,
    /// Ignored for airline accounts, which always add flights for themselves.
    pub airline_code: Option<String>,
    #[validate(length(min = 1, message = "Origin Airport is required"))]
    pub origin_airport: String,
    #[validate(length(min = 1, message = "Destination Airport is required"))]
    pub destination_airport: String,
    pub date: NaiveDate,
    pub departure_time_local: NaiveTime,
    pub landing_time_local: NaiveTime,
    /// Defaults to `remaining_tickets`.
    pub capacity: Option<i32>,
    #[validate(range(min = 0, message = "Remaining Tickets must not be negative"))]
    pub remaining_tickets: i32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UpdateFlightRequest {
    #[validate(length(min = 1, max = 10, message = "Flight Number is required"))]
    pub flight_number: String,
    #[validate(length(min = 1, message = "Origin Airport is required"))]
    pub origin_airport: String,
    #[validate(length(min = 1, message = "Destination Airport is required"))]
    pub destination_airport: String,
    pub date: NaiveDate,
    pub departure_time_local: NaiveTime,
    pub landing_time_local: NaiveTime,
    pub capacity: Option<i32>,
    #[validate(range(min = 0, message = "Remaining Tickets must not be negative"))]
    pub remaining_tickets: i32,
    /// Moving a scheduled flight to CANCELLED or COMPLETED applies the same
    /// ticket cascade as the dedicated endpoints. Finished flights stay finished.
    #[serde(default)]
    pub flight_status: Option<FlightStatus>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FlightSearchQuery {
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightSearchResponse {
    pub flights: Vec<Flight>,
}

// Result of cancelling or completing a flight
#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightStatusChange {
    pub flight: Flight,
    pub affected_tickets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UpdateAirlineRequest {
    #[validate(length(min = 1, message = "Airline Name is required"))]
    pub airline_name: String,
    #[validate(length(min = 1, message = "Airport Base is required"))]
    pub airport_base: String,
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    /// Leaves the stored password untouched when absent.
    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UpdateAirportRequest {
    #[validate(length(min = 1, message = "Airport Name is required"))]
    pub airport_name: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[validate(length(min = 1, message = "Time Zone is required"))]
    pub time_zone: String,
}
