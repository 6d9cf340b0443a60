//! Persistence seams.
//!
//! One trait per entity. Services only ever hold `Arc<dyn ...Repository>`, so
//! the MySQL backend and the in-memory backend are interchangeable.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use crate::models::flight::{Airline, Airport, Flight, FlightStatus, NewFlight};
use crate::models::ticket::{BookingStatus, Ticket};
use crate::models::user::{Administrator, Customer, NewAdministrator, NewCustomer};
use crate::utils::error::AppResult;

#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn insert(&self, flight: NewFlight) -> AppResult<Flight>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Flight>>;
    async fn find_by_number_and_date(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> AppResult<Option<Flight>>;
    async fn find_all(&self) -> AppResult<Vec<Flight>>;
    async fn find_by_status(&self, status: FlightStatus) -> AppResult<Vec<Flight>>;
    async fn find_by_airline(&self, airline_code: &str) -> AppResult<Vec<Flight>>;
    /// SCHEDULED flights between two airports departing within `[from, to]`.
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Flight>>;
    /// Unconditional save of the flight's details; bumps the version.
    /// The status column is left alone, it only moves through `set_status`.
    async fn update(&self, flight: &Flight) -> AppResult<()>;
    /// Sets `remaining_tickets` only if the stored version still equals
    /// `expected_version`. Returns whether the write happened.
    async fn compare_and_set_remaining(
        &self,
        id: i64,
        expected_version: i32,
        remaining_tickets: i32,
    ) -> AppResult<bool>;
    async fn set_status(&self, id: i64, status: FlightStatus) -> AppResult<bool>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fails with `Conflict` when the ticket id is already taken.
    async fn insert(&self, ticket: &Ticket) -> AppResult<()>;
    async fn find_by_id(&self, ticket_id: &str) -> AppResult<Option<Ticket>>;
    async fn exists(&self, ticket_id: &str) -> AppResult<bool>;
    async fn find_all(&self) -> AppResult<Vec<Ticket>>;
    async fn find_by_customer(&self, customer_id: i64) -> AppResult<Vec<Ticket>>;
    async fn find_by_flight(&self, flight_id: i64) -> AppResult<Vec<Ticket>>;
    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Ticket>>;
    /// Unconditional save of every column except the status.
    async fn update(&self, ticket: &Ticket) -> AppResult<()>;
    /// Moves the ticket to `next` only if it is currently in `expected`.
    async fn compare_and_set_status(
        &self,
        ticket_id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<bool>;
    async fn delete(&self, ticket_id: &str) -> AppResult<bool>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fails with `Conflict` when the username is already taken.
    async fn insert(&self, customer: NewCustomer) -> AppResult<Customer>;
    async fn find_by_id(&self, customer_id: i64) -> AppResult<Option<Customer>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Customer>>;
    async fn find_all(&self) -> AppResult<Vec<Customer>>;
    async fn update(&self, customer: &Customer) -> AppResult<()>;
}

#[async_trait]
pub trait AirlineRepository: Send + Sync {
    async fn insert(&self, airline: &Airline) -> AppResult<()>;
    async fn find_by_code(&self, iata_code: &str) -> AppResult<Option<Airline>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Airline>>;
    async fn find_all(&self) -> AppResult<Vec<Airline>>;
    async fn update(&self, airline: &Airline) -> AppResult<()>;
}

#[async_trait]
pub trait AirportRepository: Send + Sync {
    async fn insert(&self, airport: &Airport) -> AppResult<()>;
    async fn find_by_code(&self, airport_code: &str) -> AppResult<Option<Airport>>;
    async fn find_all(&self) -> AppResult<Vec<Airport>>;
    async fn update(&self, airport: &Airport) -> AppResult<()>;
}

#[async_trait]
pub trait AdministratorRepository: Send + Sync {
    async fn insert(&self, administrator: NewAdministrator) -> AppResult<Administrator>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Administrator>>;
}

/// Every repository the services need, wired once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub flights: Arc<dyn FlightRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub airlines: Arc<dyn AirlineRepository>,
    pub airports: Arc<dyn AirportRepository>,
    pub administrators: Arc<dyn AdministratorRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::InMemoryStore::default());
        Repositories {
            flights: store.clone(),
            tickets: store.clone(),
            customers: store.clone(),
            airlines: store.clone(),
            airports: store.clone(),
            administrators: store,
        }
    }

    pub fn mysql(pool: sqlx::MySqlPool) -> Self {
        let store = Arc::new(mysql::MySqlStore::new(pool));
        Repositories {
            flights: store.clone(),
            tickets: store.clone(),
            customers: store.clone(),
            airlines: store.clone(),
            airports: store.clone(),
            administrators: store,
        }
    }
}
