//! In-process store backing every repository trait.
//!
//! A single `RwLock` guards all tables, so each trait method is atomic with
//! respect to every other one, mirroring a single-statement database write.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{
    AdministratorRepository, AirlineRepository, AirportRepository, CustomerRepository,
    FlightRepository, TicketRepository,
};
use crate::models::flight::{Airline, Airport, Flight, FlightStatus, NewFlight};
use crate::models::ticket::{BookingStatus, Ticket};
use crate::models::user::{Administrator, Customer, NewAdministrator, NewCustomer};
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    flights: BTreeMap<i64, Flight>,
    last_flight_id: i64,
    tickets: BTreeMap<String, Ticket>,
    customers: BTreeMap<i64, Customer>,
    last_customer_id: i64,
    airlines: BTreeMap<String, Airline>,
    airports: BTreeMap<String, Airport>,
    administrators: BTreeMap<i64, Administrator>,
    last_admin_id: i64,
}

#[async_trait]
impl FlightRepository for InMemoryStore {
    async fn insert(&self, flight: NewFlight) -> AppResult<Flight> {
        let mut tables = self.tables.write().await;
        tables.last_flight_id += 1;
        let flight = Flight {
            id: tables.last_flight_id,
            flight_number: flight.flight_number,
            airline_code: flight.airline_code,
            origin_airport: flight.origin_airport,
            destination_airport: flight.destination_airport,
            date: flight.date,
            departure_time_local: flight.departure_time_local,
            landing_time_local: flight.landing_time_local,
            capacity: flight.capacity,
            remaining_tickets: flight.remaining_tickets,
            flight_status: flight.flight_status,
            version: 0,
        };
        tables.flights.insert(flight.id, flight.clone());
        Ok(flight)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Flight>> {
        Ok(self.tables.read().await.flights.get(&id).cloned())
    }

    async fn find_by_number_and_date(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> AppResult<Option<Flight>> {
        let tables = self.tables.read().await;
        Ok(tables
            .flights
            .values()
            .find(|f| f.flight_number == flight_number && f.date == date)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Flight>> {
        Ok(self.tables.read().await.flights.values().cloned().collect())
    }

    async fn find_by_status(&self, status: FlightStatus) -> AppResult<Vec<Flight>> {
        let tables = self.tables.read().await;
        Ok(tables
            .flights
            .values()
            .filter(|f| f.flight_status == status)
            .cloned()
            .collect())
    }

    async fn find_by_airline(&self, airline_code: &str) -> AppResult<Vec<Flight>> {
        let tables = self.tables.read().await;
        Ok(tables
            .flights
            .values()
            .filter(|f| f.airline_code == airline_code)
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        origin: &str,
        destination: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Flight>> {
        let tables = self.tables.read().await;
        let mut flights: Vec<Flight> = tables
            .flights
            .values()
            .filter(|f| {
                f.flight_status == FlightStatus::Scheduled
                    && f.origin_airport == origin
                    && f.destination_airport == destination
                    && f.date >= from
                    && f.date <= to
            })
            .cloned()
            .collect();
        flights.sort_by_key(|f| (f.date, f.departure_time_local));
        Ok(flights)
    }

    async fn update(&self, flight: &Flight) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .flights
            .get_mut(&flight.id)
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))?;
        let version = stored.version + 1;
        let flight_status = stored.flight_status;
        *stored = Flight {
            version,
            flight_status,
            ..flight.clone()
        };
        Ok(())
    }

    async fn compare_and_set_remaining(
        &self,
        id: i64,
        expected_version: i32,
        remaining_tickets: i32,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.flights.get_mut(&id) {
            Some(flight) if flight.version == expected_version => {
                flight.remaining_tickets = remaining_tickets;
                flight.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status(&self, id: i64, status: FlightStatus) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.flights.get_mut(&id) {
            Some(flight) => {
                flight.flight_status = status;
                flight.version += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.flights.remove(&id).is_some();
        if removed {
            tables.tickets.retain(|_, t| t.flight_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert(&self, ticket: &Ticket) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.tickets.contains_key(&ticket.ticket_id) {
            return Err(AppError::Conflict(format!(
                "Ticket {} already exists",
                ticket.ticket_id
            )));
        }
        tables
            .tickets
            .insert(ticket.ticket_id.clone(), ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, ticket_id: &str) -> AppResult<Option<Ticket>> {
        Ok(self.tables.read().await.tickets.get(ticket_id).cloned())
    }

    async fn exists(&self, ticket_id: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.tickets.contains_key(ticket_id))
    }

    async fn find_all(&self) -> AppResult<Vec<Ticket>> {
        Ok(self.tables.read().await.tickets.values().cloned().collect())
    }

    async fn find_by_customer(&self, customer_id: i64) -> AppResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_by_flight(&self, flight_id: i64) -> AppResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.flight_id == flight_id)
            .cloned()
            .collect())
    }

    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Ticket>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.booking_status == BookingStatus::Pending && t.created_at < cutoff)
            .cloned()
            .collect())
    }

    async fn update(&self, ticket: &Ticket) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .tickets
            .get_mut(&ticket.ticket_id)
            .ok_or_else(|| AppError::NotFound("Ticket not found".into()))?;
        *stored = Ticket {
            booking_status: stored.booking_status,
            ..ticket.clone()
        };
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        ticket_id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.tickets.get_mut(ticket_id) {
            Some(ticket) if ticket.booking_status == expected => {
                ticket.booking_status = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, ticket_id: &str) -> AppResult<bool> {
        Ok(self.tables.write().await.tickets.remove(ticket_id).is_some())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn insert(&self, customer: NewCustomer) -> AppResult<Customer> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .values()
            .any(|c| c.username == customer.username)
        {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        tables.last_customer_id += 1;
        let customer = Customer {
            customer_id: tables.last_customer_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            address: customer.address,
            phone_number: customer.phone_number,
            credit_card_number: customer.credit_card_number,
            username: customer.username,
            password_hash: customer.password_hash,
        };
        tables
            .customers
            .insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, customer_id: i64) -> AppResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(&customer_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .values()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Customer>> {
        Ok(self.tables.read().await.customers.values().cloned().collect())
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .values()
            .any(|c| c.username == customer.username && c.customer_id != customer.customer_id)
        {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        let stored = tables
            .customers
            .get_mut(&customer.customer_id)
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;
        *stored = customer.clone();
        Ok(())
    }
}

#[async_trait]
impl AirlineRepository for InMemoryStore {
    async fn insert(&self, airline: &Airline) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.airlines.contains_key(&airline.iata_code) {
            return Err(AppError::Conflict(format!(
                "Airline {} already exists",
                airline.iata_code
            )));
        }
        tables
            .airlines
            .insert(airline.iata_code.clone(), airline.clone());
        Ok(())
    }

    async fn find_by_code(&self, iata_code: &str) -> AppResult<Option<Airline>> {
        Ok(self.tables.read().await.airlines.get(iata_code).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Airline>> {
        let tables = self.tables.read().await;
        Ok(tables
            .airlines
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Airline>> {
        Ok(self.tables.read().await.airlines.values().cloned().collect())
    }

    async fn update(&self, airline: &Airline) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .airlines
            .get_mut(&airline.iata_code)
            .ok_or_else(|| AppError::NotFound("Airline not found".into()))?;
        *stored = airline.clone();
        Ok(())
    }
}

#[async_trait]
impl AirportRepository for InMemoryStore {
    async fn insert(&self, airport: &Airport) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.airports.contains_key(&airport.airport_code) {
            return Err(AppError::Conflict(format!(
                "Airport {} already exists",
                airport.airport_code
            )));
        }
        tables
            .airports
            .insert(airport.airport_code.clone(), airport.clone());
        Ok(())
    }

    async fn find_by_code(&self, airport_code: &str) -> AppResult<Option<Airport>> {
        Ok(self.tables.read().await.airports.get(airport_code).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Airport>> {
        Ok(self.tables.read().await.airports.values().cloned().collect())
    }

    async fn update(&self, airport: &Airport) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .airports
            .get_mut(&airport.airport_code)
            .ok_or_else(|| AppError::NotFound("Airport not found".into()))?;
        *stored = airport.clone();
        Ok(())
    }
}

#[async_trait]
impl AdministratorRepository for InMemoryStore {
    async fn insert(&self, administrator: NewAdministrator) -> AppResult<Administrator> {
        let mut tables = self.tables.write().await;
        if tables
            .administrators
            .values()
            .any(|a| a.username == administrator.username)
        {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        tables.last_admin_id += 1;
        let administrator = Administrator {
            admin_id: tables.last_admin_id,
            first_name: administrator.first_name,
            last_name: administrator.last_name,
            username: administrator.username,
            password_hash: administrator.password_hash,
        };
        tables
            .administrators
            .insert(administrator.admin_id, administrator.clone());
        Ok(administrator)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Administrator>> {
        let tables = self.tables.read().await;
        Ok(tables
            .administrators
            .values()
            .find(|a| a.username == username)
            .cloned())
    }
}
