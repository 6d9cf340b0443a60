use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use std::str::FromStr;

use super::{
    AdministratorRepository, AirlineRepository, AirportRepository, CustomerRepository,
    FlightRepository, TicketRepository,
};
use crate::models::flight::{Airline, Airport, Flight, FlightStatus, NewFlight};
use crate::models::ticket::{BookingStatus, ClassType, Ticket};
use crate::models::user::{Administrator, Customer, NewAdministrator, NewCustomer};
use crate::utils::error::{AppError, AppResult};

// MySQL error code for a duplicate key
const ER_DUP_ENTRY: &str = "23000";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlStore { pool }
    }
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::DatabaseError(format!("unexpected {column} value {value}")))
}

// Translate unique-key violations into a conflict the caller can act on
fn conflict_on_duplicate(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(ER_DUP_ENTRY) => {
            AppError::Conflict(message.to_string())
        }
        _ => err.into(),
    }
}

const FLIGHT_COLUMNS: &str = "id, flight_number, airline_code, origin_airport, destination_airport, \
     flight_date, departure_time_local, landing_time_local, capacity, remaining_tickets, \
     flight_status, version";

#[derive(Debug, sqlx::FromRow)]
struct FlightRow {
    id: i64,
    flight_number: String,
    airline_code: String,
    origin_airport: String,
    destination_airport: String,
    flight_date: NaiveDate,
    departure_time_local: NaiveTime,
    landing_time_local: NaiveTime,
    capacity: i32,
    remaining_tickets: i32,
    flight_status: String,
    version: i32,
}

impl TryFrom<FlightRow> for Flight {
    type Error = AppError;

    fn try_from(row: FlightRow) -> AppResult<Self> {
        Ok(Flight {
            id: row.id,
            flight_number: row.flight_number,
            airline_code: row.airline_code,
            origin_airport: row.origin_airport,
            destination_airport: row.destination_airport,
            date: row.flight_date,
            departure_time_local: row.departure_time_local,
            landing_time_local: row.landing_time_local,
            capacity: row.capacity,
            remaining_tickets: row.remaining_tickets,
            flight_status: parse_column("flight_status", &row.flight_status)?,
            version: row.version,
        })
    }
}

fn into_flights(rows: Vec<FlightRow>) -> AppResult<Vec<Flight>> {
    rows.into_iter().map(Flight::try_from).collect()
}

#[async_trait]
impl FlightRepository for MySqlStore {
    async fn insert(&self, flight: NewFlight) -> AppResult<Flight> {
        let result = sqlx::query(
            r#"
            INSERT INTO flight (flight_number, airline_code, origin_airport, destination_airport,
                flight_date, departure_time_local, landing_time_local, capacity, remaining_tickets,
                flight_status, version)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.airline_code)
        .bind(&flight.origin_airport)
        .bind(&flight.destination_airport)
        .bind(flight.date)
        .bind(flight.departure_time_local)
        .bind(flight.landing_time_local)
        .bind(flight.capacity)
        .bind(flight.remaining_tickets)
        .bind(flight.flight_status.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Flight {
            id: result.last_insert_id() as i64,
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
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Flight>> {
        sqlx::query_as::<_, FlightRow>(&format!("SELECT {FLIGHT_COLUMNS} FROM flight WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Flight::try_from)
            .transpose()
    }

    async fn find_by_number_and_date(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> AppResult<Option<Flight>> {
        sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flight WHERE flight_number = ? AND flight_date = ?"
        ))
        .bind(flight_number)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?
        .map(Flight::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flight ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_flights(rows)
    }

    async fn find_by_status(&self, status: FlightStatus) -> AppResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flight WHERE flight_status = ? ORDER BY flight_date, departure_time_local"
        ))
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;
        into_flights(rows)
    }

    async fn find_by_airline(&self, airline_code: &str) -> AppResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flight WHERE airline_code = ? ORDER BY flight_date, departure_time_local"
        ))
        .bind(airline_code)
        .fetch_all(&self.pool)
        .await?;
        into_flights(rows)
    }

    async fn search(
        &self,
        origin: &str,
        destination: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            r#"
            SELECT {FLIGHT_COLUMNS}
            FROM flight
            WHERE origin_airport = ?
            AND destination_airport = ?
            AND flight_date BETWEEN ? AND ?
            AND flight_status = 'SCHEDULED'
            ORDER BY flight_date, departure_time_local
            "#
        ))
        .bind(origin)
        .bind(destination)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        into_flights(rows)
    }

    async fn update(&self, flight: &Flight) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE flight
            SET flight_number = ?,
                airline_code = ?,
                origin_airport = ?,
                destination_airport = ?,
                flight_date = ?,
                departure_time_local = ?,
                landing_time_local = ?,
                capacity = ?,
                remaining_tickets = ?,
                version = version + 1
            WHERE id = ?
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.airline_code)
        .bind(&flight.origin_airport)
        .bind(&flight.destination_airport)
        .bind(flight.date)
        .bind(flight.departure_time_local)
        .bind(flight.landing_time_local)
        .bind(flight.capacity)
        .bind(flight.remaining_tickets)
        .bind(flight.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Flight not found".into()));
        }
        Ok(())
    }

    async fn compare_and_set_remaining(
        &self,
        id: i64,
        expected_version: i32,
        remaining_tickets: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE flight
            SET remaining_tickets = ?,
                version = version + 1
            WHERE id = ?
            AND version = ?
            "#,
        )
        .bind(remaining_tickets)
        .bind(id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_status(&self, id: i64, status: FlightStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE flight SET flight_status = ?, version = version + 1 WHERE id = ?",
        )
        .bind(status.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        // ticket rows go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM flight WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

const TICKET_COLUMNS: &str =
    "ticket_id, customer_id, flight_id, class_type, seat_number, booking_status, price, created_at";

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    ticket_id: String,
    customer_id: i64,
    flight_id: i64,
    class_type: String,
    seat_number: String,
    booking_status: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> AppResult<Self> {
        Ok(Ticket {
            ticket_id: row.ticket_id,
            customer_id: row.customer_id,
            flight_id: row.flight_id,
            class_type: parse_column::<ClassType>("class_type", &row.class_type)?,
            seat_number: row.seat_number,
            booking_status: parse_column::<BookingStatus>("booking_status", &row.booking_status)?,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

fn into_tickets(rows: Vec<TicketRow>) -> AppResult<Vec<Ticket>> {
    rows.into_iter().map(Ticket::try_from).collect()
}

#[async_trait]
impl TicketRepository for MySqlStore {
    async fn insert(&self, ticket: &Ticket) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO ticket ({TICKET_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&ticket.ticket_id)
        .bind(ticket.customer_id)
        .bind(ticket.flight_id)
        .bind(ticket.class_type.to_string())
        .bind(&ticket.seat_number)
        .bind(ticket.booking_status.to_string())
        .bind(ticket.price)
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Ticket id already exists"))?;
        Ok(())
    }

    async fn find_by_id(&self, ticket_id: &str) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket WHERE ticket_id = ?"
        ))
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Ticket::try_from)
        .transpose()
    }

    async fn exists(&self, ticket_id: &str) -> AppResult<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT ticket_id FROM ticket WHERE ticket_id = ?")
                .bind(ticket_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn find_all(&self) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_tickets(rows)
    }

    async fn find_by_customer(&self, customer_id: i64) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket WHERE customer_id = ? ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        into_tickets(rows)
    }

    async fn find_by_flight(&self, flight_id: i64) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket WHERE flight_id = ?"
        ))
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;
        into_tickets(rows)
    }

    async fn find_pending_created_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket WHERE booking_status = 'PENDING' AND created_at < ?"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        into_tickets(rows)
    }

    async fn update(&self, ticket: &Ticket) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE ticket
            SET customer_id = ?,
                flight_id = ?,
                class_type = ?,
                seat_number = ?,
                price = ?
            WHERE ticket_id = ?
            "#,
        )
        .bind(ticket.customer_id)
        .bind(ticket.flight_id)
        .bind(ticket.class_type.to_string())
        .bind(&ticket.seat_number)
        .bind(ticket.price)
        .bind(&ticket.ticket_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 && !self.exists(&ticket.ticket_id).await? {
            return Err(AppError::NotFound("Ticket not found".into()));
        }
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        ticket_id: &str,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE ticket SET booking_status = ? WHERE ticket_id = ? AND booking_status = ?",
        )
        .bind(next.to_string())
        .bind(ticket_id)
        .bind(expected.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, ticket_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ticket WHERE ticket_id = ?")
            .bind(ticket_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

const CUSTOMER_COLUMNS: &str = "customer_id, first_name, last_name, address, phone_number, \
     credit_card_number, username, password";

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    first_name: String,
    last_name: String,
    address: String,
    phone_number: String,
    credit_card_number: String,
    username: String,
    password: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            customer_id: row.customer_id,
            first_name: row.first_name,
            last_name: row.last_name,
            address: row.address,
            phone_number: row.phone_number,
            credit_card_number: row.credit_card_number,
            username: row.username,
            password_hash: row.password,
        }
    }
}

#[async_trait]
impl CustomerRepository for MySqlStore {
    async fn insert(&self, customer: NewCustomer) -> AppResult<Customer> {
        let result = sqlx::query(
            r#"
            INSERT INTO customer (first_name, last_name, address, phone_number,
                credit_card_number, username, password)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.address)
        .bind(&customer.phone_number)
        .bind(&customer.credit_card_number)
        .bind(&customer.username)
        .bind(&customer.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username already exists"))?;

        Ok(Customer {
            customer_id: result.last_insert_id() as i64,
            first_name: customer.first_name,
            last_name: customer.last_name,
            address: customer.address,
            phone_number: customer.phone_number,
            credit_card_number: customer.credit_card_number,
            username: customer.username,
            password_hash: customer.password_hash,
        })
    }

    async fn find_by_id(&self, customer_id: i64) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = ?"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY customer_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE customer
            SET first_name = ?,
                last_name = ?,
                address = ?,
                phone_number = ?,
                credit_card_number = ?,
                username = ?,
                password = ?
            WHERE customer_id = ?
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.address)
        .bind(&customer.phone_number)
        .bind(&customer.credit_card_number)
        .bind(&customer.username)
        .bind(&customer.password_hash)
        .bind(customer.customer_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username already exists"))?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AirlineRow {
    iata_code: String,
    airline_name: String,
    airport_base: String,
    username: String,
    password: String,
}

impl From<AirlineRow> for Airline {
    fn from(row: AirlineRow) -> Self {
        Airline {
            iata_code: row.iata_code,
            airline_name: row.airline_name,
            airport_base: row.airport_base,
            username: row.username,
            password_hash: row.password,
        }
    }
}

#[async_trait]
impl AirlineRepository for MySqlStore {
    async fn insert(&self, airline: &Airline) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO airline (iata_code, airline_name, airport_base, username, password) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&airline.iata_code)
        .bind(&airline.airline_name)
        .bind(&airline.airport_base)
        .bind(&airline.username)
        .bind(&airline.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Airline already exists"))?;
        Ok(())
    }

    async fn find_by_code(&self, iata_code: &str) -> AppResult<Option<Airline>> {
        let row = sqlx::query_as::<_, AirlineRow>(
            "SELECT iata_code, airline_name, airport_base, username, password FROM airline WHERE iata_code = ?",
        )
        .bind(iata_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Airline::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Airline>> {
        let row = sqlx::query_as::<_, AirlineRow>(
            "SELECT iata_code, airline_name, airport_base, username, password FROM airline WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Airline::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Airline>> {
        let rows = sqlx::query_as::<_, AirlineRow>(
            "SELECT iata_code, airline_name, airport_base, username, password FROM airline ORDER BY iata_code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Airline::from).collect())
    }

    async fn update(&self, airline: &Airline) -> AppResult<()> {
        sqlx::query(
            "UPDATE airline SET airline_name = ?, airport_base = ?, username = ?, password = ? WHERE iata_code = ?",
        )
        .bind(&airline.airline_name)
        .bind(&airline.airport_base)
        .bind(&airline.username)
        .bind(&airline.password_hash)
        .bind(&airline.iata_code)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username already exists"))?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AirportRow {
    airport_code: String,
    airport_name: String,
    city: String,
    country: String,
    latitude: f64,
    longitude: f64,
    time_zone: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport {
            airport_code: row.airport_code,
            airport_name: row.airport_name,
            city: row.city,
            country: row.country,
            latitude: row.latitude,
            longitude: row.longitude,
            time_zone: row.time_zone,
        }
    }
}

const AIRPORT_COLUMNS: &str = "airport_code, airport_name, city, country, latitude, longitude, time_zone";

#[async_trait]
impl AirportRepository for MySqlStore {
    async fn insert(&self, airport: &Airport) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO airport ({AIRPORT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&airport.airport_code)
        .bind(&airport.airport_name)
        .bind(&airport.city)
        .bind(&airport.country)
        .bind(airport.latitude)
        .bind(airport.longitude)
        .bind(&airport.time_zone)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Airport already exists"))?;
        Ok(())
    }

    async fn find_by_code(&self, airport_code: &str) -> AppResult<Option<Airport>> {
        let row = sqlx::query_as::<_, AirportRow>(&format!(
            "SELECT {AIRPORT_COLUMNS} FROM airport WHERE airport_code = ?"
        ))
        .bind(airport_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Airport::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Airport>> {
        let rows = sqlx::query_as::<_, AirportRow>(&format!(
            "SELECT {AIRPORT_COLUMNS} FROM airport ORDER BY airport_code"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Airport::from).collect())
    }

    async fn update(&self, airport: &Airport) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE airport
            SET airport_name = ?, city = ?, country = ?, latitude = ?, longitude = ?, time_zone = ?
            WHERE airport_code = ?
            "#,
        )
        .bind(&airport.airport_name)
        .bind(&airport.city)
        .bind(&airport.country)
        .bind(airport.latitude)
        .bind(airport.longitude)
        .bind(&airport.time_zone)
        .bind(&airport.airport_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AdministratorRow {
    admin_id: i64,
    first_name: String,
    last_name: String,
    username: String,
    password: String,
}

#[async_trait]
impl AdministratorRepository for MySqlStore {
    async fn insert(&self, administrator: NewAdministrator) -> AppResult<Administrator> {
        let result = sqlx::query(
            "INSERT INTO administrator (first_name, last_name, username, password) VALUES (?, ?, ?, ?)",
        )
        .bind(&administrator.first_name)
        .bind(&administrator.last_name)
        .bind(&administrator.username)
        .bind(&administrator.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Username already exists"))?;

        Ok(Administrator {
            admin_id: result.last_insert_id() as i64,
            first_name: administrator.first_name,
            last_name: administrator.last_name,
            username: administrator.username,
            password_hash: administrator.password_hash,
        })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Administrator>> {
        let row = sqlx::query_as::<_, AdministratorRow>(
            "SELECT admin_id, first_name, last_name, username, password FROM administrator WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Administrator {
            admin_id: row.admin_id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            password_hash: row.password,
        }))
    }
}
