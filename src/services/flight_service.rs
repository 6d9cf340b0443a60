use crate::models::flight::{
    Flight, FlightSearchQuery, FlightSearchResponse, FlightStatus, FlightStatusChange, NewFlight,
    NewFlightRequest, UpdateFlightRequest,
};
use crate::models::ticket::BookingStatus;
use crate::repositories::Repositories;
use crate::utils::error::{AppError, AppResult};
use validator::Validate;

// Attempts at moving one ticket before a cascade gives up on it
const CASCADE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct FlightService {
    repos: Repositories,
}

impl FlightService {
    pub fn new(repos: Repositories) -> Self {
        FlightService { repos }
    }

    // Flights that can still be booked, soonest first
    pub async fn list_scheduled(&self) -> AppResult<Vec<Flight>> {
        let mut flights = self.repos.flights.find_by_status(FlightStatus::Scheduled).await?;
        flights.sort_by_key(|f| (f.date, f.departure_time_local));
        Ok(flights)
    }

    // Search scheduled flights on a single date, or a date range when an end date is given
    pub async fn search_flights(
        &self,
        search_query: FlightSearchQuery,
    ) -> AppResult<FlightSearchResponse> {
        let end_date = search_query.end_date.unwrap_or(search_query.departure_date);
        if end_date < search_query.departure_date {
            return Err(AppError::BadRequest(
                "End date must not be before departure date".into(),
            ));
        }

        let flights = self
            .repos
            .flights
            .search(
                &search_query.origin_airport,
                &search_query.destination_airport,
                search_query.departure_date,
                end_date,
            )
            .await?;

        Ok(FlightSearchResponse { flights })
    }

    pub async fn get_flight(&self, flight_id: i64) -> AppResult<Flight> {
        self.repos
            .flights
            .find_by_id(flight_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    pub async fn list_airline_flights(&self, airline_code: &str) -> AppResult<Vec<Flight>> {
        self.repos.flights.find_by_airline(airline_code).await
    }

    async fn check_route(&self, origin: &str, destination: &str) -> AppResult<()> {
        if origin == destination {
            return Err(AppError::ValidationError(
                "Origin and destination airports must differ".into(),
            ));
        }
        for code in [origin, destination] {
            if self.repos.airports.find_by_code(code).await?.is_none() {
                return Err(AppError::NotFound(format!("Airport {code} not found")));
            }
        }
        Ok(())
    }

    fn check_seats(capacity: i32, remaining_tickets: i32) -> AppResult<()> {
        if capacity < 0 || remaining_tickets < 0 || remaining_tickets > capacity {
            return Err(AppError::ValidationError(
                "Remaining tickets must be between 0 and the flight capacity".into(),
            ));
        }
        Ok(())
    }

    // Load a flight and make sure the caller may manage it
    async fn owned_flight(&self, flight_id: i64, owner: Option<&str>) -> AppResult<Flight> {
        let flight = self.get_flight(flight_id).await?;
        if let Some(airline_code) = owner {
            if flight.airline_code != airline_code {
                return Err(AppError::Forbidden(format!(
                    "Flight {} is operated by another airline",
                    flight.flight_number
                )));
            }
        }
        Ok(flight)
    }

    /// Adds a SCHEDULED flight operated by `airline_code`.
    pub async fn create_flight(
        &self,
        airline_code: &str,
        request: NewFlightRequest,
    ) -> AppResult<Flight> {
        request.validate()?;

        if self.repos.airlines.find_by_code(airline_code).await?.is_none() {
            return Err(AppError::NotFound(format!("Airline {airline_code} not found")));
        }
        self.check_route(&request.origin_airport, &request.destination_airport)
            .await?;

        let capacity = request.capacity.unwrap_or(request.remaining_tickets);
        Self::check_seats(capacity, request.remaining_tickets)?;

        let flight = self
            .repos
            .flights
            .insert(NewFlight {
                flight_number: request.flight_number,
                airline_code: airline_code.to_string(),
                origin_airport: request.origin_airport,
                destination_airport: request.destination_airport,
                date: request.date,
                departure_time_local: request.departure_time_local,
                landing_time_local: request.landing_time_local,
                capacity,
                remaining_tickets: request.remaining_tickets,
                flight_status: FlightStatus::Scheduled,
            })
            .await?;

        tracing::info!(
            flight_id = flight.id,
            flight_number = %flight.flight_number,
            airline = %flight.airline_code,
            "flight added"
        );
        Ok(flight)
    }

    /// Overwrites a flight's details. A requested status change is applied
    /// through `cancel_flight` or `complete_flight` so tickets follow the flight.
    pub async fn update_flight(
        &self,
        flight_id: i64,
        owner: Option<&str>,
        request: UpdateFlightRequest,
    ) -> AppResult<Flight> {
        request.validate()?;
        let existing = self.owned_flight(flight_id, owner).await?;

        let status_change = request
            .flight_status
            .filter(|status| *status != existing.flight_status);
        if status_change.is_some() && !existing.is_scheduled() {
            return Err(AppError::Conflict(format!(
                "Flight {} is already {}",
                existing.flight_number, existing.flight_status
            )));
        }

        self.check_route(&request.origin_airport, &request.destination_airport)
            .await?;
        let capacity = request.capacity.unwrap_or(existing.capacity);
        Self::check_seats(capacity, request.remaining_tickets)?;

        let updated = Flight {
            flight_number: request.flight_number,
            origin_airport: request.origin_airport,
            destination_airport: request.destination_airport,
            date: request.date,
            departure_time_local: request.departure_time_local,
            landing_time_local: request.landing_time_local,
            capacity,
            remaining_tickets: request.remaining_tickets,
            ..existing
        };
        self.repos.flights.update(&updated).await?;
        tracing::info!(flight_id, "flight details updated");

        match status_change {
            Some(FlightStatus::Cancelled) => Ok(self.cancel_flight(flight_id, owner).await?.flight),
            Some(FlightStatus::Completed) => Ok(self.complete_flight(flight_id, owner).await?.flight),
            _ => self.get_flight(flight_id).await,
        }
    }

    /// Cancels a scheduled flight and every live ticket on it.
    pub async fn cancel_flight(
        &self,
        flight_id: i64,
        owner: Option<&str>,
    ) -> AppResult<FlightStatusChange> {
        let flight = self.owned_flight(flight_id, owner).await?;
        if !flight.is_scheduled() {
            return Err(AppError::Conflict(format!(
                "Flight {} is already {}",
                flight.flight_number, flight.flight_status
            )));
        }

        self.repos
            .flights
            .set_status(flight_id, FlightStatus::Cancelled)
            .await?;

        let affected_tickets = self
            .cascade_tickets(flight_id, |status| !status.is_terminal(), BookingStatus::Cancelled)
            .await?;

        tracing::info!(
            flight_id,
            tickets = affected_tickets.len(),
            "flight cancelled, tickets cancelled with it"
        );

        Ok(FlightStatusChange {
            flight: self.get_flight(flight_id).await?,
            affected_tickets,
        })
    }

    /// Marks a scheduled flight as flown; checked-in tickets complete with it.
    pub async fn complete_flight(
        &self,
        flight_id: i64,
        owner: Option<&str>,
    ) -> AppResult<FlightStatusChange> {
        let flight = self.owned_flight(flight_id, owner).await?;
        if !flight.is_scheduled() {
            return Err(AppError::Conflict(format!(
                "Flight {} is already {}",
                flight.flight_number, flight.flight_status
            )));
        }

        self.repos
            .flights
            .set_status(flight_id, FlightStatus::Completed)
            .await?;

        let affected_tickets = self
            .cascade_tickets(
                flight_id,
                |status| status == BookingStatus::CheckedIn,
                BookingStatus::Completed,
            )
            .await?;

        tracing::info!(flight_id, tickets = affected_tickets.len(), "flight completed");

        Ok(FlightStatusChange {
            flight: self.get_flight(flight_id).await?,
            affected_tickets,
        })
    }

    // Move every matching ticket of a flight to `next`, tolerating concurrent status changes
    async fn cascade_tickets(
        &self,
        flight_id: i64,
        applies: impl Fn(BookingStatus) -> bool,
        next: BookingStatus,
    ) -> AppResult<Vec<String>> {
        let mut moved = Vec::new();

        for ticket in self.repos.tickets.find_by_flight(flight_id).await? {
            let mut current = ticket.booking_status;
            for _ in 0..CASCADE_ATTEMPTS {
                if !applies(current) || !current.can_transition_to(next) {
                    break;
                }
                if self
                    .repos
                    .tickets
                    .compare_and_set_status(&ticket.ticket_id, current, next)
                    .await?
                {
                    moved.push(ticket.ticket_id.clone());
                    break;
                }
                match self.repos.tickets.find_by_id(&ticket.ticket_id).await? {
                    Some(latest) => current = latest.booking_status,
                    None => break,
                }
            }
        }

        Ok(moved)
    }

    pub async fn delete_flight(&self, flight_id: i64) -> AppResult<()> {
        if !self.repos.flights.delete(flight_id).await? {
            return Err(AppError::NotFound("Flight not found".into()));
        }
        tracing::info!(flight_id, "flight deleted");
        Ok(())
    }
}
