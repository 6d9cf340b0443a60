use std::sync::Arc;

use crate::models::flight::Flight;
use crate::repositories::FlightRepository;
use crate::utils::error::{AppError, AppResult};

/// Seat accounting for flights.
///
/// `remaining_tickets` is only ever changed through a version-checked
/// compare-and-swap, so concurrent bookings cannot drive it below zero.
#[derive(Clone)]
pub struct InventoryService {
    flights: Arc<dyn FlightRepository>,
    max_retries: u32,
}

impl InventoryService {
    pub fn new(flights: Arc<dyn FlightRepository>, max_retries: u32) -> Self {
        InventoryService {
            flights,
            max_retries: max_retries.max(1),
        }
    }

    async fn load(&self, flight_id: i64) -> AppResult<Flight> {
        self.flights
            .find_by_id(flight_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    /// Takes one seat from a scheduled flight and returns the flight as written.
    pub async fn reserve_seat(&self, flight_id: i64) -> AppResult<Flight> {
        let mut retries = 0;

        while retries < self.max_retries {
            let flight = self.load(flight_id).await?;

            if !flight.is_scheduled() {
                return Err(AppError::Conflict(format!(
                    "Flight {} is {}",
                    flight.flight_number, flight.flight_status
                )));
            }
            if !flight.has_seats() {
                return Err(AppError::Conflict(format!(
                    "No seats remaining on flight {}",
                    flight.flight_number
                )));
            }

            let remaining = flight.remaining_tickets - 1;
            if self
                .flights
                .compare_and_set_remaining(flight.id, flight.version, remaining)
                .await?
            {
                tracing::debug!(flight_id, remaining, "seat reserved");
                return Ok(Flight {
                    remaining_tickets: remaining,
                    version: flight.version + 1,
                    ..flight
                });
            }

            // someone else wrote the row between our read and our swap
            retries += 1;
            tracing::debug!(flight_id, retries, "seat reservation lost a race, retrying");
        }

        tracing::warn!(flight_id, "seat reservation gave up after maximum retries");
        Err(AppError::Conflict(
            "Failed to reserve seat after maximum retries".into(),
        ))
    }

    /// Gives one seat back. The counter never exceeds the flight's capacity.
    pub async fn release_seat(&self, flight_id: i64) -> AppResult<Flight> {
        let mut retries = 0;

        while retries < self.max_retries {
            let flight = self.load(flight_id).await?;

            if flight.remaining_tickets >= flight.capacity {
                tracing::warn!(flight_id, "seat release ignored, flight already at capacity");
                return Ok(flight);
            }

            let remaining = flight.remaining_tickets + 1;
            if self
                .flights
                .compare_and_set_remaining(flight.id, flight.version, remaining)
                .await?
            {
                tracing::debug!(flight_id, remaining, "seat released");
                return Ok(Flight {
                    remaining_tickets: remaining,
                    version: flight.version + 1,
                    ..flight
                });
            }

            retries += 1;
        }

        tracing::warn!(flight_id, "seat release gave up after maximum retries");
        Err(AppError::Conflict(
            "Failed to release seat after maximum retries".into(),
        ))
    }
}
