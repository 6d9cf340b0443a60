use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::config::{AppConfig, SeatRestorePolicy};
use crate::models::flight::Flight;
use crate::models::ticket::{
    normalize_seat, AdminTicketRequest, BookingStatus, EditTicketRequest, PaymentDetails,
    PurchaseRequest, Ticket, TicketResponse,
};
use crate::repositories::Repositories;
use crate::services::inventory_service::InventoryService;
use crate::services::payment_service::{AcceptAllPayments, PaymentProcessor};
use crate::utils::error::{AppError, AppResult};
use crate::utils::ticket_id::{RandomTicketIdGenerator, TicketIdGenerator};

// Fresh ids drawn before giving up on a colliding insert
const MAX_ID_ATTEMPTS: usize = 8;

/// Ticket purchase, payment confirmation and the rest of a ticket's life.
#[derive(Clone)]
pub struct TicketService {
    repos: Repositories,
    inventory: InventoryService,
    ids: Arc<dyn TicketIdGenerator>,
    payments: Arc<dyn PaymentProcessor>,
    seat_restore_policy: SeatRestorePolicy,
    pending_ttl: Duration,
}

impl TicketService {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        TicketService {
            inventory: InventoryService::new(repos.flights.clone(), config.booking_max_retries),
            repos,
            ids: Arc::new(RandomTicketIdGenerator::from_entropy()),
            payments: Arc::new(AcceptAllPayments),
            seat_restore_policy: config.seat_restore_policy,
            pending_ttl: Duration::minutes(config.pending_ticket_ttl_minutes),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn TicketIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_payment_processor(mut self, payments: Arc<dyn PaymentProcessor>) -> Self {
        self.payments = payments;
        self
    }

    pub fn inventory(&self) -> &InventoryService {
        &self.inventory
    }

    async fn load_ticket(&self, ticket_id: &str) -> AppResult<Ticket> {
        self.repos
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {ticket_id} not found")))
    }

    // Other customers' tickets are reported as missing
    async fn owned_ticket(&self, customer_id: i64, ticket_id: &str) -> AppResult<Ticket> {
        match self.load_ticket(ticket_id).await {
            Ok(ticket) if ticket.customer_id == customer_id => Ok(ticket),
            Ok(_) => Err(AppError::NotFound(format!("Ticket {ticket_id} not found"))),
            Err(e) => Err(e),
        }
    }

    async fn load_flight(&self, flight_id: i64) -> AppResult<Flight> {
        self.repos
            .flights
            .find_by_id(flight_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    // Customers may only act on tickets whose flight has not been cancelled or flown
    async fn ensure_flight_scheduled(&self, flight_id: i64) -> AppResult<()> {
        let flight = self.load_flight(flight_id).await?;
        if !flight.is_scheduled() {
            return Err(AppError::Conflict(format!(
                "Flight {} is {}",
                flight.flight_number, flight.flight_status
            )));
        }
        Ok(())
    }

    async fn ensure_customer(&self, customer_id: i64) -> AppResult<()> {
        match self.repos.customers.find_by_id(customer_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Customer not found".into())),
        }
    }

    fn check_price(price: Decimal) -> AppResult<()> {
        if price <= Decimal::ZERO {
            return Err(AppError::ValidationError("Price must be positive".into()));
        }
        Ok(())
    }

    // Insert a ticket under a freshly generated id, drawing again on collision
    async fn insert_with_fresh_id(&self, mut ticket: Ticket) -> AppResult<Ticket> {
        for _ in 0..MAX_ID_ATTEMPTS {
            ticket.ticket_id = self.ids.generate();
            match self.repos.tickets.insert(&ticket).await {
                Ok(()) => return Ok(ticket),
                Err(AppError::Conflict(_)) => {
                    tracing::debug!(ticket_id = %ticket.ticket_id, "ticket id collision");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::Conflict("Could not allocate a ticket id".into()))
    }

    /// Moves a ticket to `next`, keeping the flight's seat counter in step.
    ///
    /// Entering a seat-holding state reserves a seat first; the reservation is
    /// handed back if the status write loses a race. Cancelling a seat-holding
    /// ticket gives the seat back under [`SeatRestorePolicy::Restore`].
    async fn move_status(&self, ticket: Ticket, next: BookingStatus) -> AppResult<Ticket> {
        let current = ticket.booking_status;
        if !current.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Ticket {} cannot go from {} to {}",
                ticket.ticket_id, current, next
            )));
        }

        let takes_seat = !current.holds_seat() && next.holds_seat();
        if takes_seat {
            self.inventory.reserve_seat(ticket.flight_id).await?;
        }

        let applied = self
            .repos
            .tickets
            .compare_and_set_status(&ticket.ticket_id, current, next)
            .await?;

        if !applied {
            if takes_seat {
                self.inventory.release_seat(ticket.flight_id).await?;
            }
            return Err(AppError::Conflict(format!(
                "Ticket {} was changed concurrently",
                ticket.ticket_id
            )));
        }

        if next == BookingStatus::Cancelled
            && current.holds_seat()
            && self.seat_restore_policy == SeatRestorePolicy::Restore
        {
            self.inventory.release_seat(ticket.flight_id).await?;
        }

        tracing::info!(ticket_id = %ticket.ticket_id, from = %current, to = %next, "ticket status changed");
        Ok(Ticket {
            booking_status: next,
            ..ticket
        })
    }

    /// Records a PENDING ticket. No seat is taken until payment is confirmed.
    pub async fn start_purchase(
        &self,
        customer_id: i64,
        request: PurchaseRequest,
    ) -> AppResult<Ticket> {
        request.validate()?;
        Self::check_price(request.price)?;
        self.ensure_customer(customer_id).await?;

        let flight = self.load_flight(request.flight_id).await?;
        if !flight.is_scheduled() {
            return Err(AppError::Conflict(format!(
                "Flight {} is {}",
                flight.flight_number, flight.flight_status
            )));
        }
        if !flight.has_seats() {
            return Err(AppError::Conflict(format!(
                "Flight {} is sold out",
                flight.flight_number
            )));
        }

        let ticket = self
            .insert_with_fresh_id(Ticket {
                ticket_id: String::new(),
                customer_id,
                flight_id: flight.id,
                class_type: request.class_type,
                seat_number: normalize_seat(&request.seat_number),
                booking_status: BookingStatus::Pending,
                price: request.price,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            ticket_id = %ticket.ticket_id,
            customer_id,
            flight = %flight.flight_number,
            "purchase started"
        );
        Ok(ticket)
    }

    /// Charges the customer and books the seat: PENDING -> BOOKED.
    pub async fn confirm_payment(
        &self,
        customer_id: i64,
        ticket_id: &str,
        details: PaymentDetails,
    ) -> AppResult<Ticket> {
        let ticket = self.owned_ticket(customer_id, ticket_id).await?;
        if ticket.booking_status != BookingStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Ticket {ticket_id} is {} and cannot be paid for",
                ticket.booking_status
            )));
        }

        details.validate()?;

        if !self
            .payments
            .charge(&ticket.ticket_id, ticket.price, &details)
            .await?
        {
            tracing::warn!(ticket_id, "payment declined");
            return Err(AppError::PaymentFailure("Payment was declined".into()));
        }

        let booked = self.move_status(ticket, BookingStatus::Booked).await?;
        tracing::info!(ticket_id, flight_id = booked.flight_id, "payment confirmed, seat booked");
        Ok(booked)
    }

    pub async fn cancel_ticket(&self, customer_id: i64, ticket_id: &str) -> AppResult<Ticket> {
        let ticket = self.owned_ticket(customer_id, ticket_id).await?;
        self.ensure_flight_scheduled(ticket.flight_id).await?;
        self.move_status(ticket, BookingStatus::Cancelled).await
    }

    pub async fn check_in(&self, customer_id: i64, ticket_id: &str) -> AppResult<Ticket> {
        let ticket = self.owned_ticket(customer_id, ticket_id).await?;
        self.ensure_flight_scheduled(ticket.flight_id).await?;
        self.move_status(ticket, BookingStatus::CheckedIn).await
    }

    /// Changes seat and class of service on a live ticket.
    pub async fn edit_ticket(
        &self,
        customer_id: i64,
        ticket_id: &str,
        request: EditTicketRequest,
    ) -> AppResult<Ticket> {
        request.validate()?;
        let ticket = self.owned_ticket(customer_id, ticket_id).await?;
        if ticket.booking_status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Ticket {ticket_id} is {} and can no longer be edited",
                ticket.booking_status
            )));
        }
        self.ensure_flight_scheduled(ticket.flight_id).await?;

        let edited = Ticket {
            seat_number: normalize_seat(&request.seat_number),
            class_type: request.class_type,
            ..ticket
        };
        self.repos.tickets.update(&edited).await?;

        tracing::info!(ticket_id, seat = %edited.seat_number, "ticket edited");
        self.load_ticket(ticket_id).await
    }

    async fn describe(&self, ticket: Ticket) -> AppResult<TicketResponse> {
        let flight_details = match self.repos.flights.find_by_id(ticket.flight_id).await? {
            Some(flight) => format!(
                "Flight {} on {} ({} -> {})",
                flight.flight_number, flight.date, flight.origin_airport, flight.destination_airport
            ),
            None => "Flight no longer available".to_string(),
        };
        Ok(TicketResponse {
            ticket,
            flight_details,
        })
    }

    pub async fn list_customer_tickets(&self, customer_id: i64) -> AppResult<Vec<TicketResponse>> {
        let mut tickets = self.repos.tickets.find_by_customer(customer_id).await?;
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut responses = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            responses.push(self.describe(ticket).await?);
        }
        Ok(responses)
    }

    pub async fn get_ticket(&self, customer_id: i64, ticket_id: &str) -> AppResult<TicketResponse> {
        let ticket = self.owned_ticket(customer_id, ticket_id).await?;
        self.describe(ticket).await
    }

    pub fn pending_ttl(&self) -> Duration {
        self.pending_ttl
    }

    /// Cancels PENDING tickets created before `now - pending_ttl`.
    /// Returns the ids that were cancelled.
    pub async fn expire_pending(&self, now: DateTime<Utc>) -> AppResult<Vec<String>> {
        let cutoff = now - self.pending_ttl;
        let mut expired = Vec::new();

        for ticket in self.repos.tickets.find_pending_created_before(cutoff).await? {
            // lost races mean the customer paid or cancelled in the meantime
            if self
                .repos
                .tickets
                .compare_and_set_status(
                    &ticket.ticket_id,
                    BookingStatus::Pending,
                    BookingStatus::Cancelled,
                )
                .await?
            {
                expired.push(ticket.ticket_id);
            }
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), %cutoff, "expired abandoned pending tickets");
        }
        Ok(expired)
    }

    pub async fn list_all_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.repos.tickets.find_all().await
    }

    /// Issues a ticket on a customer's behalf. Defaults to BOOKED.
    pub async fn admin_create_ticket(&self, request: AdminTicketRequest) -> AppResult<Ticket> {
        request.validate()?;
        Self::check_price(request.price)?;
        self.ensure_customer(request.customer_id).await?;
        let flight = self.load_flight(request.flight_id).await?;

        let status = request.booking_status.unwrap_or(BookingStatus::Booked);
        if status.holds_seat() {
            self.inventory.reserve_seat(flight.id).await?;
        }

        let created = self
            .insert_with_fresh_id(Ticket {
                ticket_id: String::new(),
                customer_id: request.customer_id,
                flight_id: flight.id,
                class_type: request.class_type,
                seat_number: normalize_seat(&request.seat_number),
                booking_status: status,
                price: request.price,
                created_at: Utc::now(),
            })
            .await;

        match created {
            Ok(ticket) => {
                tracing::info!(ticket_id = %ticket.ticket_id, status = %status, "ticket issued by administrator");
                Ok(ticket)
            }
            Err(e) => {
                if status.holds_seat() {
                    self.inventory.release_seat(flight.id).await?;
                }
                Err(e)
            }
        }
    }

    /// Administrative edit. A seat-holding ticket moved to another flight takes a
    /// seat there before giving its old one back; a status change goes through
    /// the normal transition rules.
    pub async fn admin_update_ticket(
        &self,
        ticket_id: &str,
        request: AdminTicketRequest,
    ) -> AppResult<Ticket> {
        request.validate()?;
        Self::check_price(request.price)?;
        self.ensure_customer(request.customer_id).await?;
        let existing = self.load_ticket(ticket_id).await?;
        let flight = self.load_flight(request.flight_id).await?;

        let moves_flight = flight.id != existing.flight_id;
        if moves_flight && existing.booking_status.holds_seat() {
            self.inventory.reserve_seat(flight.id).await?;
            self.inventory.release_seat(existing.flight_id).await?;
        }

        let edited = Ticket {
            customer_id: request.customer_id,
            flight_id: flight.id,
            class_type: request.class_type,
            seat_number: normalize_seat(&request.seat_number),
            price: request.price,
            ..existing
        };
        self.repos.tickets.update(&edited).await?;

        if let Some(next) = request.booking_status {
            let current = self.load_ticket(ticket_id).await?;
            if current.booking_status != next {
                return self.move_status(current, next).await;
            }
        }

        tracing::info!(ticket_id, "ticket updated by administrator");
        self.load_ticket(ticket_id).await
    }

    pub async fn admin_delete_ticket(&self, ticket_id: &str) -> AppResult<()> {
        let ticket = self.load_ticket(ticket_id).await?;
        if !self.repos.tickets.delete(ticket_id).await? {
            return Err(AppError::NotFound(format!("Ticket {ticket_id} not found")));
        }

        // a completed flight has no inventory left to give back to
        if ticket.booking_status.holds_seat() && !ticket.booking_status.is_terminal() {
            self.inventory.release_seat(ticket.flight_id).await?;
        }

        tracing::info!(ticket_id, "ticket deleted by administrator");
        Ok(())
    }
}
