use async_trait::async_trait;
use chrono::{Duration, Utc};
use flight_ticket_booking::{
    config::SeatRestorePolicy,
    models::{
        flight::Flight,
        ticket::{AdminTicketRequest, BookingStatus, ClassType, EditTicketRequest, PaymentDetails},
    },
    services::payment_service::PaymentProcessor,
    utils::{error::AppError, error::AppResult, ticket_id::is_valid_ticket_id},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use test_context::{test_context, AsyncTestContext};
use tokio::task::JoinSet;

mod common {
    pub mod test_utils;
}
use common::test_utils::{card, date, purchase, TestApp};

struct TicketServiceContext {
    app: TestApp,
}

#[async_trait]
impl AsyncTestContext for TicketServiceContext {
    async fn setup() -> Self {
        let app = TestApp::new()
            .await
            .expect("Failed to set up in-memory application");
        TicketServiceContext { app }
    }

    async fn teardown(self) {}
}

struct DeclineAll;

#[async_trait]
impl PaymentProcessor for DeclineAll {
    async fn charge(&self, _: &str, _: Decimal, _: &PaymentDetails) -> AppResult<bool> {
        Ok(false)
    }
}

// Register a customer and book one seat on `flight`
async fn booked_ticket(app: &TestApp, flight: &Flight, username: &str, phone: u32) -> AppResult<(i64, String)> {
    let customer_id = app.register(username, phone).await?;
    let tickets = &app.services.tickets;
    let ticket = tickets.start_purchase(customer_id, purchase(flight.id, "12A")).await?;
    tickets.confirm_payment(customer_id, &ticket.ticket_id, card()).await?;
    Ok((customer_id, ticket.ticket_id))
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_purchase_and_payment_end_to_end(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;

    let pending = app
        .services
        .tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;
    assert_eq!(pending.booking_status, BookingStatus::Pending);
    assert!(is_valid_ticket_id(&pending.ticket_id), "{}", pending.ticket_id);
    assert_eq!(pending.class_type, ClassType::Economy);
    assert_eq!(pending.seat_number, "12A");
    assert_eq!(pending.price, Decimal::new(45000, 2));

    // no seat is taken before payment
    assert_eq!(app.remaining(flight.id).await?, 150);

    let booked = app
        .services
        .tickets
        .confirm_payment(customer_id, &pending.ticket_id, card())
        .await?;
    assert_eq!(booked.booking_status, BookingStatus::Booked);
    assert_eq!(app.remaining(flight.id).await?, 149);

    let listed = app.services.tickets.list_customer_tickets(customer_id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].ticket.booking_status, BookingStatus::Booked);
    assert!(listed[0].flight_details.contains("AA101"));
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_each_confirmation_takes_exactly_one_seat(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA201", date(2024, 7, 10), 10).await?;

    for i in 0..3 {
        let before = app.remaining(flight.id).await?;
        booked_ticket(app, &flight, &format!("traveller{i}"), i).await?;
        assert_eq!(app.remaining(flight.id).await?, before - 1);
    }
    assert_eq!(app.remaining(flight.id).await?, 7);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_declined_payment_leaves_ticket_pending(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;

    let tickets = app
        .services
        .tickets
        .clone()
        .with_payment_processor(Arc::new(DeclineAll));
    let pending = tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;

    let result = tickets
        .confirm_payment(customer_id, &pending.ticket_id, card())
        .await;
    assert!(matches!(result, Err(AppError::PaymentFailure(_))));

    let ticket = tickets.get_ticket(customer_id, &pending.ticket_id).await?;
    assert_eq!(ticket.ticket.booking_status, BookingStatus::Pending);
    assert_eq!(app.remaining(flight.id).await?, 150);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_malformed_card_is_rejected_before_charging(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let pending = app
        .services
        .tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;

    let mut details = card();
    details.expiry = "2027-09".to_string();
    let result = app
        .services
        .tickets
        .confirm_payment(customer_id, &pending.ticket_id, details)
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(app.remaining(flight.id).await?, 150);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_ticket_cannot_be_paid_twice(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (customer_id, ticket_id) = booked_ticket(app, &flight, "tomhanks123", 1234).await?;

    let again = app
        .services
        .tickets
        .confirm_payment(customer_id, &ticket_id, card())
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(app.remaining(flight.id).await?, 149);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_cancel_restores_seat_by_default(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (customer_id, ticket_id) = booked_ticket(app, &flight, "tomhanks123", 1234).await?;
    assert_eq!(app.remaining(flight.id).await?, 149);

    let cancelled = app.services.tickets.cancel_ticket(customer_id, &ticket_id).await?;
    assert_eq!(cancelled.booking_status, BookingStatus::Cancelled);
    assert_eq!(app.remaining(flight.id).await?, 150);
    Ok(())
}

#[tokio::test]
async fn test_cancel_keeps_seat_under_keep_policy() -> Result<(), AppError> {
    let app = TestApp::with_policy(SeatRestorePolicy::Keep).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (customer_id, ticket_id) = booked_ticket(&app, &flight, "tomhanks123", 1234).await?;

    app.services.tickets.cancel_ticket(customer_id, &ticket_id).await?;
    assert_eq!(app.remaining(flight.id).await?, 149);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_cancelling_pending_ticket_leaves_inventory_alone(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let pending = app
        .services
        .tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;

    app.services
        .tickets
        .cancel_ticket(customer_id, &pending.ticket_id)
        .await?;
    assert_eq!(app.remaining(flight.id).await?, 150);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_double_cancellation_is_rejected(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (customer_id, ticket_id) = booked_ticket(app, &flight, "tomhanks123", 1234).await?;

    app.services.tickets.cancel_ticket(customer_id, &ticket_id).await?;
    let second = app.services.tickets.cancel_ticket(customer_id, &ticket_id).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // the seat came back exactly once
    assert_eq!(app.remaining(flight.id).await?, 150);

    let paid_after_cancel = app
        .services
        .tickets
        .confirm_payment(customer_id, &ticket_id, card())
        .await;
    assert!(matches!(paid_after_cancel, Err(AppError::Conflict(_))));
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_other_customers_tickets_are_hidden(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (_, ticket_id) = booked_ticket(app, &flight, "tomhanks123", 1234).await?;
    let intruder = app.register("ldicaprio567", 5678).await?;

    let result = app.services.tickets.cancel_ticket(intruder, &ticket_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(app.remaining(flight.id).await?, 149);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_sold_out_flight_rejects_purchase(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 1).await?;
    booked_ticket(app, &flight, "tomhanks123", 1234).await?;
    assert_eq!(app.remaining(flight.id).await?, 0);

    let late = app.register("ldicaprio567", 5678).await?;
    let result = app
        .services
        .tickets
        .start_purchase(late, purchase(flight.id, "12B"))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let missing = app.services.tickets.start_purchase(late, purchase(999, "1A")).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_confirmations_never_oversell(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let seats = 5;
    let buyers = 20;
    let flight = app.add_flight("AA301", date(2024, 12, 8), seats).await?;

    let mut pending = Vec::new();
    for i in 0..buyers {
        let customer_id = app.register(&format!("racer{i}"), i).await?;
        let ticket = app
            .services
            .tickets
            .start_purchase(customer_id, purchase(flight.id, &format!("{}C", i + 1)))
            .await?;
        pending.push((customer_id, ticket.ticket_id));
    }

    let mut set = JoinSet::new();
    for (customer_id, ticket_id) in pending {
        let tickets = app.services.tickets.clone();
        set.spawn(async move { tickets.confirm_payment(customer_id, &ticket_id, card()).await });
    }

    let mut booked = 0;
    let mut rejected = 0;
    while let Some(result) = set.join_next().await {
        match result.expect("confirmation task panicked") {
            Ok(ticket) => {
                assert_eq!(ticket.booking_status, BookingStatus::Booked);
                booked += 1;
            }
            Err(AppError::Conflict(_)) => rejected += 1,
            Err(e) => return Err(e),
        }
    }
    println!("booked {booked}, rejected {rejected}");

    assert_eq!(booked, seats);
    assert_eq!(rejected, buyers as i32 - seats);
    assert_eq!(app.remaining(flight.id).await?, 0);

    let all = app.services.tickets.list_all_tickets().await?;
    let holding = all.iter().filter(|t| t.booking_status.holds_seat()).count();
    assert_eq!(holding, seats as usize);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_blind_read_then_write_loses_an_update(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let flight = app.add_flight("AA401", date(2024, 12, 9), 10).await?;
    let flights = &app.repos.flights;

    // two bookings read the same row, then both write remaining - 1
    let first = flights.find_by_id(flight.id).await?.unwrap();
    let second = flights.find_by_id(flight.id).await?.unwrap();
    for mut stale in [first, second] {
        stale.remaining_tickets -= 1;
        flights.update(&stale).await?;
    }
    assert_eq!(app.remaining(flight.id).await?, 9, "one decrement was lost");

    // the same two bookings through the version check both land
    let inventory = app.services.tickets.inventory();
    inventory.reserve_seat(flight.id).await?;
    inventory.reserve_seat(flight.id).await?;
    assert_eq!(app.remaining(flight.id).await?, 7);

    // and a swap against a stale version is refused outright
    let stale = flights.find_by_id(flight.id).await?.unwrap();
    inventory.reserve_seat(flight.id).await?;
    let applied = flights
        .compare_and_set_remaining(flight.id, stale.version, stale.remaining_tickets - 1)
        .await?;
    assert!(!applied);
    assert_eq!(app.remaining(flight.id).await?, 6);
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_abandoned_pending_tickets_expire(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let tickets = &app.services.tickets;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let customer_id = app.register("tomhanks123", 1234).await?;

    let abandoned = tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;
    let (_, paid) = booked_ticket(app, &flight, "ldicaprio567", 5678).await?;

    // nothing is old enough yet
    assert!(tickets.expire_pending(Utc::now()).await?.is_empty());

    let later = Utc::now() + tickets.pending_ttl() + Duration::minutes(1);
    let expired = tickets.expire_pending(later).await?;
    assert_eq!(expired, vec![abandoned.ticket_id.clone()]);

    let abandoned = tickets.get_ticket(customer_id, &abandoned.ticket_id).await?;
    assert_eq!(abandoned.ticket.booking_status, BookingStatus::Cancelled);

    let all = tickets.list_all_tickets().await?;
    let paid = all.iter().find(|t| t.ticket_id == paid).unwrap();
    assert_eq!(paid.booking_status, BookingStatus::Booked);

    // PENDING never held a seat, so expiry gives nothing back
    assert_eq!(app.remaining(flight.id).await?, 149);
    assert!(tickets.expire_pending(later).await?.is_empty());
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_edit_and_check_in(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let tickets = &app.services.tickets;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let (customer_id, ticket_id) = booked_ticket(app, &flight, "tomhanks123", 1234).await?;

    let edited = tickets
        .edit_ticket(
            customer_id,
            &ticket_id,
            EditTicketRequest {
                seat_number: " 3f ".to_string(),
                class_type: ClassType::First,
            },
        )
        .await?;
    assert_eq!(edited.seat_number, "3F");
    assert_eq!(edited.class_type, ClassType::First);
    assert_eq!(edited.booking_status, BookingStatus::Booked);

    let checked_in = tickets.check_in(customer_id, &ticket_id).await?;
    assert_eq!(checked_in.booking_status, BookingStatus::CheckedIn);
    assert!(matches!(
        tickets.check_in(customer_id, &ticket_id).await,
        Err(AppError::Conflict(_))
    ));

    tickets.cancel_ticket(customer_id, &ticket_id).await?;
    let locked = tickets
        .edit_ticket(
            customer_id,
            &ticket_id,
            EditTicketRequest {
                seat_number: "1A".to_string(),
                class_type: ClassType::Business,
            },
        )
        .await;
    assert!(matches!(locked, Err(AppError::Conflict(_))));
    Ok(())
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_pending_ticket_cannot_check_in(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let pending = app
        .services
        .tickets
        .start_purchase(customer_id, purchase(flight.id, "12A"))
        .await?;

    let result = app.services.tickets.check_in(customer_id, &pending.ticket_id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

fn admin_request(customer_id: i64, flight_id: i64, status: Option<BookingStatus>) -> AdminTicketRequest {
    AdminTicketRequest {
        customer_id,
        flight_id,
        class_type: ClassType::Business,
        seat_number: "5b".to_string(),
        booking_status: status,
        price: Decimal::new(86000, 2),
    }
}

#[test_context(TicketServiceContext)]
#[tokio::test]
async fn test_admin_ticket_maintenance_keeps_inventory_in_step(ctx: &TicketServiceContext) -> Result<(), AppError> {
    let app = &ctx.app;
    let tickets = &app.services.tickets;
    let customer_id = app.register("tomhanks123", 1234).await?;
    let first = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let second = app.add_flight("AA201", date(2024, 7, 10), 120).await?;

    // created BOOKED by default, which takes a seat
    let issued = tickets
        .admin_create_ticket(admin_request(customer_id, first.id, None))
        .await?;
    assert_eq!(issued.booking_status, BookingStatus::Booked);
    assert_eq!(issued.seat_number, "5B");
    assert_eq!(app.remaining(first.id).await?, 149);

    // moving it to another flight takes a seat there and frees the old one
    let moved = tickets
        .admin_update_ticket(&issued.ticket_id, admin_request(customer_id, second.id, None))
        .await?;
    assert_eq!(moved.flight_id, second.id);
    assert_eq!(app.remaining(first.id).await?, 150);
    assert_eq!(app.remaining(second.id).await?, 119);

    // status changes follow the transition rules
    let confirmed = tickets
        .admin_update_ticket(
            &issued.ticket_id,
            admin_request(customer_id, second.id, Some(BookingStatus::Confirmed)),
        )
        .await?;
    assert_eq!(confirmed.booking_status, BookingStatus::Confirmed);
    let backwards = tickets
        .admin_update_ticket(
            &issued.ticket_id,
            admin_request(customer_id, second.id, Some(BookingStatus::Pending)),
        )
        .await;
    assert!(matches!(backwards, Err(AppError::Conflict(_))));

    tickets.admin_delete_ticket(&issued.ticket_id).await?;
    assert_eq!(app.remaining(second.id).await?, 120);
    assert!(matches!(
        tickets.admin_delete_ticket(&issued.ticket_id).await,
        Err(AppError::NotFound(_))
    ));

    // a PENDING ticket issued by an administrator holds nothing
    tickets
        .admin_create_ticket(admin_request(customer_id, first.id, Some(BookingStatus::Pending)))
        .await?;
    assert_eq!(app.remaining(first.id).await?, 150);
    Ok(())
}
