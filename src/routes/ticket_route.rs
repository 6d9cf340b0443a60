use crate::models::ticket::{
    EditTicketRequest, PaymentDetails, PurchaseRequest, Ticket, TicketResponse,
};
use crate::services::ticket_service::TicketService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Start a purchase; the ticket stays PENDING until paid
#[openapi(tag = "Tickets")]
#[post("/tickets", format = "json", data = "<request>")]
pub async fn purchase(
    request: Json<PurchaseRequest>,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .start_purchase(auth.customer_id()?, request.into_inner())
        .await?;
    Ok(Json(ticket))
}

/// Pay for a pending ticket
#[openapi(tag = "Tickets")]
#[post("/tickets/<ticket_id>/payment", format = "json", data = "<details>")]
pub async fn confirm_payment(
    ticket_id: String,
    details: Json<PaymentDetails>,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .confirm_payment(auth.customer_id()?, &ticket_id, details.into_inner())
        .await?;
    Ok(Json(ticket))
}

/// The logged-in customer's tickets, newest first
#[openapi(tag = "Tickets")]
#[get("/tickets")]
pub async fn list_tickets(
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let tickets = ticket_service
        .list_customer_tickets(auth.customer_id()?)
        .await?;
    Ok(Json(tickets))
}

#[openapi(tag = "Tickets")]
#[get("/tickets/<ticket_id>")]
pub async fn get_ticket(
    ticket_id: String,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = ticket_service
        .get_ticket(auth.customer_id()?, &ticket_id)
        .await?;
    Ok(Json(ticket))
}

/// Change seat or class of service
#[openapi(tag = "Tickets")]
#[put("/tickets/<ticket_id>", format = "json", data = "<request>")]
pub async fn edit_ticket(
    ticket_id: String,
    request: Json<EditTicketRequest>,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .edit_ticket(auth.customer_id()?, &ticket_id, request.into_inner())
        .await?;
    Ok(Json(ticket))
}

#[openapi(tag = "Tickets")]
#[post("/tickets/<ticket_id>/cancel")]
pub async fn cancel_ticket(
    ticket_id: String,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .cancel_ticket(auth.customer_id()?, &ticket_id)
        .await?;
    Ok(Json(ticket))
}

#[openapi(tag = "Tickets")]
#[post("/tickets/<ticket_id>/check-in")]
pub async fn check_in(
    ticket_id: String,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = ticket_service
        .check_in(auth.customer_id()?, &ticket_id)
        .await?;
    Ok(Json(ticket))
}
