use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_okapi::openapi;

use crate::models::admin::AdminOverview;
use crate::models::flight::{
    Airline, Airport, Flight, FlightStatusChange, NewFlightRequest, UpdateAirlineRequest,
    UpdateAirportRequest, UpdateFlightRequest,
};
use crate::models::ticket::{AdminTicketRequest, Ticket};
use crate::models::user::{AdminUpdateCustomerRequest, Customer};
use crate::services::admin_service::AdminService;
use crate::services::flight_service::FlightService;
use crate::services::ticket_service::TicketService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Airlines, airports, flights, customers and tickets
#[openapi(tag = "Admin")]
#[get("/admin")]
pub async fn overview(
    auth: AuthenticatedUser,
    admin_service: &State<AdminService>,
) -> Result<Json<AdminOverview>, AppError> {
    auth.require_admin()?;
    Ok(Json(admin_service.overview().await?))
}

#[openapi(tag = "Admin")]
#[post("/admin/flights", format = "json", data = "<request>")]
pub async fn add_flight(
    request: Json<NewFlightRequest>,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    auth.require_admin()?;
    let request = request.into_inner();
    let airline_code = request
        .airline_code
        .clone()
        .ok_or_else(|| AppError::ValidationError("Airline Code is required".into()))?;
    let flight = flight_service.create_flight(&airline_code, request).await?;
    Ok(Json(flight))
}

#[openapi(tag = "Admin")]
#[put("/admin/flights/<flight_id>", format = "json", data = "<request>")]
pub async fn update_flight(
    flight_id: i64,
    request: Json<UpdateFlightRequest>,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    auth.require_admin()?;
    let flight = flight_service
        .update_flight(flight_id, None, request.into_inner())
        .await?;
    Ok(Json(flight))
}

#[openapi(tag = "Admin")]
#[post("/admin/flights/<flight_id>/cancel")]
pub async fn cancel_flight(
    flight_id: i64,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightStatusChange>, AppError> {
    auth.require_admin()?;
    Ok(Json(flight_service.cancel_flight(flight_id, None).await?))
}

#[openapi(tag = "Admin")]
#[delete("/admin/flights/<flight_id>")]
pub async fn delete_flight(
    flight_id: i64,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;
    flight_service.delete_flight(flight_id).await?;
    Ok(Json(json!({ "deleted": flight_id })))
}

#[openapi(tag = "Admin")]
#[put("/admin/airlines/<iata_code>", format = "json", data = "<request>")]
pub async fn update_airline(
    iata_code: String,
    request: Json<UpdateAirlineRequest>,
    auth: AuthenticatedUser,
    admin_service: &State<AdminService>,
) -> Result<Json<Airline>, AppError> {
    auth.require_admin()?;
    let airline = admin_service
        .update_airline(&iata_code, request.into_inner())
        .await?;
    Ok(Json(airline))
}

#[openapi(tag = "Admin")]
#[put("/admin/airports/<airport_code>", format = "json", data = "<request>")]
pub async fn update_airport(
    airport_code: String,
    request: Json<UpdateAirportRequest>,
    auth: AuthenticatedUser,
    admin_service: &State<AdminService>,
) -> Result<Json<Airport>, AppError> {
    auth.require_admin()?;
    let airport = admin_service
        .update_airport(&airport_code, request.into_inner())
        .await?;
    Ok(Json(airport))
}

#[openapi(tag = "Admin")]
#[put("/admin/customers/<customer_id>", format = "json", data = "<request>")]
pub async fn update_customer(
    customer_id: i64,
    request: Json<AdminUpdateCustomerRequest>,
    auth: AuthenticatedUser,
    admin_service: &State<AdminService>,
) -> Result<Json<Customer>, AppError> {
    auth.require_admin()?;
    let customer = admin_service
        .update_customer(customer_id, request.into_inner())
        .await?;
    Ok(Json(customer))
}

/// Issue a ticket for a customer
#[openapi(tag = "Admin")]
#[post("/admin/tickets", format = "json", data = "<request>")]
pub async fn add_ticket(
    request: Json<AdminTicketRequest>,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    auth.require_admin()?;
    Ok(Json(ticket_service.admin_create_ticket(request.into_inner()).await?))
}

#[openapi(tag = "Admin")]
#[put("/admin/tickets/<ticket_id>", format = "json", data = "<request>")]
pub async fn update_ticket(
    ticket_id: String,
    request: Json<AdminTicketRequest>,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Ticket>, AppError> {
    auth.require_admin()?;
    let ticket = ticket_service
        .admin_update_ticket(&ticket_id, request.into_inner())
        .await?;
    Ok(Json(ticket))
}

#[openapi(tag = "Admin")]
#[delete("/admin/tickets/<ticket_id>")]
pub async fn delete_ticket(
    ticket_id: String,
    auth: AuthenticatedUser,
    ticket_service: &State<TicketService>,
) -> Result<Json<Value>, AppError> {
    auth.require_admin()?;
    ticket_service.admin_delete_ticket(&ticket_id).await?;
    Ok(Json(json!({ "deleted": ticket_id })))
}
