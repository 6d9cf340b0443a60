use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::flight::{
    Flight, FlightSearchQuery, FlightSearchResponse, FlightStatusChange, NewFlightRequest,
    UpdateFlightRequest,
};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid {field} format")))
}

/// All flights that are still scheduled
#[openapi(tag = "Flights")]
#[get("/flights")]
pub async fn list_flights(
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(flight_service.list_scheduled().await?))
}

/// Search flights
#[openapi(tag = "Flights")]
#[get("/flights/search?<origin_airport>&<destination_airport>&<departure_date>&<end_date>")]
pub async fn search_flights(
    origin_airport: String,
    destination_airport: String,
    departure_date: String,
    end_date: Option<String>,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightSearchResponse>, AppError> {
    let departure_date = parse_date(&departure_date, "departure date")?;
    let end_date = match end_date {
        Some(date) => Some(parse_date(&date, "end date")?),
        None => None,
    };

    let query = FlightSearchQuery {
        origin_airport: origin_airport.trim().to_uppercase(),
        destination_airport: destination_airport.trim().to_uppercase(),
        departure_date,
        end_date,
    };
    let flights = flight_service.search_flights(query).await?;
    Ok(Json(flights))
}

/// A single flight
#[openapi(tag = "Flights")]
#[get("/flights/<flight_id>")]
pub async fn get_flight(
    flight_id: i64,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(flight_service.get_flight(flight_id).await?))
}

/// Flights operated by the logged-in airline
#[openapi(tag = "Airlines")]
#[get("/airline/flights")]
pub async fn airline_flights(
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let flights = flight_service
        .list_airline_flights(auth.airline_code()?)
        .await?;
    Ok(Json(flights))
}

/// Add a flight for the logged-in airline
#[openapi(tag = "Airlines")]
#[post("/airline/flights", format = "json", data = "<request>")]
pub async fn add_airline_flight(
    request: Json<NewFlightRequest>,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    let flight = flight_service
        .create_flight(auth.airline_code()?, request.into_inner())
        .await?;
    Ok(Json(flight))
}

/// Edit one of the airline's flights
#[openapi(tag = "Airlines")]
#[put("/airline/flights/<flight_id>", format = "json", data = "<request>")]
pub async fn update_airline_flight(
    flight_id: i64,
    request: Json<UpdateFlightRequest>,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    let flight = flight_service
        .update_flight(flight_id, Some(auth.airline_code()?), request.into_inner())
        .await?;
    Ok(Json(flight))
}

/// Cancel one of the airline's flights and every ticket on it
#[openapi(tag = "Airlines")]
#[post("/airline/flights/<flight_id>/cancel")]
pub async fn cancel_airline_flight(
    flight_id: i64,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightStatusChange>, AppError> {
    let change = flight_service
        .cancel_flight(flight_id, Some(auth.airline_code()?))
        .await?;
    Ok(Json(change))
}

/// Mark one of the airline's flights as completed
#[openapi(tag = "Airlines")]
#[post("/airline/flights/<flight_id>/complete")]
pub async fn complete_airline_flight(
    flight_id: i64,
    auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightStatusChange>, AppError> {
    let change = flight_service
        .complete_flight(flight_id, Some(auth.airline_code()?))
        .await?;
    Ok(Json(change))
}
