use flight_ticket_booking::{server::build_rocket, utils::error::AppError};
use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

mod common {
    pub mod test_utils;
}
use common::test_utils::{date, TestApp};

async fn client(app: &TestApp) -> Client {
    Client::tracked(build_rocket(app.services.clone(), 0))
        .await
        .expect("valid rocket instance")
}

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post("/api/login")
        .json(&json!({ "username": username, "password": password }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("login body");
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn test_register_search_purchase_and_pay() -> Result<(), AppError> {
    let app = TestApp::new().await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    let client = client(&app).await;

    let response = client
        .post("/api/register")
        .json(&json!({
            "first_name": "Tom",
            "last_name": "Hanks",
            "address": "123 Hollywood Blvd, Los Angeles, CA 90038",
            "phone_number": "+13105551234",
            "credit_card_number": "4111111111111111",
            "username": "tomhanks123",
            "password": "password123"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let registered: Value = response.into_json().await.expect("register body");
    assert_eq!(registered["status"], "success");

    let token = login(&client, "tomhanks123", "password123").await;

    let response = client
        .get("/api/flights/search?origin_airport=jfk&destination_airport=LHR&departure_date=2024-07-15")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let found: Value = response.into_json().await.expect("search body");
    assert_eq!(found["flights"][0]["flight_number"], "AA101");

    let response = client
        .post("/api/tickets")
        .header(bearer(&token))
        .json(&json!({
            "flight_id": flight.id,
            "class_type": "ECONOMY",
            "seat_number": "12A",
            "price": "450.00"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let ticket: Value = response.into_json().await.expect("ticket body");
    assert_eq!(ticket["booking_status"], "PENDING");
    let ticket_id = ticket["ticket_id"].as_str().expect("ticket id").to_string();

    let response = client
        .post(format!("/api/tickets/{ticket_id}/payment"))
        .header(bearer(&token))
        .json(&json!({ "card_number": "4111111111111111", "expiry": "09/27", "cvv": "123" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let paid: Value = response.into_json().await.expect("payment body");
    assert_eq!(paid["booking_status"], "BOOKED");

    assert_eq!(app.remaining(flight.id).await?, 149);

    let response = client.get("/api/account").header(bearer(&token)).dispatch().await;
    let account: Value = response.into_json().await.expect("account body");
    assert_eq!(account["credit_card_number"], "************1111");
    assert!(account.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn test_registration_errors_map_to_status_codes() -> Result<(), AppError> {
    let app = TestApp::new().await?;
    let client = client(&app).await;

    let response = client
        .post("/api/register")
        .json(&json!({
            "first_name": "Tom",
            "last_name": "Hanks",
            "address": "123 Hollywood Blvd",
            "phone_number": "123456",
            "credit_card_number": "4111111111111111",
            "username": "tomhanks123",
            "password": "password123"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.expect("error body");
    assert!(body["error"].as_str().unwrap_or_default().contains("Phone Number"));
    Ok(())
}

#[tokio::test]
async fn test_role_guards() -> Result<(), AppError> {
    let app = TestApp::new().await?;
    let flight = app.add_flight("AA101", date(2024, 7, 15), 150).await?;
    app.register("tomhanks123", 1234).await?;
    let client = client(&app).await;

    let anonymous = client.get("/api/tickets").dispatch().await;
    assert_eq!(anonymous.status(), Status::Unauthorized);

    let customer = login(&client, "tomhanks123", "password123").await;
    let response = client.get("/api/admin").header(bearer(&customer)).dispatch().await;
    assert_eq!(response.status(), Status::Forbidden);

    let response = client
        .post(format!("/api/airline/flights/{}/cancel", flight.id))
        .header(bearer(&customer))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    // a different airline may not cancel AA's flight
    let british = login(&client, "userBritish", "passAirline123").await;
    let response = client
        .post(format!("/api/airline/flights/{}/cancel", flight.id))
        .header(bearer(&british))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let edit = json!({
        "flight_number": "AA109",
        "origin_airport": "JFK",
        "destination_airport": "LHR",
        "date": "2024-07-15",
        "departure_time_local": "09:00:00",
        "landing_time_local": "21:00:00",
        "remaining_tickets": 150
    });
    let response = client
        .put(format!("/api/airline/flights/{}", flight.id))
        .header(bearer(&british))
        .json(&edit)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);

    let american = login(&client, "userAmerican", "passAirline123").await;
    let response = client
        .put(format!("/api/airline/flights/{}", flight.id))
        .header(bearer(&american))
        .json(&edit)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let edited: Value = response.into_json().await.expect("edit body");
    assert_eq!(edited["flight_number"], "AA109");
    assert_eq!(edited["flight_status"], "SCHEDULED");

    let response = client
        .post(format!("/api/airline/flights/{}/cancel", flight.id))
        .header(bearer(&american))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let change: Value = response.into_json().await.expect("cancel body");
    assert_eq!(change["flight"]["flight_status"], "CANCELLED");
    Ok(())
}
