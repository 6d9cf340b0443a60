#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use flight_ticket_booking::{
    config::{AppConfig, SeatRestorePolicy},
    models::{
        flight::{Airline, Airport, Flight, FlightStatus, NewFlight},
        ticket::{ClassType, PaymentDetails, PurchaseRequest},
        user::CustomerRegistrationRequest,
    },
    repositories::Repositories,
    server::Services,
    utils::{error::AppError, ticket_id::RandomTicketIdGenerator},
};
use rust_decimal::Decimal;
use std::sync::Arc;

// Lowest cost bcrypt accepts, keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config(seat_restore_policy: SeatRestorePolicy) -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
        sweep_interval_secs: 0,
        seed_demo_data: false,
        seat_restore_policy,
        ..AppConfig::default()
    }
}

/// Fresh in-memory store with every service wired over it.
pub struct TestApp {
    pub repos: Repositories,
    pub services: Services,
}

impl TestApp {
    pub async fn new() -> Result<Self, AppError> {
        Self::with_policy(SeatRestorePolicy::Restore).await
    }

    pub async fn with_policy(policy: SeatRestorePolicy) -> Result<Self, AppError> {
        let repos = Repositories::in_memory();
        let mut services = Services::new(repos.clone(), &test_config(policy));
        services.tickets = services
            .tickets
            .with_id_generator(Arc::new(RandomTicketIdGenerator::seeded(42)));

        insert_reference_data(&repos).await?;
        Ok(TestApp { repos, services })
    }

    pub async fn add_flight(
        &self,
        flight_number: &str,
        date: NaiveDate,
        seats: i32,
    ) -> Result<Flight, AppError> {
        self.repos
            .flights
            .insert(NewFlight {
                flight_number: flight_number.to_string(),
                airline_code: "AA".to_string(),
                origin_airport: "JFK".to_string(),
                destination_airport: "LHR".to_string(),
                date,
                departure_time_local: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                landing_time_local: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
                capacity: seats,
                remaining_tickets: seats,
                flight_status: FlightStatus::Scheduled,
            })
            .await
    }

    pub async fn remaining(&self, flight_id: i64) -> Result<i32, AppError> {
        Ok(self
            .services
            .flights
            .get_flight(flight_id)
            .await?
            .remaining_tickets)
    }

    pub async fn register(&self, username: &str, phone_suffix: u32) -> Result<i64, AppError> {
        self.services
            .users
            .register_customer(registration(username, phone_suffix))
            .await
    }
}

async fn insert_reference_data(repos: &Repositories) -> Result<(), AppError> {
    for (code, name, city, country) in [
        ("JFK", "John F. Kennedy International Airport", "New York", "USA"),
        ("LHR", "Heathrow Airport", "London", "United Kingdom"),
        ("BOS", "Logan International Airport", "Boston", "USA"),
        ("DFW", "Dallas/Fort Worth International Airport", "Dallas", "USA"),
    ] {
        repos
            .airports
            .insert(&Airport {
                airport_code: code.to_string(),
                airport_name: name.to_string(),
                city: city.to_string(),
                country: country.to_string(),
                latitude: 0.0,
                longitude: 0.0,
                time_zone: "UTC".to_string(),
            })
            .await?;
    }

    for (code, name, username) in [
        ("AA", "American Airlines", "userAmerican"),
        ("BA", "British Airways", "userBritish"),
    ] {
        repos
            .airlines
            .insert(&Airline {
                iata_code: code.to_string(),
                airline_name: name.to_string(),
                airport_base: "DFW".to_string(),
                username: username.to_string(),
                password_hash: bcrypt::hash("passAirline123", TEST_BCRYPT_COST)?,
            })
            .await?;
    }
    Ok(())
}

pub fn registration(username: &str, phone_suffix: u32) -> CustomerRegistrationRequest {
    CustomerRegistrationRequest {
        first_name: "Tom".to_string(),
        last_name: "Hanks".to_string(),
        address: "123 Hollywood Blvd, Los Angeles, CA 90038".to_string(),
        phone_number: format!("+1310555{:04}", phone_suffix),
        credit_card_number: "4111111111111111".to_string(),
        username: username.to_string(),
        password: "password123".to_string(),
    }
}

pub fn purchase(flight_id: i64, seat_number: &str) -> PurchaseRequest {
    PurchaseRequest {
        flight_id,
        class_type: ClassType::Economy,
        seat_number: seat_number.to_string(),
        price: Decimal::new(45000, 2),
    }
}

pub fn card() -> PaymentDetails {
    PaymentDetails {
        card_number: "4111111111111111".to_string(),
        expiry: "09/27".to_string(),
        cvv: "123".to_string(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
