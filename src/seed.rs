//! Demo data loaded at startup when `SEED_DEMO_DATA` is on.
//!
//! Every insert is skipped when the row is already there, so seeding an
//! existing database is harmless.

use chrono::{NaiveDate, NaiveTime};

use crate::models::flight::{Airline, Airport, FlightStatus, NewFlight};
use crate::models::user::{NewAdministrator, NewCustomer};
use crate::repositories::Repositories;
use crate::services::user_service::UserService;
use crate::utils::error::{AppError, AppResult};

const AIRPORTS: [(&str, &str, &str, &str, f64, f64, &str); 6] = [
    ("BOS", "Logan International Airport", "Boston", "USA", 42.3656, -71.0096, "UTC-5"),
    ("JFK", "John F. Kennedy International Airport", "New York", "USA", 40.6413, -73.7781, "UTC-5"),
    ("LHR", "Heathrow Airport", "London", "United Kingdom", 51.4700, -0.4543, "UTC+0"),
    ("DFW", "Dallas/Fort Worth International Airport", "Dallas", "USA", 32.8998, -97.0403, "UTC-6"),
    ("TLV", "Ben Gurion Airport", "Tel Aviv", "Israel", 32.0055, 34.8854, "UTC+2"),
    ("BOM", "Chhatrapati Shivaji Maharaj International Airport", "Mumbai", "India", 19.0896, 72.8656, "UTC+5:30"),
];

// iata, name, base, username, password
const AIRLINES: [(&str, &str, &str, &str, &str); 2] = [
    ("AA", "American Airlines", "DFW", "userAmerican", "passAmerican123"),
    ("LY", "El Al Israel Airlines", "TLV", "userElAl", "passElAl123"),
];

// number, airline, origin, destination, (y, m, d), departure (h, m), landing (h, m), seats
type FlightSeed<'a> = (&'a str, &'a str, &'a str, &'a str, (i32, u32, u32), (u32, u32), (u32, u32), i32);

const FLIGHTS: [FlightSeed<'static>; 3] = [
    ("AA101", "AA", "JFK", "LHR", (2024, 7, 15), (8, 0), (20, 0), 150),
    ("AA201", "AA", "BOS", "LHR", (2024, 7, 10), (10, 0), (22, 0), 120),
    ("LY073", "LY", "TLV", "BOM", (2024, 7, 1), (16, 30), (23, 45), 90),
];

fn bad_seed(what: &str) -> AppError {
    AppError::BadRequest(format!("invalid demo {what}"))
}

pub async fn seed_demo_data(repos: &Repositories, users: &UserService) -> AppResult<()> {
    for (code, name, city, country, latitude, longitude, time_zone) in AIRPORTS {
        if repos.airports.find_by_code(code).await?.is_none() {
            repos
                .airports
                .insert(&Airport {
                    airport_code: code.to_string(),
                    airport_name: name.to_string(),
                    city: city.to_string(),
                    country: country.to_string(),
                    latitude,
                    longitude,
                    time_zone: time_zone.to_string(),
                })
                .await?;
        }
    }

    for (code, name, base, username, password) in AIRLINES {
        if repos.airlines.find_by_code(code).await?.is_none() {
            repos
                .airlines
                .insert(&Airline {
                    iata_code: code.to_string(),
                    airline_name: name.to_string(),
                    airport_base: base.to_string(),
                    username: username.to_string(),
                    password_hash: users.hash_password(password)?,
                })
                .await?;
        }
    }

    for (number, airline, origin, destination, (y, m, d), (dh, dm), (lh, lm), seats) in FLIGHTS {
        let date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| bad_seed("flight date"))?;
        if repos
            .flights
            .find_by_number_and_date(number, date)
            .await?
            .is_some()
        {
            continue;
        }
        repos
            .flights
            .insert(NewFlight {
                flight_number: number.to_string(),
                airline_code: airline.to_string(),
                origin_airport: origin.to_string(),
                destination_airport: destination.to_string(),
                date,
                departure_time_local: NaiveTime::from_hms_opt(dh, dm, 0)
                    .ok_or_else(|| bad_seed("departure time"))?,
                landing_time_local: NaiveTime::from_hms_opt(lh, lm, 0)
                    .ok_or_else(|| bad_seed("landing time"))?,
                capacity: seats,
                remaining_tickets: seats,
                flight_status: FlightStatus::Scheduled,
            })
            .await?;
    }

    let customers = [
        (
            "Tom",
            "Hanks",
            "123 Hollywood Blvd, Los Angeles, CA 90038",
            "+13105551234",
            "4111111111111111",
            "tomhanks123",
            "password123",
        ),
        (
            "Leonardo",
            "DiCaprio",
            "567 Vine St, Los Angeles, CA 90038",
            "+13105555678",
            "4012888888881881",
            "ldicaprio567",
            "password567",
        ),
    ];
    for (first_name, last_name, address, phone, card, username, password) in customers {
        if repos.customers.find_by_username(username).await?.is_none() {
            repos
                .customers
                .insert(NewCustomer {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    address: address.to_string(),
                    phone_number: phone.to_string(),
                    credit_card_number: card.to_string(),
                    username: username.to_string(),
                    password_hash: users.hash_password(password)?,
                })
                .await?;
        }
    }

    if repos.administrators.find_by_username("admin").await?.is_none() {
        repos
            .administrators
            .insert(NewAdministrator {
                first_name: "Site".to_string(),
                last_name: "Administrator".to_string(),
                username: "admin".to_string(),
                password_hash: users.hash_password("admin")?,
            })
            .await?;
    }

    tracing::info!("demo data loaded");
    Ok(())
}
