use validator::Validate;

use crate::models::admin::AdminOverview;
use crate::models::flight::{Airline, Airport, UpdateAirlineRequest, UpdateAirportRequest};
use crate::models::user::{AdminUpdateCustomerRequest, Customer};
use crate::repositories::Repositories;
use crate::services::user_service::UserService;
use crate::utils::error::{AppError, AppResult};

/// Reference data and customer maintenance for administrators.
#[derive(Clone)]
pub struct AdminService {
    repos: Repositories,
    users: UserService,
}

impl AdminService {
    pub fn new(repos: Repositories, users: UserService) -> Self {
        AdminService { repos, users }
    }

    pub async fn overview(&self) -> AppResult<AdminOverview> {
        Ok(AdminOverview {
            airlines: self.repos.airlines.find_all().await?,
            airports: self.repos.airports.find_all().await?,
            flights: self.repos.flights.find_all().await?,
            customers: self.repos.customers.find_all().await?,
            tickets: self.repos.tickets.find_all().await?,
        })
    }

    async fn check_username_change(&self, old: &str, new: &str) -> AppResult<()> {
        if old != new && self.users.username_taken(new).await? {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        Ok(())
    }

    pub async fn update_airline(
        &self,
        iata_code: &str,
        request: UpdateAirlineRequest,
    ) -> AppResult<Airline> {
        request.validate()?;
        let airline = self
            .repos
            .airlines
            .find_by_code(iata_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Airline {iata_code} not found")))?;

        if self.repos.airports.find_by_code(&request.airport_base).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Airport {} not found",
                request.airport_base
            )));
        }
        self.check_username_change(&airline.username, &request.username)
            .await?;

        let password_hash = match request.password.as_deref() {
            Some(password) => self.users.hash_password(password)?,
            None => airline.password_hash.clone(),
        };

        let updated = Airline {
            airline_name: request.airline_name,
            airport_base: request.airport_base,
            username: request.username,
            password_hash,
            ..airline
        };
        self.repos.airlines.update(&updated).await?;

        tracing::info!(iata_code, "airline updated");
        Ok(updated)
    }

    pub async fn update_airport(
        &self,
        airport_code: &str,
        request: UpdateAirportRequest,
    ) -> AppResult<Airport> {
        request.validate()?;
        if !(-90.0..=90.0).contains(&request.latitude)
            || !(-180.0..=180.0).contains(&request.longitude)
        {
            return Err(AppError::ValidationError(
                "Latitude or longitude out of range".into(),
            ));
        }

        let airport = self
            .repos
            .airports
            .find_by_code(airport_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Airport {airport_code} not found")))?;

        let updated = Airport {
            airport_name: request.airport_name,
            city: request.city,
            country: request.country,
            latitude: request.latitude,
            longitude: request.longitude,
            time_zone: request.time_zone,
            ..airport
        };
        self.repos.airports.update(&updated).await?;

        tracing::info!(airport_code, "airport updated");
        Ok(updated)
    }

    pub async fn update_customer(
        &self,
        customer_id: i64,
        request: AdminUpdateCustomerRequest,
    ) -> AppResult<Customer> {
        request.validate()?;
        let customer = self.users.account(customer_id).await?;
        self.check_username_change(&customer.username, &request.username)
            .await?;

        let updated = Customer {
            first_name: request.first_name,
            last_name: request.last_name,
            address: request.address,
            phone_number: request.phone_number,
            credit_card_number: request.credit_card_number,
            username: request.username,
            ..customer
        };
        self.repos.customers.update(&updated).await?;

        tracing::info!(customer_id, "customer updated by administrator");
        Ok(updated)
    }
}
