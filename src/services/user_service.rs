use crate::models::user::{
    Customer, CustomerRegistrationRequest, NewCustomer, UpdateAccountRequest, UserAccount,
    UserLoginRequest, UserLoginResponse,
};
use crate::repositories::Repositories;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::JwtKeys;
use bcrypt::{hash, verify};
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
    keys: JwtKeys,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Repositories, keys: JwtKeys, bcrypt_cost: u32) -> Self {
        UserService {
            repos,
            keys,
            bcrypt_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(hash(password.as_bytes(), self.bcrypt_cost)?)
    }

    /// Resolves a username to whichever kind of account owns it.
    /// Customers are looked up first, then airlines, then administrators.
    pub async fn find_account(&self, username: &str) -> AppResult<Option<UserAccount>> {
        if let Some(customer) = self.repos.customers.find_by_username(username).await? {
            return Ok(Some(UserAccount::Customer(customer)));
        }
        if let Some(airline) = self.repos.airlines.find_by_username(username).await? {
            return Ok(Some(UserAccount::Airline(airline)));
        }
        if let Some(admin) = self.repos.administrators.find_by_username(username).await? {
            return Ok(Some(UserAccount::Administrator(admin)));
        }
        Ok(None)
    }

    pub async fn username_taken(&self, username: &str) -> AppResult<bool> {
        Ok(self.find_account(username).await?.is_some())
    }

    // Register a new customer
    pub async fn register_customer(&self, request: CustomerRegistrationRequest) -> AppResult<i64> {
        request.validate()?;

        // Usernames are shared by every kind of login
        if self.username_taken(&request.username).await? {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let password_hash = self.hash_password(&request.password)?;

        let customer = self
            .repos
            .customers
            .insert(NewCustomer {
                first_name: request.first_name,
                last_name: request.last_name,
                address: request.address,
                phone_number: request.phone_number,
                credit_card_number: request.credit_card_number,
                username: request.username,
                password_hash,
            })
            .await?;

        tracing::info!(customer_id = customer.customer_id, username = %customer.username, "customer registered");
        Ok(customer.customer_id)
    }

    // Login any kind of account and issue a token carrying its role
    pub async fn login(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let account = self
            .find_account(&request.username)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(
            request.password.as_bytes(),
            account.credentials().password_hash,
        )
        .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            tracing::warn!(username = %request.username, "failed login attempt");
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        let role = account.role();
        let principal = account.principal();
        let token = self.keys.generate_token(&principal, role)?;

        tracing::info!(username = %request.username, %role, "logged in");
        Ok(UserLoginResponse {
            token,
            role,
            principal,
        })
    }

    pub async fn account(&self, customer_id: i64) -> AppResult<Customer> {
        self.repos
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))
    }

    /// Customers may only change their contact and payment details.
    pub async fn update_account(
        &self,
        customer_id: i64,
        request: UpdateAccountRequest,
    ) -> AppResult<Customer> {
        request.validate()?;
        let customer = self.account(customer_id).await?;

        let updated = Customer {
            address: request.address,
            phone_number: request.phone_number,
            credit_card_number: request.credit_card_number,
            ..customer
        };
        self.repos.customers.update(&updated).await?;

        tracing::info!(customer_id, "account details updated");
        Ok(updated)
    }
}
