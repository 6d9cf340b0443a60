use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use strum_macros::{Display, EnumString};
use validator::{Validate, ValidationError};

use crate::models::flight::Airline;

// Full-string patterns for the customer contact and payment fields
pub static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{11,14}$").expect("valid phone number pattern"));
pub static CREDIT_CARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{13,19}$").expect("valid credit card pattern"));

pub(crate) fn pattern_check(
    pattern: &Regex,
    value: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if pattern.is_match(value) {
        return Ok(());
    }
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}

pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    pattern_check(
        &PHONE_NUMBER,
        value,
        "phone_number",
        "Phone Number must start with '+' followed by 11 to 14 digits",
    )
}

pub fn validate_credit_card_number(value: &str) -> Result<(), ValidationError> {
    pattern_check(
        &CREDIT_CARD_NUMBER,
        value,
        "credit_card_number",
        "Credit Card Number must be between 13 and 19 digits",
    )
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Airline,
    Administrator,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    #[serde(serialize_with = "mask_card_number")]
    #[schemars(with = "String")]
    pub credit_card_number: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
}

// Only the last four digits ever leave the service
#[allow(clippy::ptr_arg)]
fn mask_card_number<S: Serializer>(number: &String, serializer: S) -> Result<S::Ok, S::Error> {
    let visible = number.len().saturating_sub(4);
    let masked: String = number
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect();
    serializer.serialize_str(&masked)
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Administrator {
    pub admin_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    pub credit_card_number: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
}

/// Username and stored password hash of any login identity.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Every kind of account that can log in.
#[derive(Debug, Clone)]
pub enum UserAccount {
    Customer(Customer),
    Airline(Airline),
    Administrator(Administrator),
}

impl UserAccount {
    pub fn credentials(&self) -> Credentials<'_> {
        match self {
            UserAccount::Customer(c) => Credentials {
                username: &c.username,
                password_hash: &c.password_hash,
            },
            UserAccount::Airline(a) => Credentials {
                username: &a.username,
                password_hash: &a.password_hash,
            },
            UserAccount::Administrator(a) => Credentials {
                username: &a.username,
                password_hash: &a.password_hash,
            },
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserAccount::Customer(_) => Role::Customer,
            UserAccount::Airline(_) => Role::Airline,
            UserAccount::Administrator(_) => Role::Administrator,
        }
    }

    /// Stable identifier carried in tokens: numeric ids for customers and
    /// administrators, the IATA code for airlines.
    pub fn principal(&self) -> String {
        match self {
            UserAccount::Customer(c) => c.customer_id.to_string(),
            UserAccount::Airline(a) => a.iata_code.clone(),
            UserAccount::Administrator(a) => a.admin_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct CustomerRegistrationRequest {
    #[validate(length(min = 1, message = "First Name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last Name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_credit_card_number"))]
    pub credit_card_number: String,
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_credit_card_number"))]
    pub credit_card_number: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct AdminUpdateCustomerRequest {
    #[validate(length(min = 1, message = "First Name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last Name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_credit_card_number"))]
    pub credit_card_number: String,
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UserLoginResponse {
    pub token: String,
    pub role: Role,
    pub principal: String,
}

#[derive(Debug, Serialize, JsonSchema)]
#[schemars(example = "RegisterResponse::example")]
pub struct RegisterResponse {
    #[schemars(title = "Customer ID")]
    pub customer_id: i64,

    #[schemars(title = "Register Status")]
    pub status: String,
}

impl RegisterResponse {
    pub fn example() -> Self {
        Self {
            customer_id: 123,
            status: "success".to_string(),
        }
    }
}
