use crate::models::user::{
    Customer, CustomerRegistrationRequest, RegisterResponse, UpdateAccountRequest,
    UserLoginRequest, UserLoginResponse,
};
use crate::services::user_service::UserService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new customer
#[openapi(tag = "Users")]
#[post("/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<CustomerRegistrationRequest>,
    user_service: &State<UserService>,
) -> Result<Json<RegisterResponse>, AppError> {
    let customer_id = user_service.register_customer(request.into_inner()).await?;
    Ok(Json(RegisterResponse {
        customer_id,
        status: "success".to_string(),
    }))
}

/// Login as a customer, airline or administrator
#[openapi(tag = "Users")]
#[post("/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<UserLoginRequest>,
    user_service: &State<UserService>,
) -> Result<Json<UserLoginResponse>, AppError> {
    let response = user_service.login(request.into_inner()).await?;
    Ok(Json(response))
}

/// The logged-in customer's account
#[openapi(tag = "Users")]
#[get("/account")]
pub async fn account(
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<Customer>, AppError> {
    let customer = user_service.account(auth.customer_id()?).await?;
    Ok(Json(customer))
}

/// Update address, phone number and card
#[openapi(tag = "Users")]
#[put("/account", format = "json", data = "<request>")]
pub async fn update_account(
    request: Json<UpdateAccountRequest>,
    auth: AuthenticatedUser,
    user_service: &State<UserService>,
) -> Result<Json<Customer>, AppError> {
    let customer = user_service
        .update_account(auth.customer_id()?, request.into_inner())
        .await?;
    Ok(Json(customer))
}
