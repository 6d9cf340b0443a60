pub mod admin_service;
pub mod flight_service;
pub mod inventory_service;
pub mod payment_service;
pub mod ticket_service;
pub mod user_service;
