pub mod error;
pub mod jwt;
pub mod swagger_doc;
pub mod ticket_id;
