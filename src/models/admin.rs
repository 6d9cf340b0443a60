use schemars::JsonSchema;
use serde::Serialize;

use crate::models::flight::{Airline, Airport, Flight};
use crate::models::ticket::Ticket;
use crate::models::user::Customer;

/// Everything an administrator can manage, in one listing.
#[derive(Debug, Serialize, JsonSchema)]
pub struct AdminOverview {
    pub airlines: Vec<Airline>,
    pub airports: Vec<Airport>,
    pub flights: Vec<Flight>,
    pub customers: Vec<Customer>,
    pub tickets: Vec<Ticket>,
}
