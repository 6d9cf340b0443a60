use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::{Validate, ValidationError};

use crate::models::user::{pattern_check, validate_credit_card_number};

pub static CARD_EXPIRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry pattern"));
pub static CARD_CVV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3,4}$").expect("valid cvv pattern"));

fn validate_card_expiry(value: &str) -> Result<(), ValidationError> {
    pattern_check(&CARD_EXPIRY, value, "expiry", "Expiry must look like MM/YY")
}

fn validate_card_cvv(value: &str) -> Result<(), ValidationError> {
    pattern_check(&CARD_CVV, value, "cvv", "CVV must be 3 or 4 digits")
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassType {
    Economy,
    First,
    Business,
}

/// Lifecycle state of a ticket.
///
/// ```text
/// PENDING -> BOOKED -> CONFIRMED -> CHECKED_IN -> COMPLETED
///    |         |   \________________/   |
///    +---------+----------+-------------+--> CANCELLED
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Booked,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Booked)
                | (Booked, Confirmed)
                | (Booked, CheckedIn)
                | (Confirmed, CheckedIn)
                | (CheckedIn, Completed)
                | (Pending, Cancelled)
                | (Booked, Cancelled)
                | (Confirmed, Cancelled)
                | (CheckedIn, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether a ticket in this state has been counted against its flight's
    /// remaining seats.
    pub fn holds_seat(self) -> bool {
        matches!(
            self,
            BookingStatus::Booked
                | BookingStatus::Confirmed
                | BookingStatus::CheckedIn
                | BookingStatus::Completed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_id: i64,
    pub flight_id: i64,
    pub class_type: ClassType,
    pub seat_number: String,
    pub booking_status: BookingStatus,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Seats are free text; only surrounding whitespace and case are normalized.
pub fn normalize_seat(seat: &str) -> String {
    seat.trim().to_uppercase()
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct PurchaseRequest {
    pub flight_id: i64,
    pub class_type: ClassType,
    #[validate(length(max = 8, message = "Seat Number is too long"))]
    pub seat_number: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct PaymentDetails {
    #[validate(custom(function = "validate_credit_card_number"))]
    pub card_number: String,
    #[validate(custom(function = "validate_card_expiry"))]
    pub expiry: String,
    #[validate(custom(function = "validate_card_cvv"))]
    pub cvv: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct EditTicketRequest {
    #[validate(length(max = 8, message = "Seat Number is too long"))]
    pub seat_number: String,
    pub class_type: ClassType,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct AdminTicketRequest {
    pub customer_id: i64,
    pub flight_id: i64,
    pub class_type: ClassType,
    #[validate(length(max = 8, message = "Seat Number is too long"))]
    pub seat_number: String,
    /// Defaults to BOOKED for new tickets.
    pub booking_status: Option<BookingStatus>,
    pub price: Decimal,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TicketResponse {
    pub ticket: Ticket,
    pub flight_details: String,
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;
    use super::*;

    const ALL: [BookingStatus; 6] = [Pending, Booked, Confirmed, CheckedIn, Completed, Cancelled];

    #[test]
    fn happy_path_is_allowed() {
        assert!(Pending.can_transition_to(Booked));
        assert!(Booked.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(CheckedIn.can_transition_to(Completed));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for next in ALL {
            assert!(!Cancelled.can_transition_to(next), "CANCELLED -> {next}");
            assert!(!Completed.can_transition_to(next), "COMPLETED -> {next}");
        }
    }

    #[test]
    fn no_reentry_into_earlier_states() {
        assert!(!Booked.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Booked));
        assert!(!CheckedIn.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Confirmed));
    }

    #[test]
    fn every_live_state_can_be_cancelled() {
        for status in ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(Cancelled), "{status} -> CANCELLED");
        }
    }

    #[test]
    fn pending_does_not_hold_a_seat() {
        assert!(!Pending.holds_seat());
        assert!(!Cancelled.holds_seat());
        assert!(Booked.holds_seat());
        assert!(Completed.holds_seat());
    }

    #[test]
    fn statuses_round_trip_through_their_column_names() {
        assert_eq!(CheckedIn.to_string(), "CHECKED_IN");
        assert_eq!("CHECKED_IN".parse::<BookingStatus>().ok(), Some(CheckedIn));
        assert_eq!(ClassType::Business.to_string(), "BUSINESS");
    }

    #[test]
    fn payment_details_formats() {
        let mut details = PaymentDetails {
            card_number: "4111111111111111".to_string(),
            expiry: "09/27".to_string(),
            cvv: "123".to_string(),
        };
        assert!(details.validate().is_ok());
        details.expiry = "13/27".to_string();
        assert!(details.validate().is_err());
        details.expiry = "12/27".to_string();
        details.cvv = "12".to_string();
        assert!(details.validate().is_err());
    }

    #[test]
    fn payment_details_schema_lists_card_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(PaymentDetails)).unwrap();
        for field in ["card_number", "expiry", "cvv"] {
            assert!(schema["properties"][field].is_object(), "{field}");
        }
    }
}
