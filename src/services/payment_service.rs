use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::ticket::PaymentDetails;
use crate::utils::error::AppResult;

/// Charges a customer for a ticket. `Ok(false)` means the charge was declined.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(&self, ticket_id: &str, amount: Decimal, details: &PaymentDetails) -> AppResult<bool>;
}

/// Stand-in processor that approves every well-formed payment.
pub struct AcceptAllPayments;

#[async_trait]
impl PaymentProcessor for AcceptAllPayments {
    async fn charge(&self, ticket_id: &str, amount: Decimal, _details: &PaymentDetails) -> AppResult<bool> {
        tracing::debug!(ticket_id, %amount, "payment approved");
        Ok(true)
    }
}
