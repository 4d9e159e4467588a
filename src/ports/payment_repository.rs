//! Payment repository port.
//!
//! Payments are written exactly once, immediately after the order's
//! terminal transition to `Paid`, and never mutated afterward.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::settlement::Payment;

/// Repository port for immutable Payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Persists a payment record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (including a second write
    ///   for the same order, which the unique order constraint rejects)
    async fn create(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Finds the payment settling an order, if any.
    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
