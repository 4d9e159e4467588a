//! In-memory implementation of PaymentRepository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::settlement::Payment;
use crate::ports::PaymentRepository;

use super::lock;

/// In-memory implementation of the PaymentRepository port.
///
/// Enforces the one-payment-per-order invariant the same way the SQL
/// unique constraint does.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<HashMap<OrderId, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = lock(&self.payments)?;
        if payments.contains_key(&payment.order_id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Order already has a payment record",
            ));
        }
        payments.insert(payment.order_id, payment.clone());
        Ok(())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError> {
        Ok(lock(&self.payments)?.get(order_id).cloned())
    }
}
