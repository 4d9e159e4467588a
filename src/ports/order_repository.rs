//! Order repository port.
//!
//! Defines the contract for persisting orders and moving them through their
//! lifecycle. The conditional `transition_status` operation is the single
//! point where a settlement commit is decided: it must be atomic at the row
//! level so that at most one caller wins the `Pending -> Paid` move.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, UserId};
use crate::domain::settlement::{Order, OrderStatus};

/// Repository port for Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, order: &Order) -> Result<(), DomainError>;

    /// Finds an order by its id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Atomically moves an order from `from` to `to`.
    ///
    /// Implemented as a single conditional write (`UPDATE ... WHERE
    /// status = from`). Returns `true` if a row changed, `false` if the
    /// order was no longer in `from` - the caller uses the `false` case to
    /// detect a lost settlement race.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError>;

    /// Lists a buyer's orders, newest first.
    async fn find_by_buyer(
        &self,
        buyer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError>;

    /// Lists orders placed against a producer's tracks, newest first.
    async fn find_by_producer(
        &self,
        producer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError>;
}
