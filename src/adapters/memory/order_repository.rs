//! In-memory implementation of OrderRepository.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, Timestamp, UserId};
use crate::domain::settlement::{Order, OrderStatus};
use crate::ports::OrderRepository;

use super::{lock, InMemoryCatalogReader};

/// In-memory implementation of the OrderRepository port.
///
/// Holds a catalog handle so the producer listing can resolve track
/// ownership the way the SQL join does.
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
    catalog: Arc<InMemoryCatalogReader>,
}

impl InMemoryOrderRepository {
    pub fn new(catalog: Arc<InMemoryCatalogReader>) -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
            catalog,
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        lock(&self.orders)?.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(lock(&self.orders)?.get(id).cloned())
    }

    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut orders = lock(&self.orders)?;
        match orders.get_mut(id) {
            Some(order) if order.status == from => {
                order.status = to;
                order.updated_at = Timestamp::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_buyer(
        &self,
        buyer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let orders = lock(&self.orders)?;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.buyer_id == *buyer_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matching, limit, offset))
    }

    async fn find_by_producer(
        &self,
        producer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let orders = lock(&self.orders)?;
        let mut matching = Vec::new();
        for order in orders.values() {
            let owner = self.catalog.producer_of(&order.track_id)?;
            if owner.as_ref() == Some(producer_id) {
                matching.push(order.clone());
            }
        }
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matching, limit, offset))
    }
}

fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}
