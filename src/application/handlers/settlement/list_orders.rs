//! Order listing query handlers.
//!
//! Two views over the same order store: a buyer sees the orders they
//! placed, a producer sees the orders placed against their tracks. Both are
//! page-number listings, newest first.

use std::sync::Arc;

use crate::application::pagination::Page;
use crate::domain::foundation::UserId;
use crate::domain::settlement::{Order, SettlementError};
use crate::ports::OrderRepository;

/// Handler for the buyer's own order history.
pub struct ListBuyerOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

impl ListBuyerOrdersHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(
        &self,
        buyer_id: UserId,
        page: Page,
    ) -> Result<Vec<Order>, SettlementError> {
        let orders = self
            .orders
            .find_by_buyer(&buyer_id, page.limit(), page.offset())
            .await?;
        Ok(orders)
    }
}

/// Handler for the sales view: orders placed against a producer's tracks.
pub struct ListProducerOrdersHandler {
    orders: Arc<dyn OrderRepository>,
}

impl ListProducerOrdersHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(
        &self,
        producer_id: UserId,
        page: Page,
    ) -> Result<Vec<Order>, SettlementError> {
        let orders = self
            .orders
            .find_by_producer(&producer_id, page.limit(), page.offset())
            .await?;
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::settlement::test_support::{
        pending_order, MockOrderRepository,
    };
    use crate::application::pagination::PER_PAGE;

    #[tokio::test]
    async fn buyer_sees_only_their_own_orders() {
        let buyer = UserId::new();
        let mut mine = pending_order();
        mine.buyer_id = buyer;
        let theirs = pending_order();

        let orders = Arc::new(MockOrderRepository::new());
        orders.seed(mine.clone());
        orders.seed(theirs);

        let handler = ListBuyerOrdersHandler::new(orders);
        let listed = handler.handle(buyer, Page::default()).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
    }

    #[tokio::test]
    async fn empty_history_lists_nothing() {
        let orders = Arc::new(MockOrderRepository::new());
        let handler = ListBuyerOrdersHandler::new(orders);

        let listed = handler.handle(UserId::new(), Page::default()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn pages_past_the_history_are_empty_not_errors() {
        let buyer = UserId::new();
        let mut order = pending_order();
        order.buyer_id = buyer;

        let orders = Arc::new(MockOrderRepository::new());
        orders.seed(order);

        let handler = ListBuyerOrdersHandler::new(orders);
        let listed = handler.handle(buyer, Page::from_number(5)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn buyer_pages_are_capped_at_per_page() {
        let buyer = UserId::new();
        let orders = Arc::new(MockOrderRepository::new());
        for _ in 0..(PER_PAGE + 3) {
            let mut order = pending_order();
            order.buyer_id = buyer;
            orders.seed(order);
        }

        let handler = ListBuyerOrdersHandler::new(orders);
        let first = handler.handle(buyer, Page::from_number(1)).await.unwrap();
        let second = handler.handle(buyer, Page::from_number(2)).await.unwrap();

        assert_eq!(first.len() as i64, PER_PAGE);
        assert_eq!(second.len(), 3);
    }

    #[tokio::test]
    async fn producer_sees_orders_against_their_tracks() {
        let producer = UserId::new();
        let order = pending_order();
        let other = pending_order();

        let orders = Arc::new(MockOrderRepository::new());
        orders.link_track_producer(order.track_id, producer);
        orders.seed(order.clone());
        orders.seed(other);

        let handler = ListProducerOrdersHandler::new(orders);
        let listed = handler.handle(producer, Page::default()).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, order.id);
    }
}
