//! CancelOrderHandler - Command handler for buyer-initiated abandonment.
//!
//! Cancellation uses the same conditional-transition primitive as the
//! settlement commit, so a cancellation racing a concurrent payment
//! verification can never claw back a paid order.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, UserId};
use crate::domain::settlement::{Order, OrderStatus, SettlementError};
use crate::ports::OrderRepository;

/// Command to abandon a pending order.
#[derive(Debug, Clone)]
pub struct CancelOrderCommand {
    pub buyer_id: UserId,
    pub order_id: OrderId,
}

/// Handler for order cancellation.
pub struct CancelOrderHandler {
    orders: Arc<dyn OrderRepository>,
}

impl CancelOrderHandler {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, cmd: CancelOrderCommand) -> Result<Order, SettlementError> {
        let order = self
            .orders
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or_else(|| SettlementError::order_not_found(cmd.order_id))?;

        if order.buyer_id != cmd.buyer_id {
            return Err(SettlementError::Unauthorized);
        }
        if order.is_paid() {
            return Err(SettlementError::already_processed(order.id));
        }
        if order.status != OrderStatus::Pending {
            return Err(SettlementError::invalid_order_state(
                order.id,
                format!("{:?}", order.status).to_lowercase(),
            ));
        }

        let won = self
            .orders
            .transition_status(&order.id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?;
        if !won {
            // Settled or failed between the read and the write.
            return Err(SettlementError::already_processed(order.id));
        }

        tracing::debug!(order_id = %order.id, "order cancelled");

        Ok(Order {
            status: OrderStatus::Cancelled,
            ..order
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::settlement::test_support::{
        pending_order, MockOrderRepository,
    };

    fn command_for(order: &Order) -> CancelOrderCommand {
        CancelOrderCommand {
            buyer_id: order.buyer_id,
            order_id: order.id,
        }
    }

    #[tokio::test]
    async fn buyer_cancels_their_pending_order() {
        let order = pending_order();
        let orders = Arc::new(MockOrderRepository::with_order(order.clone()));
        let handler = CancelOrderHandler::new(orders.clone());

        let cancelled = handler.handle(command_for(&order)).await.unwrap();

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(
            orders.status_of(&order.id).unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn non_owner_cannot_cancel() {
        let order = pending_order();
        let orders = Arc::new(MockOrderRepository::with_order(order.clone()));
        let handler = CancelOrderHandler::new(orders.clone());

        let cmd = CancelOrderCommand {
            buyer_id: UserId::new(),
            order_id: order.id,
        };
        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(SettlementError::Unauthorized)));
        assert_eq!(orders.status_of(&order.id).unwrap(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn paid_order_cannot_be_cancelled() {
        let mut order = pending_order();
        order.status = OrderStatus::Paid;
        let orders = Arc::new(MockOrderRepository::with_order(order.clone()));
        let handler = CancelOrderHandler::new(orders.clone());

        let result = handler.handle(command_for(&order)).await;

        assert!(matches!(
            result,
            Err(SettlementError::OrderAlreadyProcessed(_))
        ));
        assert_eq!(orders.status_of(&order.id).unwrap(), OrderStatus::Paid);
    }

    #[tokio::test]
    async fn failed_order_cannot_be_cancelled() {
        let mut order = pending_order();
        order.status = OrderStatus::Failed;
        let orders = Arc::new(MockOrderRepository::with_order(order.clone()));
        let handler = CancelOrderHandler::new(orders);

        let result = handler.handle(command_for(&order)).await;
        assert!(matches!(
            result,
            Err(SettlementError::InvalidOrderState { .. })
        ));
    }

    #[tokio::test]
    async fn lost_cancellation_race_reports_already_processed() {
        let order = pending_order();
        let orders = Arc::new(MockOrderRepository::with_order(order.clone()));
        orders.lose_next_transition();
        let handler = CancelOrderHandler::new(orders);

        let result = handler.handle(command_for(&order)).await;
        assert!(matches!(
            result,
            Err(SettlementError::OrderAlreadyProcessed(_))
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_rejected() {
        let orders = Arc::new(MockOrderRepository::new());
        let handler = CancelOrderHandler::new(orders);

        let cmd = CancelOrderCommand {
            buyer_id: UserId::new(),
            order_id: OrderId::new(),
        };
        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(SettlementError::OrderNotFound(_))));
    }
}
