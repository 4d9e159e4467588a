//! CreateOrderHandler - Command handler for opening a purchase order.

use std::sync::Arc;

use crate::domain::foundation::{LicenseOptionId, OrderId, TrackId, UserId};
use crate::domain::settlement::{Order, SettlementError};
use crate::ports::{CatalogReader, OrderRepository, PaymentGateway};

/// Command to open an order for one license option on one track.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub buyer_id: UserId,
    pub track_id: TrackId,
    pub license_option_id: LicenseOptionId,
}

/// Handler for order creation.
///
/// Resolves the track and license option, opens a matching remote order at
/// the payment gateway, and persists a local `Pending` order carrying the
/// chosen option id and a fixed expiry window. No concurrency guard is
/// taken: duplicate concurrent calls simply create independent pending
/// orders.
pub struct CreateOrderHandler {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogReader>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CreateOrderHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogReader>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            orders,
            catalog,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<Order, SettlementError> {
        // 1. Resolve the track and its license options
        let (_track, options) = self
            .catalog
            .find_with_license_options(&cmd.track_id)
            .await?
            .ok_or_else(|| SettlementError::track_not_found(cmd.track_id))?;

        // 2. The chosen option must belong to the track
        let option = options
            .iter()
            .find(|o| o.id == cmd.license_option_id)
            .ok_or_else(|| {
                SettlementError::license_option_not_found(cmd.license_option_id.to_string())
            })?;

        // 3. Open the remote gateway order in minor units
        let amount = option.charge_amount();
        let gateway_order_id = self
            .gateway
            .create_remote_order(&amount)
            .await
            .map_err(|e| SettlementError::gateway_failed(e.to_string()))?;

        // 4. Persist the local pending order
        let order = Order::create_pending(
            OrderId::new(),
            cmd.buyer_id,
            cmd.track_id,
            option.id,
            option.name.clone(),
            amount,
            gateway_order_id,
        );
        self.orders.create(&order).await?;

        tracing::debug!(
            order_id = %order.id,
            track_id = %order.track_id,
            amount = %order.amount,
            "order opened"
        );

        Ok(order)
    }
}
