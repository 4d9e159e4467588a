//! VerifyPaymentHandler - Command handler for payment verification and
//! license issuance.
//!
//! This is the security- and correctness-critical path of the settlement
//! engine. The caller relays a gateway payment id and signature after
//! completing checkout client-side; the handler trusts neither until the
//! HMAC signature verifies, then consults the gateway's own payment record
//! before committing. The commit itself is a conditional `Pending -> Paid`
//! status transition, so at most one settlement commits per order even under
//! concurrent verification calls.

use std::sync::Arc;

use crate::domain::foundation::{LicenseId, OrderId};
use crate::domain::settlement::{
    License, Order, OrderStatus, Payment, PaymentSignatureVerifier, SettlementError,
    CAPTURED_STATUS,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    CatalogReader, LicenseRepository, OrderRepository, PaymentGateway, PaymentRepository,
};

/// Command to verify a completed checkout and issue its license.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    pub order_id: OrderId,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Handler for payment verification and license issuance.
pub struct VerifyPaymentHandler {
    orders: Arc<dyn OrderRepository>,
    payments: Arc<dyn PaymentRepository>,
    licenses: Arc<dyn LicenseRepository>,
    catalog: Arc<dyn CatalogReader>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: PaymentSignatureVerifier,
}

impl VerifyPaymentHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        payments: Arc<dyn PaymentRepository>,
        licenses: Arc<dyn LicenseRepository>,
        catalog: Arc<dyn CatalogReader>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: PaymentSignatureVerifier,
    ) -> Self {
        Self {
            orders,
            payments,
            licenses,
            catalog,
            gateway,
            verifier,
        }
    }

    pub async fn handle(&self, cmd: VerifyPaymentCommand) -> Result<License, SettlementError> {
        // 1. Load the order
        let order = self
            .orders
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or_else(|| SettlementError::order_not_found(cmd.order_id))?;

        // 2. Idempotency gate: a settled order is never re-issued and never
        //    moved to an error state by a duplicate submission.
        if order.is_paid() {
            return Err(SettlementError::already_processed(order.id));
        }

        // 3. Expiry gate
        if order.is_expired_at(Timestamp::now()) {
            return Err(self
                .fail_order(order.id, SettlementError::expired(order.id))
                .await);
        }

        // 4. State sanity gate: verification needs a pending order that is
        //    linked to a remote gateway order.
        if order.status != OrderStatus::Pending {
            return Err(SettlementError::invalid_order_state(
                order.id,
                format!("{:?}", order.status).to_lowercase(),
            ));
        }
        let remote_order_id = match order.gateway_order_id.as_deref() {
            Some(id) => id,
            None => {
                return Err(SettlementError::invalid_order_state(
                    order.id,
                    "pending without gateway reference",
                ))
            }
        };

        // 5. Signature gate. Runs before any trust in caller-supplied
        //    payment data; the signature, not the client's say-so, is the
        //    authorization for what follows.
        if let Err(err) = self
            .verifier
            .verify(remote_order_id, &cmd.gateway_payment_id, &cmd.signature)
        {
            return Err(self.fail_order(order.id, err).await);
        }

        // 6. Authoritative fetch. A replayed signature pair can be valid
        //    without the charge having settled, so the gateway's own record
        //    decides whether money actually moved.
        let gateway_payment = self
            .gateway
            .fetch_payment(&cmd.gateway_payment_id)
            .await
            .map_err(|e| SettlementError::gateway_failed(e.to_string()))?;

        if gateway_payment.status != CAPTURED_STATUS {
            return Err(self
                .fail_order(
                    order.id,
                    SettlementError::payment_not_captured(gateway_payment.status.clone()),
                )
                .await);
        }

        // 7. Commit. The conditional transition is the settlement decision
        //    point: losing it means another verification already committed.
        let won = self
            .orders
            .transition_status(&order.id, OrderStatus::Pending, OrderStatus::Paid)
            .await?;
        if !won {
            return Err(SettlementError::already_processed(order.id));
        }

        let payment = Payment::record(
            order.id,
            cmd.gateway_payment_id.clone(),
            cmd.signature.clone(),
            gateway_payment.amount.clone(),
            gateway_payment.status.clone(),
            gateway_payment.instrument.clone(),
            gateway_payment.error_code.clone(),
            gateway_payment.error_description.clone(),
        );
        if let Err(err) = self.payments.create(&payment).await {
            let err = SettlementError::unreconciled(
                SettlementError::storage(format!("payment record write failed: {}", err)),
                "order already marked paid; manual reconciliation required",
            );
            tracing::error!(order_id = %order.id, error = %err, "settlement commit incomplete");
            return Err(err);
        }

        match self.issue_license(&order).await {
            Ok(license) => {
                tracing::info!(
                    order_id = %order.id,
                    license_id = %license.id,
                    "payment verified and license issued"
                );
                Ok(license)
            }
            Err(err) => {
                let err = SettlementError::unreconciled(
                    err,
                    "order already marked paid; manual reconciliation required",
                );
                tracing::error!(order_id = %order.id, error = %err, "settlement commit incomplete");
                Err(err)
            }
        }
    }

    /// Issues the single license for a settled order.
    ///
    /// Re-resolves the track and its options fresh rather than reusing
    /// order-creation state: a renamed license option gets its current name
    /// while the immutable option id keeps the binding.
    async fn issue_license(&self, order: &Order) -> Result<License, SettlementError> {
        let option_id = order.notes.license_option_id()?;

        let (track, options) = self
            .catalog
            .find_with_license_options(&order.track_id)
            .await?
            .ok_or_else(|| SettlementError::track_not_found(order.track_id))?;

        let option = options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or_else(|| SettlementError::license_option_not_found(option_id.to_string()))?;

        let license = License::issue(
            LicenseId::new(),
            order.id,
            order.buyer_id,
            track.id,
            option.id,
            option.name.clone(),
            order.amount.clone(),
        );
        self.licenses.create(&license).await?;

        Ok(license)
    }

    /// Best-effort move of a failed verification's order to `Failed`.
    ///
    /// Returns the primary error unchanged when the transition persists (or
    /// was already overtaken), and the distinct compound error when the
    /// status write itself fails, since the caller must know the order row
    /// may be left inconsistent.
    async fn fail_order(&self, order_id: OrderId, primary: SettlementError) -> SettlementError {
        match self
            .orders
            .transition_status(&order_id, OrderStatus::Pending, OrderStatus::Failed)
            .await
        {
            Ok(_) => primary,
            Err(cause) => {
                tracing::error!(
                    order_id = %order_id,
                    error = %cause,
                    "failed to record order failure"
                );
                SettlementError::unreconciled(primary, cause.to_string())
            }
        }
    }
}
