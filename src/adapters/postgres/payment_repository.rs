//! PostgreSQL implementation of PaymentRepository.
//!
//! Payments are insert-only. A unique constraint on order_id backs the
//! one-payment-per-order invariant at the storage level.

use crate::domain::foundation::{DomainError, ErrorCode, Money, OrderId, Timestamp};
use crate::domain::settlement::{Payment, PaymentInstrument};
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PaymentRepository port.
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Creates a new PostgresPaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    order_id: Uuid,
    gateway_payment_id: String,
    signature: String,
    amount_minor: i64,
    currency: String,
    status: String,
    method: Option<String>,
    card_id: Option<String>,
    bank: Option<String>,
    wallet: Option<String>,
    vpa: Option<String>,
    email: Option<String>,
    contact: Option<String>,
    error_code: Option<String>,
    error_description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            order_id: OrderId::from_uuid(row.order_id),
            gateway_payment_id: row.gateway_payment_id,
            signature: row.signature,
            amount: Money::from_minor_units(row.amount_minor, row.currency),
            status: row.status,
            instrument: PaymentInstrument {
                method: row.method,
                card_id: row.card_id,
                bank: row.bank,
                wallet: row.wallet,
                vpa: row.vpa,
                email: row.email,
                contact: row.contact,
            },
            error_code: row.error_code,
            error_description: row.error_description,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                order_id, gateway_payment_id, signature, amount_minor, currency, status,
                method, card_id, bank, wallet, vpa, email, contact,
                error_code, error_description, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(payment.order_id.as_uuid())
        .bind(&payment.gateway_payment_id)
        .bind(&payment.signature)
        .bind(payment.amount.amount_minor)
        .bind(&payment.amount.currency)
        .bind(&payment.status)
        .bind(&payment.instrument.method)
        .bind(&payment.instrument.card_id)
        .bind(&payment.instrument.bank)
        .bind(&payment.instrument.wallet)
        .bind(&payment.instrument.vpa)
        .bind(&payment.instrument.email)
        .bind(&payment.instrument.contact)
        .bind(&payment.error_code)
        .bind(&payment.error_description)
        .bind(payment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("payments_order_id_key") {
                    return DomainError::new(
                        ErrorCode::DatabaseError,
                        "Order already has a payment record",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save payment: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT order_id, gateway_payment_id, signature, amount_minor, currency, status,
                   method, card_id, bank, wallet, vpa, email, contact,
                   error_code, error_description, created_at
            FROM payments
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        Ok(row.map(Payment::from))
    }
}
