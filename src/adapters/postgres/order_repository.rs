//! PostgreSQL implementation of OrderRepository.
//!
//! The conditional status move is a single `UPDATE ... WHERE status = $from`
//! so the row's own visibility rules decide the settlement race; no advisory
//! locks or transactions are needed around it.

use crate::domain::foundation::{DomainError, ErrorCode, Money, OrderId, Timestamp, TrackId, UserId};
use crate::domain::settlement::{Order, OrderNotes, OrderStatus};
use crate::ports::OrderRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgresOrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    buyer_id: Uuid,
    track_id: Uuid,
    license_type: String,
    amount_minor: i64,
    currency: String,
    gateway_order_id: Option<String>,
    status: String,
    notes: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let notes: OrderNotes = serde_json::from_value(row.notes).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid order notes: {}", e),
            )
        })?;

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            buyer_id: UserId::from_uuid(row.buyer_id),
            track_id: TrackId::from_uuid(row.track_id),
            license_type: row.license_type,
            amount: Money::from_minor_units(row.amount_minor, row.currency),
            gateway_order_id: row.gateway_order_id,
            status,
            notes,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, DomainError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "processing" => Ok(OrderStatus::Processing),
        "paid" => Ok(OrderStatus::Paid),
        "failed" => Ok(OrderStatus::Failed),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid order status value: {}", s),
        )),
    }
}

fn status_to_string(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Processing => "processing",
        OrderStatus::Paid => "paid",
        OrderStatus::Failed => "failed",
        OrderStatus::Cancelled => "cancelled",
    }
}

const ORDER_COLUMNS: &str = "id, buyer_id, track_id, license_type, amount_minor, currency, \
     gateway_order_id, status, notes, created_at, updated_at, expires_at";

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        let notes = serde_json::to_value(&order.notes).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode order notes: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, buyer_id, track_id, license_type, amount_minor, currency,
                gateway_order_id, status, notes, created_at, updated_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.buyer_id.as_uuid())
        .bind(order.track_id.as_uuid())
        .bind(&order.license_type)
        .bind(order.amount.amount_minor)
        .bind(&order.amount.currency)
        .bind(&order.gateway_order_id)
        .bind(status_to_string(&order.status))
        .bind(notes)
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .bind(order.expires_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save order: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to find order: {}", e))
            })?;

        row.map(Order::try_from).transpose()
    }

    async fn transition_status(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(status_to_string(&from))
        .bind(status_to_string(&to))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update order status: {}", e),
            )
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_buyer(
        &self,
        buyer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM orders
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            ORDER_COLUMNS
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(buyer_id.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to list orders: {}", e))
            })?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_by_producer(
        &self,
        producer_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM orders o
            WHERE EXISTS (
                SELECT 1 FROM tracks t
                WHERE t.id = o.track_id AND t.producer_id = $1
            )
            ORDER BY o.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            "o.id, o.buyer_id, o.track_id, o.license_type, o.amount_minor, o.currency, \
             o.gateway_order_id, o.status, o.notes, o.created_at, o.updated_at, o.expires_at"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(producer_id.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to list sales: {}", e))
            })?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Paid,
            OrderStatus::Failed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(parse_status(status_to_string(&status)).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!(parse_status("refunded").is_err());
        assert!(parse_status("PENDING").is_err());
    }
}
