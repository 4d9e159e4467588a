//! PostgreSQL implementation of LicenseRepository.
//!
//! The listing query joins the catalog's tracks table for the denormalized
//! display fields; deleted tracks still join, so purchases never vanish from
//! the buyer's collection.

use crate::domain::foundation::{
    DomainError, ErrorCode, LicenseId, LicenseOptionId, Money, OrderId, Timestamp, TrackId, UserId,
};
use crate::domain::settlement::License;
use crate::ports::{LicenseListFilter, LicenseRepository, LicenseSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the LicenseRepository port.
pub struct PostgresLicenseRepository {
    pool: PgPool,
}

impl PostgresLicenseRepository {
    /// Creates a new PostgresLicenseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a license.
#[derive(Debug, sqlx::FromRow)]
struct LicenseRow {
    id: Uuid,
    order_id: Uuid,
    buyer_id: Uuid,
    track_id: Uuid,
    license_option_id: Uuid,
    license_type: String,
    purchase_price_minor: i64,
    currency: String,
    license_key: String,
    is_active: bool,
    is_revoked: bool,
    revoked_reason: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    downloads: i64,
    last_downloaded_at: Option<DateTime<Utc>>,
    issued_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LicenseRow> for License {
    fn from(row: LicenseRow) -> Self {
        License {
            id: LicenseId::from_uuid(row.id),
            order_id: OrderId::from_uuid(row.order_id),
            buyer_id: UserId::from_uuid(row.buyer_id),
            track_id: TrackId::from_uuid(row.track_id),
            license_option_id: LicenseOptionId::from_uuid(row.license_option_id),
            license_type: row.license_type,
            purchase_price: Money::from_minor_units(row.purchase_price_minor, row.currency),
            license_key: row.license_key,
            is_active: row.is_active,
            is_revoked: row.is_revoked,
            revoked_reason: row.revoked_reason,
            revoked_at: row.revoked_at.map(Timestamp::from_datetime),
            downloads: row.downloads,
            last_downloaded_at: row.last_downloaded_at.map(Timestamp::from_datetime),
            issued_at: Timestamp::from_datetime(row.issued_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

/// Listing row: license columns plus the joined track display fields.
#[derive(Debug, sqlx::FromRow)]
struct LicenseSummaryRow {
    #[sqlx(flatten)]
    license: LicenseRow,
    track_title: String,
    artwork_url: Option<String>,
}

const LICENSE_COLUMNS: &str = "l.id, l.order_id, l.buyer_id, l.track_id, l.license_option_id, \
     l.license_type, l.purchase_price_minor, l.currency, l.license_key, \
     l.is_active, l.is_revoked, l.revoked_reason, l.revoked_at, \
     l.downloads, l.last_downloaded_at, l.issued_at, l.created_at, l.updated_at";

#[async_trait]
impl LicenseRepository for PostgresLicenseRepository {
    async fn create(&self, license: &License) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO licenses (
                id, order_id, buyer_id, track_id, license_option_id, license_type,
                purchase_price_minor, currency, license_key, is_active, is_revoked,
                revoked_reason, revoked_at, downloads, last_downloaded_at,
                issued_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(license.id.as_uuid())
        .bind(license.order_id.as_uuid())
        .bind(license.buyer_id.as_uuid())
        .bind(license.track_id.as_uuid())
        .bind(license.license_option_id.as_uuid())
        .bind(&license.license_type)
        .bind(license.purchase_price.amount_minor)
        .bind(&license.purchase_price.currency)
        .bind(&license.license_key)
        .bind(license.is_active)
        .bind(license.is_revoked)
        .bind(&license.revoked_reason)
        .bind(license.revoked_at.as_ref().map(Timestamp::as_datetime))
        .bind(license.downloads)
        .bind(license.last_downloaded_at.as_ref().map(Timestamp::as_datetime))
        .bind(license.issued_at.as_datetime())
        .bind(license.created_at.as_datetime())
        .bind(license.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("licenses_order_id_key") {
                    return DomainError::new(
                        ErrorCode::DatabaseError,
                        "Order already has a license",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save license: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &LicenseId) -> Result<Option<License>, DomainError> {
        let sql = format!("SELECT {} FROM licenses l WHERE l.id = $1", LICENSE_COLUMNS);
        let row: Option<LicenseRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to find license: {}", e),
                )
            })?;

        Ok(row.map(License::from))
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Option<License>, DomainError> {
        let sql = format!(
            "SELECT {} FROM licenses l WHERE l.order_id = $1",
            LICENSE_COLUMNS
        );
        let row: Option<LicenseRow> = sqlx::query_as(&sql)
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to find license: {}", e),
                )
            })?;

        Ok(row.map(License::from))
    }

    async fn record_download(&self, id: &LicenseId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE licenses
            SET downloads = downloads + 1,
                last_downloaded_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record download: {}", e),
            )
        })?;

        Ok(())
    }

    async fn list_for_buyer(
        &self,
        buyer_id: &UserId,
        filter: &LicenseListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LicenseSummary>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}, t.title AS track_title, t.artwork_url
            FROM licenses l
            JOIN tracks t ON t.id = l.track_id
            WHERE l.buyer_id = $1
              AND ($2::text IS NULL OR t.title ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR l.license_type = $3)
            ORDER BY l.issued_at DESC
            LIMIT $4 OFFSET $5
            "#,
            LICENSE_COLUMNS
        );
        let rows: Vec<LicenseSummaryRow> = sqlx::query_as(&sql)
            .bind(buyer_id.as_uuid())
            .bind(&filter.title_search)
            .bind(&filter.license_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to list licenses: {}", e),
                )
            })?;

        Ok(rows
            .into_iter()
            .map(|row| LicenseSummary {
                license: License::from(row.license),
                track_title: row.track_title,
                artwork_url: row.artwork_url,
            })
            .collect())
    }
}
