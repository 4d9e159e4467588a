//! PostgreSQL implementation of CatalogReader.
//!
//! Read-only view over the catalog's tracks and license_options tables.

use crate::domain::foundation::{DomainError, ErrorCode, LicenseOptionId, TrackId, UserId};
use crate::ports::{CatalogReader, LicenseOption, Track};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the CatalogReader port.
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    /// Creates a new PostgresCatalogReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_track(
        &self,
        id: &TrackId,
        include_deleted: bool,
    ) -> Result<Option<Track>, DomainError> {
        let row: Option<TrackRow> = sqlx::query_as(
            r#"
            SELECT id, producer_id, title, artwork_url, preview_url, wav_url, stems_url, is_deleted
            FROM tracks
            WHERE id = $1 AND (is_deleted = FALSE OR $2)
            "#,
        )
        .bind(id.as_uuid())
        .bind(include_deleted)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find track: {}", e))
        })?;

        Ok(row.map(Track::from))
    }
}

/// Database row representation of a track.
#[derive(Debug, sqlx::FromRow)]
struct TrackRow {
    id: Uuid,
    producer_id: Uuid,
    title: String,
    artwork_url: Option<String>,
    preview_url: String,
    wav_url: Option<String>,
    stems_url: Option<String>,
    is_deleted: bool,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            id: TrackId::from_uuid(row.id),
            producer_id: UserId::from_uuid(row.producer_id),
            title: row.title,
            artwork_url: row.artwork_url,
            preview_url: row.preview_url,
            wav_url: row.wav_url,
            stems_url: row.stems_url,
            is_deleted: row.is_deleted,
        }
    }
}

/// Database row representation of a license option.
#[derive(Debug, sqlx::FromRow)]
struct LicenseOptionRow {
    id: Uuid,
    name: String,
    price: f64,
    currency: String,
}

impl From<LicenseOptionRow> for LicenseOption {
    fn from(row: LicenseOptionRow) -> Self {
        LicenseOption {
            id: LicenseOptionId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            currency: row.currency,
        }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn find_with_license_options(
        &self,
        id: &TrackId,
    ) -> Result<Option<(Track, Vec<LicenseOption>)>, DomainError> {
        let track = match self.fetch_track(id, false).await? {
            Some(track) => track,
            None => return Ok(None),
        };

        let rows: Vec<LicenseOptionRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, currency
            FROM license_options
            WHERE track_id = $1
            ORDER BY price ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load license options: {}", e),
            )
        })?;

        let options = rows.into_iter().map(LicenseOption::from).collect();
        Ok(Some((track, options)))
    }

    async fn find_by_id_including_deleted(
        &self,
        id: &TrackId,
    ) -> Result<Option<Track>, DomainError> {
        self.fetch_track(id, true).await
    }
}
