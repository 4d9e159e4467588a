//! In-memory implementation of CatalogReader.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TrackId, UserId};
use crate::ports::{CatalogReader, LicenseOption, Track};

use super::lock;

/// In-memory implementation of the CatalogReader port.
///
/// Also serves as the seedable catalog fixture for the other in-memory
/// adapters that need track ownership or display fields.
#[derive(Default)]
pub struct InMemoryCatalogReader {
    tracks: Mutex<HashMap<TrackId, (Track, Vec<LicenseOption>)>>,
}

impl InMemoryCatalogReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a track with its license options.
    pub fn insert_track(&self, track: Track, options: Vec<LicenseOption>) {
        if let Ok(mut tracks) = self.tracks.lock() {
            tracks.insert(track.id, (track, options));
        }
    }

    /// Marks a seeded track as soft-deleted.
    pub fn soft_delete(&self, id: &TrackId) {
        if let Ok(mut tracks) = self.tracks.lock() {
            if let Some((track, _)) = tracks.get_mut(id) {
                track.is_deleted = true;
            }
        }
    }

    /// Resolves the producer owning a track, deleted or not.
    pub(super) fn producer_of(&self, id: &TrackId) -> Result<Option<UserId>, DomainError> {
        Ok(lock(&self.tracks)?.get(id).map(|(t, _)| t.producer_id))
    }

    /// Resolves the display fields for a track, deleted or not.
    pub(super) fn display_fields(
        &self,
        id: &TrackId,
    ) -> Result<Option<(String, Option<String>)>, DomainError> {
        Ok(lock(&self.tracks)?
            .get(id)
            .map(|(t, _)| (t.title.clone(), t.artwork_url.clone())))
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalogReader {
    async fn find_with_license_options(
        &self,
        id: &TrackId,
    ) -> Result<Option<(Track, Vec<LicenseOption>)>, DomainError> {
        Ok(lock(&self.tracks)?
            .get(id)
            .filter(|(track, _)| !track.is_deleted)
            .cloned())
    }

    async fn find_by_id_including_deleted(
        &self,
        id: &TrackId,
    ) -> Result<Option<Track>, DomainError> {
        Ok(lock(&self.tracks)?.get(id).map(|(track, _)| track.clone()))
    }
}
