//! In-memory location store.
//!
//! The persistence layer proper is an external collaborator; this store
//! stands at that boundary for the API server, seeded from an embedded
//! TOML document (overridable via `SITE_MAP_SEED`). It implements the
//! engine's `LocationSource` and `VoteSink` traits, including the
//! server-side `released_only` scoping half of the belt-and-suspenders
//! visibility rule.

use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use site_map_engine::source::{LocationSource, SourceError, VoteDelta, VoteSink};
use site_map_geo::BoundingBox;
use site_map_site_models::{Location, SiteStatus};
use thiserror::Error;

/// Default seed data embedded at compile time.
const DEFAULT_SEED_TOML: &str = include_str!("../seed/locations.toml");

/// Errors from loading or mutating the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The seed TOML could not be parsed.
    #[error("Failed to parse seed data: {0}")]
    Seed(String),

    /// The seed file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No location with the given id exists.
    #[error("Location {id} not found")]
    NotFound {
        /// The missing location id.
        id: String,
    },
}

/// On-disk shape of a seed document.
#[derive(Debug, Deserialize)]
struct SeedDoc {
    locations: Vec<Location>,
}

/// Thread-safe in-memory location set.
pub struct SiteStore {
    locations: RwLock<Vec<Location>>,
}

impl SiteStore {
    /// Builds a store from the embedded default seed.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time
    /// guarantee, since the seed is baked into the binary and covered by
    /// tests).
    #[must_use]
    pub fn from_embedded_seed() -> Self {
        Self::from_toml_str(DEFAULT_SEED_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded locations.toml: {e}"))
    }

    /// Builds a store from a seed TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Seed`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, StoreError> {
        let doc: SeedDoc = toml::from_str(toml_str).map_err(|e| StoreError::Seed(e.to_string()))?;
        Ok(Self {
            locations: RwLock::new(doc.locations),
        })
    }

    /// Builds a store from a seed file, or the embedded default when no
    /// path is given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(path) => {
                log::info!("Loading location seed from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::from_embedded_seed()),
        }
    }

    /// Number of locations in the store.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn count(&self) -> usize {
        self.locations.read().expect("store lock poisoned").len()
    }

    /// Fetches a location by id.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Location> {
        self.locations
            .read()
            .expect("store lock poisoned")
            .iter()
            .find(|location| location.id == id)
            .cloned()
    }

    /// Inserts a newly suggested location.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn insert(&self, location: Location) {
        self.locations
            .write()
            .expect("store lock poisoned")
            .push(location);
    }

    /// Sets the workflow status of a location.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn set_status(&self, id: &str, status: SiteStatus) -> Result<Location, StoreError> {
        let mut locations = self.locations.write().expect("store lock poisoned");
        let location = locations
            .iter_mut()
            .find(|location| location.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        location.status = status;
        Ok(location.clone())
    }

    /// Sets the released flag of a location.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn set_released(&self, id: &str, released: bool) -> Result<Location, StoreError> {
        let mut locations = self.locations.write().expect("store lock poisoned");
        let location = locations
            .iter_mut()
            .find(|location| location.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        location.released = released;
        Ok(location.clone())
    }

    fn snapshot(&self, released_only: bool) -> Vec<Location> {
        self.locations
            .read()
            .expect("store lock poisoned")
            .iter()
            .filter(|location| !released_only || location.released)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LocationSource for SiteStore {
    async fn locations_in_viewport(
        &self,
        bounds: BoundingBox,
        released_only: bool,
    ) -> Result<Vec<Location>, SourceError> {
        Ok(self
            .snapshot(released_only)
            .into_iter()
            .filter(|location| {
                location
                    .coordinates
                    .is_some_and(|coordinates| bounds.contains(coordinates))
            })
            .collect())
    }

    async fn all_locations(&self, released_only: bool) -> Result<Vec<Location>, SourceError> {
        Ok(self.snapshot(released_only))
    }
}

#[async_trait]
impl VoteSink for SiteStore {
    async fn cast_vote(
        &self,
        location_id: &str,
        delta: VoteDelta,
        comment: Option<&str>,
    ) -> Result<u64, SourceError> {
        let mut locations = self.locations.write().expect("store lock poisoned");
        let location = locations
            .iter_mut()
            .find(|location| location.id == location_id)
            .ok_or_else(|| SourceError::NotFound {
                id: location_id.to_string(),
            })?;

        location.votes = delta.apply(location.votes);
        if let Some(comment) = comment {
            log::info!("Vote comment on {location_id}: {comment}");
        }
        Ok(location.votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Number of locations in the embedded seed (used in tests).
    const EXPECTED_SEED_COUNT: usize = 12;

    #[test]
    fn embedded_seed_parses() {
        let store = SiteStore::from_embedded_seed();
        assert_eq!(store.count(), EXPECTED_SEED_COUNT);
    }

    #[test]
    fn seed_ids_are_unique() {
        let store = SiteStore::from_embedded_seed();
        let locations = store.snapshot(false);
        let mut ids: Vec<&str> = locations.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_SEED_COUNT);
    }

    #[test]
    fn seed_covers_every_visibility_branch() {
        let store = SiteStore::from_embedded_seed();
        let locations = store.snapshot(false);
        assert!(locations.iter().any(|l| l.status == SiteStatus::Pending));
        assert!(
            locations
                .iter()
                .any(|l| l.status == SiteStatus::Active && !l.released)
        );
        assert!(
            locations
                .iter()
                .any(|l| l.size_class == site_map_site_models::SizeClass::RedReject)
        );
    }

    #[test]
    fn rejects_malformed_seed() {
        assert!(SiteStore::from_toml_str("locations = 5").is_err());
    }

    #[tokio::test]
    async fn released_only_scoping_excludes_unreleased() {
        let store = SiteStore::from_embedded_seed();
        let all = store.all_locations(false).await.unwrap();
        let released = store.all_locations(true).await.unwrap();
        assert!(released.len() < all.len());
        assert!(released.iter().all(|l| l.released));
    }

    #[tokio::test]
    async fn viewport_fetch_respects_bounds() {
        let store = SiteStore::from_embedded_seed();
        let austin = BoundingBox::new(-98.0, 30.0, -97.4, 30.6);
        let locations = store.locations_in_viewport(austin, true).await.unwrap();
        assert!(!locations.is_empty());
        assert!(
            locations
                .iter()
                .all(|l| l.coordinates.is_some_and(|c| austin.contains(c)))
        );
    }

    #[tokio::test]
    async fn cast_vote_adjusts_and_reports_count() {
        let store = SiteStore::from_embedded_seed();
        let before = store.get("austin-downtown").unwrap().votes;

        let up = store
            .cast_vote("austin-downtown", VoteDelta::Up, Some("Great spot"))
            .await
            .unwrap();
        assert_eq!(up, before + 1);

        let down = store
            .cast_vote("austin-downtown", VoteDelta::Down, None)
            .await
            .unwrap();
        assert_eq!(down, before);
    }

    #[tokio::test]
    async fn vote_on_unknown_location_is_not_found() {
        let store = SiteStore::from_embedded_seed();
        let result = store.cast_vote("nope", VoteDelta::Up, None).await;
        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }

    #[test]
    fn status_transition_and_release_toggle() {
        let store = SiteStore::from_embedded_seed();
        let approved = store.set_status("buda-main", SiteStatus::Active).unwrap();
        assert_eq!(approved.status, SiteStatus::Active);

        let released = store.set_released("buda-main", true).unwrap();
        assert!(released.released);

        assert!(matches!(
            store.set_status("nope", SiteStatus::Rejected),
            Err(StoreError::NotFound { .. })
        ));
    }
}
