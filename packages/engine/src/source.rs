//! Boundary traits for the external data collaborators.
//!
//! The engine never talks to a database or network itself. Location reads
//! and vote writes go through these traits; the server wires them to its
//! store, tests wire them to stubs. Both fetch paths are asynchronous,
//! cancellable (callers discard superseded results via the session's
//! generation tags), and read-only.

use async_trait::async_trait;
use site_map_geo::BoundingBox;
use site_map_site_models::Location;
use thiserror::Error;

/// Errors surfaced by a location source or vote sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// No location with the given id exists.
    #[error("Location {id} not found")]
    NotFound {
        /// The missing location id.
        id: String,
    },

    /// The collaborator failed (network, server, storage).
    #[error("Source unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Direction of a vote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDelta {
    /// Cast a vote (+1).
    Up,
    /// Retract a vote (-1). Counts never go below zero.
    Down,
}

impl VoteDelta {
    /// Applies this delta to a vote count.
    #[must_use]
    pub const fn apply(self, votes: u64) -> u64 {
        match self {
            Self::Up => votes + 1,
            Self::Down => votes.saturating_sub(1),
        }
    }
}

/// Read-only source of location records.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Fetches locations within a bounding box (Location tier).
    ///
    /// `released_only` is the server-side half of the belt-and-suspenders
    /// visibility rule: non-admin requests pass `true` so unreleased rows
    /// never leave the collaborator, and the client-side filter enforces
    /// the same rule independently.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the collaborator fails.
    async fn locations_in_viewport(
        &self,
        bounds: BoundingBox,
        released_only: bool,
    ) -> Result<Vec<Location>, SourceError>;

    /// Fetches all locations nationwide (City tier).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the collaborator fails.
    async fn all_locations(&self, released_only: bool) -> Result<Vec<Location>, SourceError>;
}

/// Write path for vote mutations.
#[async_trait]
pub trait VoteSink: Send + Sync {
    /// Casts or retracts a vote, returning the authoritative new count.
    ///
    /// Callers apply an optimistic local adjustment before awaiting and
    /// reconcile or roll back afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] for unknown ids, or
    /// [`SourceError::Unavailable`] if the collaborator fails.
    async fn cast_vote(
        &self,
        location_id: &str,
        delta: VoteDelta,
        comment: Option<&str>,
    ) -> Result<u64, SourceError>;
}
