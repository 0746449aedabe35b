//! The map view session: tier selection, fetch lifecycle, and rendering
//! state for one viewer.
//!
//! `MapSession` is the single-threaded controller that the rendering
//! surface drives. It owns the last successfully fetched location set and
//! recomputes the filtered, ranked, paginated view from it on every
//! input change. Outbound fetches are represented as tickets tagged with
//! a generation counter: when a viewport moves again before the previous
//! fetch resolves, the old ticket's result is discarded on arrival
//! (last-viewport-wins), never applied out of order.
//!
//! Vote mutations follow the same ticket shape: the local count is
//! adjusted optimistically when the vote begins and reconciled to the
//! collaborator's authoritative count — or rolled back — when it
//! resolves.

use site_map_geo::{BoundingBox, Viewport};
use site_map_metro::{Gazetteer, consolidate};
use site_map_site_models::{CityBubble, FilterState, Location, ViewerRole};

use crate::EngineError;
use crate::config::EngineConfig;
use crate::page::Pager;
use crate::rank::{rank_bubbles, rank_locations};
use crate::source::{LocationSource, SourceError, VoteDelta};
use crate::tier::Tier;
use crate::visibility::{VisibilityPolicy, visible_locations};

/// What a fetch ticket asks the location source for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchScope {
    /// All locations nationwide (City tier — bubbles are not scoped to
    /// the viewport).
    Nationwide {
        /// Server-side half of the belt-and-suspenders visibility rule.
        released_only: bool,
    },
    /// Locations within the viewport bounds (Location tier).
    Bounds {
        /// The viewport bounds to scope the fetch to.
        bounds: BoundingBox,
        /// Server-side half of the belt-and-suspenders visibility rule.
        released_only: bool,
    },
}

/// A tagged outbound fetch. The caller executes the described fetch and
/// hands the outcome back to [`MapSession::resolve_fetch`]; only the
/// ticket matching the session's current generation is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    tier: Tier,
    scope: FetchScope,
}

impl FetchTicket {
    /// The tier this fetch serves.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// What to ask the location source for.
    #[must_use]
    pub const fn scope(&self) -> FetchScope {
        self.scope
    }
}

/// Outcome of handing a fetch result back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResolution {
    /// The result was current and has been applied.
    Applied,
    /// A newer viewport superseded this fetch; the result was discarded.
    Stale,
    /// The fetch failed; the previous data is retained and the error is
    /// surfaced on the view.
    Failed,
}

/// An in-flight vote with enough context to roll back.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTicket {
    location_id: String,
    prior_votes: u64,
    delta: VoteDelta,
}

impl VoteTicket {
    /// The location being voted on.
    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// The direction of the vote.
    #[must_use]
    pub const fn delta(&self) -> VoteDelta {
        self.delta
    }
}

/// Outcome of reconciling an optimistic vote.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteResolution {
    /// The collaborator confirmed; the count now matches its answer.
    Reconciled {
        /// The authoritative vote count.
        votes: u64,
    },
    /// The collaborator failed; the optimistic adjustment was undone.
    RolledBack {
        /// The failure, surfaced to the caller rather than swallowed.
        error: SourceError,
    },
}

/// The ordered records for the active tier.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItems {
    /// Ranked city bubbles (City tier).
    Cities(Vec<CityBubble>),
    /// Ranked locations (Location tier).
    Locations(Vec<Location>),
}

impl PageItems {
    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Cities(bubbles) => bubbles.len(),
            Self::Locations(locations) => locations.len(),
        }
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the rendering sink receives: the current page window, counts,
/// and any fetch error state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Active display tier.
    pub tier: Tier,
    /// The currently shown prefix of the ranked list.
    pub items: PageItems,
    /// Number of records shown.
    pub shown: usize,
    /// Total records in the ranked list.
    pub total: usize,
    /// Whether a "Next" control should be offered.
    pub has_more: bool,
    /// The count display line, `"Showing {shown} of {total} locations"`.
    pub counter: String,
    /// Set when the most recent fetch failed; the items shown are the
    /// last successfully fetched data.
    pub error: Option<SourceError>,
}

/// Single-viewer view controller over the engine pipeline.
#[derive(Debug, Clone)]
pub struct MapSession {
    config: EngineConfig,
    gazetteer: Gazetteer,
    policy: VisibilityPolicy,
    role: ViewerRole,
    filter: FilterState,
    viewport: Option<Viewport>,
    generation: u64,
    raw: Vec<Location>,
    ordered: PageItems,
    pager: Pager,
    error: Option<SourceError>,
}

impl MapSession {
    /// Creates a session for a non-admin viewer with default filters.
    #[must_use]
    pub fn new(config: EngineConfig, gazetteer: Gazetteer) -> Self {
        let policy = config.visibility_policy();
        let pager = Pager::new(config.page_size);
        Self {
            config,
            gazetteer,
            policy,
            role: ViewerRole::NonAdmin,
            filter: FilterState::default(),
            viewport: None,
            generation: 0,
            raw: Vec::new(),
            ordered: PageItems::Cities(Vec::new()),
            pager,
            error: None,
        }
    }

    /// Sets the viewer role at construction time.
    #[must_use]
    pub fn with_role(mut self, role: ViewerRole) -> Self {
        self.role = role;
        self
    }

    /// The active tier. City until the first resolved viewport is known;
    /// after that, a pure function of the viewport's zoom, so a first
    /// viewport at zoom ≥ threshold goes straight to Location without a
    /// City flash.
    #[must_use]
    pub fn tier(&self) -> Tier {
        self.viewport.map_or(Tier::City, |viewport| {
            Tier::for_zoom(viewport.zoom, self.config.zoom_threshold)
        })
    }

    /// The current viewer role.
    #[must_use]
    pub const fn role(&self) -> ViewerRole {
        self.role
    }

    /// Applies a viewport change and returns the fetch it requires.
    ///
    /// Supersedes any in-flight fetch: results for previously issued
    /// tickets will be discarded when they resolve.
    pub fn begin_viewport(&mut self, viewport: Viewport) -> FetchTicket {
        self.viewport = Some(viewport);
        self.issue_ticket(viewport)
    }

    /// Hands a fetch outcome back to the session.
    ///
    /// Stale tickets are discarded whether they succeeded or failed — a
    /// superseded fetch is not an error. A current ticket's failure
    /// surfaces as view error state while the last good data is
    /// retained, so the list never flashes empty.
    pub fn resolve_fetch(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<Location>, SourceError>,
    ) -> FetchResolution {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale fetch result (ticket generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return FetchResolution::Stale;
        }

        match outcome {
            Ok(locations) => {
                self.raw = locations;
                self.error = None;
                self.rebuild_and_reset();
                FetchResolution::Applied
            }
            Err(error) => {
                log::error!("Location fetch failed, retaining previous data: {error}");
                self.error = Some(error);
                FetchResolution::Failed
            }
        }
    }

    /// Replaces the admin filter state; resets to the first page.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.rebuild_and_reset();
    }

    /// Switches the viewer role.
    ///
    /// Returns a fetch ticket when a viewport is active, since the
    /// released-only fetch scope differs by role and the cached set must
    /// be refetched to widen or narrow it.
    pub fn set_role(&mut self, role: ViewerRole) -> Option<FetchTicket> {
        if role == self.role {
            return None;
        }
        self.role = role;
        self.rebuild_and_reset();
        self.viewport.map(|viewport| self.issue_ticket(viewport))
    }

    /// Extends the shown window by one page.
    pub fn next_page(&mut self) {
        self.pager.advance();
    }

    /// Begins an optimistic vote on a fetched location.
    ///
    /// The local count is adjusted immediately; pass the collaborator's
    /// answer to [`Self::resolve_vote`] to reconcile or roll back. The
    /// ranked order is recomputed, but the pagination window survives —
    /// voting is not a viewport or filter change.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownLocation`] if the id is not in the
    /// fetched set.
    pub fn begin_vote(&mut self, location_id: &str, delta: VoteDelta) -> Result<VoteTicket, EngineError> {
        let location = self
            .raw
            .iter_mut()
            .find(|location| location.id == location_id)
            .ok_or_else(|| EngineError::UnknownLocation {
                id: location_id.to_string(),
            })?;

        let prior_votes = location.votes;
        location.votes = delta.apply(prior_votes);
        self.rebuild_preserving_window();

        Ok(VoteTicket {
            location_id: location_id.to_string(),
            prior_votes,
            delta,
        })
    }

    /// Reconciles an optimistic vote with the collaborator's outcome.
    ///
    /// On success the location takes the authoritative count; on failure
    /// the count is rolled back to its pre-mutation value and the error
    /// is returned to the caller.
    pub fn resolve_vote(
        &mut self,
        ticket: &VoteTicket,
        outcome: Result<u64, SourceError>,
    ) -> VoteResolution {
        let resolution = match outcome {
            Ok(votes) => {
                if let Some(location) = self.find_mut(&ticket.location_id) {
                    location.votes = votes;
                }
                VoteResolution::Reconciled { votes }
            }
            Err(error) => {
                log::warn!(
                    "Vote on {} failed, rolling back to {}: {error}",
                    ticket.location_id,
                    ticket.prior_votes
                );
                if let Some(location) = self.find_mut(&ticket.location_id) {
                    location.votes = ticket.prior_votes;
                }
                VoteResolution::RolledBack { error }
            }
        };
        self.rebuild_preserving_window();
        resolution
    }

    /// Drives begin → fetch → resolve against a location source.
    ///
    /// Convenience for stateless callers (one request, one session); the
    /// ticket machinery still applies, so interleaved callers sharing a
    /// session keep last-viewport-wins semantics.
    pub async fn refresh<S>(&mut self, source: &S, viewport: Viewport) -> FetchResolution
    where
        S: LocationSource + ?Sized,
    {
        let ticket = self.begin_viewport(viewport);
        let outcome = match ticket.scope() {
            FetchScope::Nationwide { released_only } => source.all_locations(released_only).await,
            FetchScope::Bounds {
                bounds,
                released_only,
            } => source.locations_in_viewport(bounds, released_only).await,
        };
        self.resolve_fetch(&ticket, outcome)
    }

    /// Renders the current page for the rendering sink.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let items = match &self.ordered {
            PageItems::Cities(bubbles) => PageItems::Cities(self.pager.window(bubbles).to_vec()),
            PageItems::Locations(locations) => {
                PageItems::Locations(self.pager.window(locations).to_vec())
            }
        };
        SessionView {
            tier: self.tier(),
            items,
            shown: self.pager.shown(),
            total: self.pager.total(),
            has_more: self.pager.has_more(),
            counter: self.pager.counter(),
            error: self.error.clone(),
        }
    }

    fn issue_ticket(&mut self, viewport: Viewport) -> FetchTicket {
        self.generation += 1;
        let tier = Tier::for_zoom(viewport.zoom, self.config.zoom_threshold);
        let released_only = !self.role.is_admin();
        let scope = match tier {
            Tier::City => FetchScope::Nationwide { released_only },
            Tier::Location => FetchScope::Bounds {
                bounds: viewport.bounds,
                released_only,
            },
        };
        FetchTicket {
            generation: self.generation,
            tier,
            scope,
        }
    }

    fn find_mut(&mut self, location_id: &str) -> Option<&mut Location> {
        self.raw
            .iter_mut()
            .find(|location| location.id == location_id)
    }

    /// Recomputes the filtered, consolidated, ranked list for the active
    /// tier from the cached raw set.
    fn ranked(&self) -> PageItems {
        let visible = visible_locations(&self.raw, self.role, &self.filter, &self.policy);
        match self.tier() {
            Tier::City => {
                let mut bubbles = consolidate(&visible, &self.gazetteer);
                rank_bubbles(&mut bubbles);
                PageItems::Cities(bubbles)
            }
            Tier::Location => {
                let mut locations = visible;
                if let Some(viewport) = self.viewport {
                    rank_locations(&mut locations, viewport.center);
                }
                PageItems::Locations(locations)
            }
        }
    }

    fn rebuild_and_reset(&mut self) {
        self.ordered = self.ranked();
        self.pager.reset(self.ordered.len());
    }

    fn rebuild_preserving_window(&mut self) {
        self.ordered = self.ranked();
        self.pager.set_total(self.ordered.len());
    }
}
