#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the site map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types in `site_map_site_models` to allow independent
//! evolution of the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_map_engine::session::{PageItems, SessionView};
use site_map_engine::tier::Tier;
use site_map_site_models::{
    CityBubble, Location, ScoreColor, ScoreEntry, Scorecard, SiteStatus, SizeClass,
};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A single category score as returned by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScoreEntry {
    /// Traffic-light band.
    pub color: ScoreColor,
    /// Underlying numeric score, when available.
    pub numeric_value: Option<f64>,
}

impl From<ScoreEntry> for ApiScoreEntry {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            color: entry.color,
            numeric_value: entry.numeric_value,
        }
    }
}

/// Per-category scores as returned by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScorecard {
    /// Neighborhood score.
    pub neighborhood: ApiScoreEntry,
    /// Regulatory score.
    pub regulatory: ApiScoreEntry,
    /// Building score.
    pub building: ApiScoreEntry,
    /// Price score.
    pub price: ApiScoreEntry,
    /// Derived overall score.
    pub overall: ApiScoreEntry,
}

impl From<Scorecard> for ApiScorecard {
    fn from(scores: Scorecard) -> Self {
        Self {
            neighborhood: scores.neighborhood.into(),
            regulatory: scores.regulatory.into(),
            building: scores.building.into(),
            price: scores.price.into(),
            overall: scores.overall.into(),
        }
    }
}

/// A candidate site as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    /// Unique location ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State abbreviation.
    pub state: String,
    /// Latitude, when the site is geocoded.
    pub latitude: Option<f64>,
    /// Longitude, when the site is geocoded.
    pub longitude: Option<f64>,
    /// Community vote count.
    pub votes: u64,
    /// Whether the site is released to non-admin viewers.
    pub released: bool,
    /// Review workflow status.
    pub status: SiteStatus,
    /// Size classification.
    pub size_class: SizeClass,
    /// Per-category scores.
    pub scores: ApiScorecard,
    /// When the site was suggested (ISO 8601).
    pub suggested_at: DateTime<Utc>,
    /// Free-form suggestion notes.
    pub notes: Option<String>,
}

impl From<Location> for ApiLocation {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            address: location.address,
            city: location.city,
            state: location.state,
            latitude: location.coordinates.map(|c| c.latitude),
            longitude: location.coordinates.map(|c| c.longitude),
            votes: location.votes,
            released: location.released,
            status: location.status,
            size_class: location.size_class,
            scores: location.scores.into(),
            suggested_at: location.suggested_at,
            notes: location.notes,
        }
    }
}

/// A consolidated city bubble as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCityBubble {
    /// City (metro name for consolidated bubbles).
    pub city: String,
    /// State abbreviation.
    pub state: String,
    /// Display label, `"City, State"`.
    pub metro_label: String,
    /// Centroid latitude.
    pub latitude: f64,
    /// Centroid longitude.
    pub longitude: f64,
    /// Number of constituent visible locations.
    pub location_count: u64,
    /// Sum of constituent visible locations' votes.
    pub total_votes: u64,
}

impl From<CityBubble> for ApiCityBubble {
    fn from(bubble: CityBubble) -> Self {
        let metro_label = bubble.metro_label();
        Self {
            city: bubble.city,
            state: bubble.state,
            metro_label,
            latitude: bubble.centroid.latitude,
            longitude: bubble.centroid.longitude,
            location_count: bubble.location_count,
            total_votes: bubble.total_votes,
        }
    }
}

/// Query parameters for the view endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQueryParams {
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
    /// Current map zoom level.
    pub zoom: Option<f64>,
    /// Viewport center latitude.
    pub lat: Option<f64>,
    /// Viewport center longitude.
    pub lng: Option<f64>,
    /// Number of pages to show (1 = first page, each increment is one
    /// "Next" press).
    pub pages: Option<u32>,
    /// Viewer role as supplied by the upstream auth collaborator.
    pub role: Option<String>,
    /// Comma-separated accepted colors for the Neighborhood category.
    pub neighborhood_colors: Option<String>,
    /// Comma-separated accepted colors for the Regulatory category.
    pub regulatory_colors: Option<String>,
    /// Comma-separated accepted colors for the Building category.
    pub building_colors: Option<String>,
    /// Comma-separated accepted colors for the Price category.
    pub price_colors: Option<String>,
    /// Comma-separated accepted colors for the Overall category.
    pub overall_colors: Option<String>,
    /// Comma-separated accepted size classes.
    pub sizes: Option<String>,
    /// Released scope selector (`ALL`, `RELEASED`, `UNRELEASED`).
    pub released_scope: Option<String>,
}

/// Response from the view endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiViewResponse {
    /// Active display tier.
    pub tier: Tier,
    /// Ranked city bubbles (City tier only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<Vec<ApiCityBubble>>,
    /// Ranked locations (Location tier only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ApiLocation>>,
    /// Number of records shown.
    pub shown: usize,
    /// Total records matching the query.
    pub total: usize,
    /// Whether a "Next" control should be offered.
    pub has_more: bool,
    /// The count display line.
    pub counter: String,
    /// Set when the most recent fetch failed and stale data is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SessionView> for ApiViewResponse {
    fn from(view: SessionView) -> Self {
        let error = view.error.map(|e| e.to_string());
        let (cities, locations) = match view.items {
            PageItems::Cities(bubbles) => (
                Some(bubbles.into_iter().map(ApiCityBubble::from).collect()),
                None,
            ),
            PageItems::Locations(records) => (
                None,
                Some(records.into_iter().map(ApiLocation::from).collect()),
            ),
        };
        Self {
            tier: view.tier,
            cities,
            locations,
            shown: view.shown,
            total: view.total,
            has_more: view.has_more,
            counter: view.counter,
            error,
        }
    }
}

/// Query parameters for the cities endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesQueryParams {
    /// Viewer role as supplied by the upstream auth collaborator.
    pub role: Option<String>,
}

/// Query parameters for the locations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsQueryParams {
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
    /// Viewer role as supplied by the upstream auth collaborator.
    pub role: Option<String>,
    /// Comma-separated accepted colors for the Neighborhood category.
    pub neighborhood_colors: Option<String>,
    /// Comma-separated accepted colors for the Regulatory category.
    pub regulatory_colors: Option<String>,
    /// Comma-separated accepted colors for the Building category.
    pub building_colors: Option<String>,
    /// Comma-separated accepted colors for the Price category.
    pub price_colors: Option<String>,
    /// Comma-separated accepted colors for the Overall category.
    pub overall_colors: Option<String>,
    /// Comma-separated accepted size classes.
    pub sizes: Option<String>,
    /// Released scope selector (`ALL`, `RELEASED`, `UNRELEASED`).
    pub released_scope: Option<String>,
}

/// Shared admin filter fields used by both the view and locations
/// queries.
#[derive(Debug, Clone)]
pub struct ColorFilterParams {
    /// Comma-separated accepted colors for the Neighborhood category.
    pub neighborhood_colors: Option<String>,
    /// Comma-separated accepted colors for the Regulatory category.
    pub regulatory_colors: Option<String>,
    /// Comma-separated accepted colors for the Building category.
    pub building_colors: Option<String>,
    /// Comma-separated accepted colors for the Price category.
    pub price_colors: Option<String>,
    /// Comma-separated accepted colors for the Overall category.
    pub overall_colors: Option<String>,
    /// Comma-separated accepted size classes.
    pub sizes: Option<String>,
    /// Released scope selector.
    pub released_scope: Option<String>,
}

impl From<&ViewQueryParams> for ColorFilterParams {
    fn from(p: &ViewQueryParams) -> Self {
        Self {
            neighborhood_colors: p.neighborhood_colors.clone(),
            regulatory_colors: p.regulatory_colors.clone(),
            building_colors: p.building_colors.clone(),
            price_colors: p.price_colors.clone(),
            overall_colors: p.overall_colors.clone(),
            sizes: p.sizes.clone(),
            released_scope: p.released_scope.clone(),
        }
    }
}

impl From<&LocationsQueryParams> for ColorFilterParams {
    fn from(p: &LocationsQueryParams) -> Self {
        Self {
            neighborhood_colors: p.neighborhood_colors.clone(),
            regulatory_colors: p.regulatory_colors.clone(),
            building_colors: p.building_colors.clone(),
            price_colors: p.price_colors.clone(),
            overall_colors: p.overall_colors.clone(),
            sizes: p.sizes.clone(),
            released_scope: p.released_scope.clone(),
        }
    }
}

/// Request body for suggesting a new site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestLocationRequest {
    /// Optional display name; defaults to `"Suggested: {address}"`.
    pub name: Option<String>,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Latitude from the address autocomplete, when available.
    pub lat: Option<f64>,
    /// Longitude from the address autocomplete, when available.
    pub lng: Option<f64>,
    /// Free-form notes from the suggester.
    pub notes: Option<String>,
}

/// Request body for casting or retracting a vote.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// `+1` to vote, `-1` to unvote.
    pub delta: i8,
    /// Optional comment attached to the vote.
    pub comment: Option<String>,
}

/// Response after a vote mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    /// The authoritative new vote count.
    pub votes: u64,
}

/// Request body for the release toggle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    /// New released flag.
    pub released: bool,
}
