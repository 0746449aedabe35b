#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain types for the site map system.
//!
//! This crate defines the canonical taxonomy shared across the engine and
//! server: candidate site records, their admin-assigned scorecards, size
//! classifications, the review workflow status, viewer roles, and the
//! admin filter state. Derived aggregates ([`CityBubble`]) live here too
//! since both the consolidator and the API surface speak them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_map_geo::Coordinates;
use strum_macros::{AsRefStr, Display, EnumString};

/// Traffic-light score assigned by the admin review workflow.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreColor {
    /// Meets criteria.
    Green,
    /// Minor concerns.
    Yellow,
    /// Notable concerns.
    Amber,
    /// Fails criteria.
    Red,
    /// Not yet reviewed.
    #[default]
    Unscored,
}

impl ScoreColor {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Green,
            Self::Yellow,
            Self::Amber,
            Self::Red,
            Self::Unscored,
        ]
    }
}

/// Scoring categories evaluated for each candidate site.
///
/// The four concrete categories are scored independently; `Overall` is
/// derived from them by the review workflow and is the one consulted by
/// default filters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreCategory {
    /// Surrounding area quality (residential/retail mix, safety).
    Neighborhood,
    /// Zoning and permitting posture.
    Regulatory,
    /// Building suitability (size, layout, outdoor space).
    Building,
    /// Lease or purchase economics.
    Price,
    /// Derived summary across the four concrete categories.
    Overall,
}

impl ScoreCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Neighborhood,
            Self::Regulatory,
            Self::Building,
            Self::Price,
            Self::Overall,
        ]
    }
}

/// A single category's score: its color band and optional numeric value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Traffic-light band.
    pub color: ScoreColor,
    /// Underlying numeric score, when the workflow produced one.
    pub numeric_value: Option<f64>,
}

impl ScoreEntry {
    /// Creates a score entry with a color band and no numeric value.
    #[must_use]
    pub const fn color_only(color: ScoreColor) -> Self {
        Self {
            color,
            numeric_value: None,
        }
    }
}

/// Per-category scores for a candidate site.
///
/// Every category is always present; unreviewed sites carry
/// [`ScoreColor::Unscored`] in all five slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Neighborhood score.
    pub neighborhood: ScoreEntry,
    /// Regulatory score.
    pub regulatory: ScoreEntry,
    /// Building score.
    pub building: ScoreEntry,
    /// Price score.
    pub price: ScoreEntry,
    /// Derived overall score.
    pub overall: ScoreEntry,
}

impl Scorecard {
    /// Returns the entry for a category.
    #[must_use]
    pub const fn entry(&self, category: ScoreCategory) -> ScoreEntry {
        match category {
            ScoreCategory::Neighborhood => self.neighborhood,
            ScoreCategory::Regulatory => self.regulatory,
            ScoreCategory::Building => self.building,
            ScoreCategory::Price => self.price,
            ScoreCategory::Overall => self.overall,
        }
    }
}

/// Size classification assigned by the review workflow.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeClass {
    /// ~25 students; smallest viable footprint.
    Micro,
    /// Second micro tier (~50 students).
    Micro2,
    /// Mid-size campus (~250 students).
    Growth,
    /// Full-scale campus (~1,000 students).
    Flagship,
    /// Rejected on size grounds; hidden by the default size filter.
    RedReject,
    /// Not yet classified.
    #[default]
    Unclassified,
}

impl SizeClass {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Micro,
            Self::Micro2,
            Self::Growth,
            Self::Flagship,
            Self::RedReject,
            Self::Unclassified,
        ]
    }
}

/// Admin review workflow status for a candidate site.
///
/// Only `Active` sites are ever eligible for non-admin display, and then
/// only when the site is also released.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    /// Suggested, awaiting admin review.
    #[default]
    Pending,
    /// Approved by an admin.
    Active,
    /// Rejected by an admin.
    Rejected,
}

impl SiteStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::Active, Self::Rejected]
    }
}

/// Viewer role supplied by the external auth collaborator.
///
/// The engine never authenticates; it only branches on this tag.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewerRole {
    /// Full visibility, filter controls available.
    Admin,
    /// Public viewer; sees released, active sites only.
    #[default]
    NonAdmin,
}

impl ViewerRole {
    /// Whether this role carries admin privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Released-scope selector available to admins.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleasedScope {
    /// Released and unreleased sites.
    #[default]
    All,
    /// Released sites only.
    Released,
    /// Unreleased sites only.
    Unreleased,
}

impl ReleasedScope {
    /// Whether a site with the given released flag falls in this scope.
    #[must_use]
    pub const fn admits(self, released: bool) -> bool {
        match self {
            Self::All => true,
            Self::Released => released,
            Self::Unreleased => !released,
        }
    }
}

/// Admin-only filter controls.
///
/// Color restrictions are keyed by category; a category absent from the
/// map accepts every color. Colors within one category combine with OR,
/// restrictions across categories combine with AND. The default size set
/// accepts everything except [`SizeClass::RedReject`] — that exclusion is
/// a named default, not a hardcoded rule, so a product that wants
/// RedReject sites surfaced can construct a [`FilterState::unrestricted`]
/// state instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Accepted colors per category; absent category = all accepted.
    pub colors: BTreeMap<ScoreCategory, BTreeSet<ScoreColor>>,
    /// Accepted size classes.
    pub sizes: BTreeSet<SizeClass>,
    /// Released-scope selector.
    pub released_scope: ReleasedScope,
}

impl Default for FilterState {
    fn default() -> Self {
        let sizes = SizeClass::all()
            .iter()
            .copied()
            .filter(|size| *size != SizeClass::RedReject)
            .collect();
        Self {
            colors: BTreeMap::new(),
            sizes,
            released_scope: ReleasedScope::All,
        }
    }
}

impl FilterState {
    /// A filter state that admits every color, size, and released scope.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            colors: BTreeMap::new(),
            sizes: SizeClass::all().iter().copied().collect(),
            released_scope: ReleasedScope::All,
        }
    }

    /// Restricts one category to an accepted set of colors.
    pub fn restrict_colors(
        &mut self,
        category: ScoreCategory,
        accepted: impl IntoIterator<Item = ScoreColor>,
    ) {
        self.colors.insert(category, accepted.into_iter().collect());
    }

    /// Whether a color is accepted for a category.
    #[must_use]
    pub fn admits_color(&self, category: ScoreCategory, color: ScoreColor) -> bool {
        self.colors
            .get(&category)
            .is_none_or(|accepted| accepted.contains(&color))
    }

    /// Whether a size class is accepted.
    #[must_use]
    pub fn admits_size(&self, size: SizeClass) -> bool {
        self.sizes.contains(&size)
    }
}

/// A candidate school site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name (e.g. "Downtown Austin Campus").
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// WGS84 coordinates; `None` for ungeocoded or malformed records,
    /// which are excluded from consolidation and distance ranking.
    pub coordinates: Option<Coordinates>,
    /// Community vote count; adjusted only by vote/unvote.
    pub votes: u64,
    /// Whether the site is visible to non-admin viewers.
    #[serde(default)]
    pub released: bool,
    /// Review workflow status.
    #[serde(default)]
    pub status: SiteStatus,
    /// Size classification.
    #[serde(default)]
    pub size_class: SizeClass,
    /// Per-category scores.
    #[serde(default)]
    pub scores: Scorecard,
    /// When the site was suggested.
    pub suggested_at: DateTime<Utc>,
    /// Free-form suggestion notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Location {
    /// Whether this record carries usable coordinates.
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// An aggregated marker representing all visible locations within one
/// metro catchment (or one standalone city).
///
/// Derived, never persisted; recomputed on every viewport or filter
/// change. `location_count` and `total_votes` sum over exactly the
/// locations individually visible to the requesting viewer role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityBubble {
    /// City (metro name for consolidated bubbles).
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Arithmetic mean of constituent coordinates. An approximation valid
    /// at metro scale, not a geodesic mean.
    pub centroid: Coordinates,
    /// Number of constituent visible locations.
    pub location_count: u64,
    /// Sum of constituent visible locations' votes.
    pub total_votes: u64,
}

impl CityBubble {
    /// The display label, `"City, State"`.
    #[must_use]
    pub fn metro_label(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_excludes_only_red_reject() {
        let filter = FilterState::default();
        for size in SizeClass::all() {
            let expected = *size != SizeClass::RedReject;
            assert_eq!(
                filter.admits_size(*size),
                expected,
                "{size:?} admission mismatch"
            );
        }
    }

    #[test]
    fn unrestricted_filter_admits_everything() {
        let filter = FilterState::unrestricted();
        for size in SizeClass::all() {
            assert!(filter.admits_size(*size));
        }
        for category in ScoreCategory::all() {
            for color in ScoreColor::all() {
                assert!(filter.admits_color(*category, *color));
            }
        }
    }

    #[test]
    fn absent_category_admits_all_colors() {
        let filter = FilterState::default();
        assert!(filter.admits_color(ScoreCategory::Overall, ScoreColor::Red));
    }

    #[test]
    fn restricted_category_admits_only_accepted() {
        let mut filter = FilterState::default();
        filter.restrict_colors(
            ScoreCategory::Overall,
            [ScoreColor::Green, ScoreColor::Yellow],
        );
        assert!(filter.admits_color(ScoreCategory::Overall, ScoreColor::Green));
        assert!(!filter.admits_color(ScoreCategory::Overall, ScoreColor::Red));
        // Other categories stay unrestricted.
        assert!(filter.admits_color(ScoreCategory::Price, ScoreColor::Red));
    }

    #[test]
    fn released_scope_admits() {
        assert!(ReleasedScope::All.admits(true));
        assert!(ReleasedScope::All.admits(false));
        assert!(ReleasedScope::Released.admits(true));
        assert!(!ReleasedScope::Released.admits(false));
        assert!(ReleasedScope::Unreleased.admits(false));
        assert!(!ReleasedScope::Unreleased.admits(true));
    }

    #[test]
    fn scorecard_entry_maps_every_category() {
        let card = Scorecard {
            neighborhood: ScoreEntry::color_only(ScoreColor::Green),
            regulatory: ScoreEntry::color_only(ScoreColor::Yellow),
            building: ScoreEntry::color_only(ScoreColor::Amber),
            price: ScoreEntry::color_only(ScoreColor::Red),
            overall: ScoreEntry::color_only(ScoreColor::Yellow),
        };
        assert_eq!(
            card.entry(ScoreCategory::Neighborhood).color,
            ScoreColor::Green
        );
        assert_eq!(card.entry(ScoreCategory::Regulatory).color, ScoreColor::Yellow);
        assert_eq!(card.entry(ScoreCategory::Building).color, ScoreColor::Amber);
        assert_eq!(card.entry(ScoreCategory::Price).color, ScoreColor::Red);
        assert_eq!(card.entry(ScoreCategory::Overall).color, ScoreColor::Yellow);
    }

    #[test]
    fn enums_parse_from_wire_strings() {
        assert_eq!(
            "RED_REJECT".parse::<SizeClass>().unwrap(),
            SizeClass::RedReject
        );
        assert_eq!("GREEN".parse::<ScoreColor>().unwrap(), ScoreColor::Green);
        assert_eq!(
            "NON_ADMIN".parse::<ViewerRole>().unwrap(),
            ViewerRole::NonAdmin
        );
        assert_eq!(
            "UNRELEASED".parse::<ReleasedScope>().unwrap(),
            ReleasedScope::Unreleased
        );
        assert!("NOT_A_SIZE".parse::<SizeClass>().is_err());
    }

    #[test]
    fn metro_label_formats_city_and_state() {
        let bubble = CityBubble {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            centroid: Coordinates::new(30.2672, -97.7431),
            location_count: 3,
            total_votes: 11,
        };
        assert_eq!(bubble.metro_label(), "Austin, TX");
    }
}
