//! Role-aware visibility rules.
//!
//! A pure predicate over (location, role, filter state): deterministic,
//! side-effect free, safe to re-evaluate on every render. Non-admins see
//! active, released locations only and have no filter controls; admins
//! see active locations through their color/size/released-scope filters.

use site_map_site_models::{FilterState, Location, SiteStatus, SizeClass, ViewerRole};

/// Named visibility defaults that are product policy rather than user
/// filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// Hide `RedReject`-sized locations from non-admin viewers. Today's
    /// product ships no size control for non-admins, so this default is
    /// the only size rule they get.
    pub exclude_red_reject_for_public: bool,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            exclude_red_reject_for_public: true,
        }
    }
}

/// Whether a location is visible to a viewer.
///
/// Non-admin: `status == Active && released`, ignoring filter state
/// (subject to the policy's RedReject default). Admin: `status == Active`
/// plus the filter's color restrictions (OR within a category, AND across
/// categories), size set, and released scope.
#[must_use]
pub fn is_visible(
    location: &Location,
    role: ViewerRole,
    filter: &FilterState,
    policy: &VisibilityPolicy,
) -> bool {
    if location.status != SiteStatus::Active {
        return false;
    }

    match role {
        ViewerRole::NonAdmin => {
            location.released
                && !(policy.exclude_red_reject_for_public
                    && location.size_class == SizeClass::RedReject)
        }
        ViewerRole::Admin => {
            filter
                .colors
                .iter()
                .all(|(category, accepted)| accepted.contains(&location.scores.entry(*category).color))
                && filter.admits_size(location.size_class)
                && filter.released_scope.admits(location.released)
        }
    }
}

/// Filters a location set down to those visible to the viewer.
#[must_use]
pub fn visible_locations(
    locations: &[Location],
    role: ViewerRole,
    filter: &FilterState,
    policy: &VisibilityPolicy,
) -> Vec<Location> {
    locations
        .iter()
        .filter(|location| is_visible(location, role, filter, policy))
        .cloned()
        .collect()
}
