//! Engine configuration.
//!
//! Override-able constants with product defaults; no dynamic
//! reconfiguration. Loadable from TOML so deployments can tune page size,
//! catchment radius, and the zoom threshold without a code change.

use serde::{Deserialize, Serialize};

use crate::visibility::VisibilityPolicy;

/// Tunable engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Results per page.
    pub page_size: usize,
    /// Fallback metro catchment radius in miles, applied when a gazetteer
    /// document does not declare its own default.
    pub metro_radius_miles: f64,
    /// Zoom level at which the display switches from city bubbles to
    /// individual locations.
    pub zoom_threshold: f64,
    /// Whether non-admin viewers see `RedReject`-sized locations. The
    /// current product ships no size control for non-admins, so their
    /// view applies this named default rather than a filter state.
    pub exclude_red_reject_for_public: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            metro_radius_miles: 50.0,
            zoom_threshold: 9.0,
            exclude_red_reject_for_public: true,
        }
    }
}

impl EngineConfig {
    /// Parses a config from a TOML document; absent keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| e.to_string())
    }

    /// The visibility policy implied by this config.
    #[must_use]
    pub const fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            exclude_red_reject_for_public: self.exclude_red_reject_for_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, 25);
        assert!((config.metro_radius_miles - 50.0).abs() < f64::EPSILON);
        assert!((config.zoom_threshold - 9.0).abs() < f64::EPSILON);
        assert!(config.exclude_red_reject_for_public);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("page_size = 10").unwrap();
        assert_eq!(config.page_size, 10);
        assert!((config.zoom_threshold - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(EngineConfig::from_toml("page_size = \"lots\"").is_err());
    }
}
