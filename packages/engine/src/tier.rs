//! Zoom-tier selection.
//!
//! A pure function of zoom level: below the threshold the map shows
//! nationwide city bubbles, at or above it individual location pins
//! scoped to the viewport. There is no hysteresis band; debouncing rapid
//! zoom oscillation is the rendering client's concern, not a correctness
//! requirement here.

use serde::{Deserialize, Serialize};

/// Display granularity chosen by zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// Consolidated metro/city bubbles, nationwide.
    City,
    /// Individual location pins within the viewport.
    Location,
}

impl Tier {
    /// Selects the tier for a zoom level. The boundary is exact:
    /// `zoom >= threshold` is [`Tier::Location`].
    #[must_use]
    pub fn for_zoom(zoom: f64, threshold: f64) -> Self {
        if zoom < threshold {
            Self::City
        } else {
            Self::Location
        }
    }
}
