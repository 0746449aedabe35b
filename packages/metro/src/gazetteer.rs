//! Metro gazetteer — a fixed lookup table of named metro centers.
//!
//! The US gazetteer TOML is baked into the binary at compile time via
//! [`include_str!`], following the same embedded-config pattern as the
//! rest of the system. Swapping the metro list is a data change, not a
//! code change.

use serde::Deserialize;
use site_map_geo::Coordinates;

/// Catchment radius applied to gazetteer entries without an explicit
/// override. 50 miles folds typical suburbs (Round Rock, Cedar Park)
/// into their metro (Austin).
pub const DEFAULT_CATCHMENT_RADIUS_MILES: f64 = 50.0;

/// The default US gazetteer, embedded at compile time.
const US_METROS_TOML: &str = include_str!("../gazetteer/us_metros.toml");

/// Number of metros in the embedded US gazetteer (used in tests).
#[cfg(test)]
const EXPECTED_METRO_COUNT: usize = 83;

/// A named metro center with its catchment radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Metro {
    /// Metro name (e.g. `"Austin"`).
    pub name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Center point.
    pub center: Coordinates,
    /// Catchment radius in miles.
    pub radius_miles: f64,
}

/// On-disk shape of a gazetteer TOML document.
#[derive(Debug, Deserialize)]
struct GazetteerDoc {
    /// Radius applied to entries without their own `radius_miles`.
    default_radius_miles: Option<f64>,
    metros: Vec<MetroDoc>,
}

/// On-disk shape of a single gazetteer entry.
#[derive(Debug, Deserialize)]
struct MetroDoc {
    name: String,
    state: String,
    latitude: f64,
    longitude: f64,
    radius_miles: Option<f64>,
}

/// An ordered list of metro centers.
///
/// Order matters: when a point is equidistant from two in-radius centers,
/// the earlier entry wins, keeping assignment deterministic.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    metros: Vec<Metro>,
}

impl Gazetteer {
    /// Builds the default US gazetteer from the embedded TOML.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time guarantee,
    /// since the config is baked into the binary and covered by tests).
    #[must_use]
    pub fn us_default() -> Self {
        parse_gazetteer_toml(US_METROS_TOML, DEFAULT_CATCHMENT_RADIUS_MILES)
            .unwrap_or_else(|e| panic!("Failed to parse embedded us_metros.toml: {e}"))
    }

    /// Builds a gazetteer from an explicit metro list.
    #[must_use]
    pub const fn new(metros: Vec<Metro>) -> Self {
        Self { metros }
    }

    /// The metro entries, in gazetteer order.
    #[must_use]
    pub fn metros(&self) -> &[Metro] {
        &self.metros
    }

    /// Finds the nearest metro whose catchment contains the point.
    ///
    /// Scans in gazetteer order with a strict `<` comparison, so ties go
    /// to the lower-index entry. Returns `None` when no catchment covers
    /// the point.
    #[must_use]
    pub fn nearest_within(&self, point: Coordinates) -> Option<(usize, &Metro)> {
        let mut best: Option<(usize, &Metro, f64)> = None;

        for (index, metro) in self.metros.iter().enumerate() {
            let dist = point.distance_miles(metro.center);
            if dist > metro.radius_miles {
                continue;
            }
            match best {
                Some((_, _, best_dist)) if dist >= best_dist => {}
                _ => best = Some((index, metro, dist)),
            }
        }

        best.map(|(index, metro, _)| (index, metro))
    }
}

/// Parses a gazetteer TOML document.
///
/// Entries without their own `radius_miles` use the document's
/// `default_radius_miles`, falling back to `fallback_radius_miles`.
///
/// # Errors
///
/// Returns an error string if the TOML is malformed or an entry carries a
/// non-positive radius.
pub fn parse_gazetteer_toml(
    toml_str: &str,
    fallback_radius_miles: f64,
) -> Result<Gazetteer, String> {
    let doc: GazetteerDoc = toml::from_str(toml_str).map_err(|e| e.to_string())?;
    let default_radius = doc.default_radius_miles.unwrap_or(fallback_radius_miles);

    let metros = doc
        .metros
        .into_iter()
        .map(|entry| {
            let radius_miles = entry.radius_miles.unwrap_or(default_radius);
            if radius_miles <= 0.0 {
                return Err(format!(
                    "metro {}, {} has non-positive radius {radius_miles}",
                    entry.name, entry.state
                ));
            }
            Ok(Metro {
                name: entry.name,
                state: entry.state,
                center: Coordinates::new(entry.latitude, entry.longitude),
                radius_miles,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(Gazetteer { metros })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_us_gazetteer() {
        let gazetteer = Gazetteer::us_default();
        assert_eq!(gazetteer.metros().len(), EXPECTED_METRO_COUNT);
    }

    #[test]
    fn metro_names_are_unique_per_state() {
        let gazetteer = Gazetteer::us_default();
        let mut keys: Vec<String> = gazetteer
            .metros()
            .iter()
            .map(|m| format!("{}|{}", m.name, m.state))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), EXPECTED_METRO_COUNT);
    }

    #[test]
    fn all_radii_are_positive() {
        for metro in Gazetteer::us_default().metros() {
            assert!(
                metro.radius_miles > 0.0,
                "{}, {} has radius {}",
                metro.name,
                metro.state,
                metro.radius_miles
            );
        }
    }

    #[test]
    fn round_rock_resolves_to_austin() {
        let gazetteer = Gazetteer::us_default();
        let round_rock = Coordinates::new(30.508_723, -97.677_449);
        let (_, metro) = gazetteer.nearest_within(round_rock).unwrap();
        assert_eq!(metro.name, "Austin");
        assert_eq!(metro.state, "TX");
    }

    #[test]
    fn remote_point_matches_no_metro() {
        let gazetteer = Gazetteer::us_default();
        // Marfa, TX — far west Texas, no metro within 50 miles.
        assert!(
            gazetteer
                .nearest_within(Coordinates::new(30.3095, -104.0204))
                .is_none()
        );
    }

    #[test]
    fn equidistant_tie_goes_to_lower_index() {
        let a = Metro {
            name: "First".to_string(),
            state: "TX".to_string(),
            center: Coordinates::new(30.0, -98.0),
            radius_miles: 50.0,
        };
        let b = Metro {
            name: "Second".to_string(),
            state: "TX".to_string(),
            center: Coordinates::new(30.0, -96.0),
            radius_miles: 50.0,
        };
        let gazetteer = Gazetteer::new(vec![a, b]);
        // Exactly halfway between the two centers.
        let (index, metro) = gazetteer
            .nearest_within(Coordinates::new(30.0, -97.0))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(metro.name, "First");
    }

    #[test]
    fn per_entry_radius_override_is_honored() {
        let toml_str = r#"
            default_radius_miles = 50.0

            [[metros]]
            name = "Tight"
            state = "TX"
            latitude = 30.0
            longitude = -98.0
            radius_miles = 5.0
        "#;
        let gazetteer = parse_gazetteer_toml(toml_str, 50.0).unwrap();
        // ~14 miles east of the center: inside a 50 mile default, outside
        // the 5 mile override.
        let point = Coordinates::new(30.0, -97.75);
        assert!(gazetteer.nearest_within(point).is_none());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let toml_str = r#"
            [[metros]]
            name = "Broken"
            state = "TX"
            latitude = 30.0
            longitude = -98.0
            radius_miles = 0.0
        "#;
        assert!(parse_gazetteer_toml(toml_str, 50.0).is_err());
    }
}
