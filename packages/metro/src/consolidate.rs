//! Metro consolidation — folds visible locations into city bubbles.
//!
//! Each location is assigned to the nearest gazetteer metro whose
//! catchment covers it; locations outside every catchment form standalone
//! bubbles keyed by their own city/state. Callers are expected to apply
//! role visibility *before* consolidation so bubble counts never leak
//! locations the viewer cannot see individually.

use std::collections::BTreeMap;

use site_map_geo::Coordinates;
use site_map_site_models::{CityBubble, Location};

use crate::gazetteer::Gazetteer;

/// Running sums for one bubble under construction.
#[derive(Debug, Default)]
struct BubbleAccumulator {
    lat_sum: f64,
    lon_sum: f64,
    location_count: u64,
    total_votes: u64,
}

impl BubbleAccumulator {
    fn add(&mut self, coordinates: Coordinates, votes: u64) {
        self.lat_sum += coordinates.latitude;
        self.lon_sum += coordinates.longitude;
        self.location_count += 1;
        self.total_votes += votes;
    }

    fn centroid(&self) -> Coordinates {
        #[allow(clippy::cast_precision_loss)]
        let count = self.location_count as f64;
        Coordinates::new(self.lat_sum / count, self.lon_sum / count)
    }
}

/// Consolidates locations into one [`CityBubble`] per populated metro or
/// standalone city.
///
/// The centroid is the arithmetic mean of constituent coordinates — each
/// location contributes equally. Locations without coordinates are
/// excluded; a metro with no constituent locations produces no bubble.
#[must_use]
pub fn consolidate(locations: &[Location], gazetteer: &Gazetteer) -> Vec<CityBubble> {
    let mut by_metro: BTreeMap<usize, BubbleAccumulator> = BTreeMap::new();
    let mut standalone: BTreeMap<(String, String), BubbleAccumulator> = BTreeMap::new();

    for location in locations {
        let Some(coordinates) = location.coordinates else {
            log::debug!(
                "Skipping location {} without coordinates during consolidation",
                location.id
            );
            continue;
        };

        if let Some((index, _)) = gazetteer.nearest_within(coordinates) {
            by_metro
                .entry(index)
                .or_default()
                .add(coordinates, location.votes);
        } else {
            standalone
                .entry((location.city.clone(), location.state.clone()))
                .or_default()
                .add(coordinates, location.votes);
        }
    }

    let mut bubbles = Vec::with_capacity(by_metro.len() + standalone.len());

    for (index, acc) in &by_metro {
        let metro = &gazetteer.metros()[*index];
        bubbles.push(CityBubble {
            city: metro.name.clone(),
            state: metro.state.clone(),
            centroid: acc.centroid(),
            location_count: acc.location_count,
            total_votes: acc.total_votes,
        });
    }

    for ((city, state), acc) in &standalone {
        bubbles.push(CityBubble {
            city: city.clone(),
            state: state.clone(),
            centroid: acc.centroid(),
            location_count: acc.location_count,
            total_votes: acc.total_votes,
        });
    }

    bubbles
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use site_map_site_models::{Scorecard, SiteStatus, SizeClass};

    use super::*;

    fn location(id: &str, city: &str, lat: f64, lon: f64, votes: u64) -> Location {
        Location {
            id: id.to_string(),
            name: format!("{city} Site"),
            address: "100 Main St".to_string(),
            city: city.to_string(),
            state: "TX".to_string(),
            coordinates: Some(Coordinates::new(lat, lon)),
            votes,
            released: true,
            status: SiteStatus::Active,
            size_class: SizeClass::Micro,
            scores: Scorecard::default(),
            suggested_at: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn suburbs_fold_into_their_metro() {
        let gazetteer = Gazetteer::us_default();
        let locations = vec![
            location("1", "Austin", 30.266_595, -97.742_91, 5),
            location("2", "Round Rock", 30.508_723, -97.677_449, 3),
            location("3", "Cedar Park", 30.519_457, -97.823_892, 3),
        ];

        let bubbles = consolidate(&locations, &gazetteer);
        assert_eq!(bubbles.len(), 1);
        let austin = &bubbles[0];
        assert_eq!(austin.city, "Austin");
        assert_eq!(austin.state, "TX");
        assert_eq!(austin.location_count, 3);
        assert_eq!(austin.total_votes, 11);
    }

    #[test]
    fn centroid_is_arithmetic_mean_of_constituents() {
        let gazetteer = Gazetteer::us_default();
        let locations = vec![
            location("1", "Austin", 30.2, -97.8, 5),
            location("2", "Austin", 30.4, -97.6, 0),
        ];

        let bubbles = consolidate(&locations, &gazetteer);
        assert_eq!(bubbles.len(), 1);
        let centroid = bubbles[0].centroid;
        assert!((centroid.latitude - 30.3).abs() < 1e-9);
        assert!((centroid.longitude - -97.7).abs() < 1e-9);
    }

    #[test]
    fn separate_metros_stay_separate() {
        let gazetteer = Gazetteer::us_default();
        let locations = vec![
            location("1", "Austin", 30.2672, -97.7431, 11),
            location("2", "Dallas", 32.7767, -96.797, 10),
        ];

        let bubbles = consolidate(&locations, &gazetteer);
        assert_eq!(bubbles.len(), 2);
        let votes: Vec<(String, u64)> = bubbles
            .iter()
            .map(|b| (b.city.clone(), b.total_votes))
            .collect();
        assert!(votes.contains(&("Austin".to_string(), 11)));
        assert!(votes.contains(&("Dallas-Fort Worth".to_string(), 10)));
    }

    #[test]
    fn unmatched_locations_form_standalone_city_bubbles() {
        let gazetteer = Gazetteer::us_default();
        let locations = vec![
            location("1", "Marfa", 30.3095, -104.0204, 2),
            location("2", "Marfa", 30.31, -104.02, 1),
        ];

        let bubbles = consolidate(&locations, &gazetteer);
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].city, "Marfa");
        assert_eq!(bubbles[0].location_count, 2);
        assert_eq!(bubbles[0].total_votes, 3);
    }

    #[test]
    fn locations_without_coordinates_are_excluded() {
        let gazetteer = Gazetteer::us_default();
        let mut missing = location("1", "Austin", 0.0, 0.0, 7);
        missing.coordinates = None;
        let locations = vec![missing, location("2", "Austin", 30.2672, -97.7431, 5)];

        let bubbles = consolidate(&locations, &gazetteer);
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].location_count, 1);
        assert_eq!(bubbles[0].total_votes, 5);
    }

    #[test]
    fn empty_input_produces_no_bubbles() {
        let gazetteer = Gazetteer::us_default();
        assert!(consolidate(&[], &gazetteer).is_empty());
    }
}
