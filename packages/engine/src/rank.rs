//! Display ordering for locations and city bubbles.
//!
//! Votes are the community priority signal and dominate; distance to the
//! viewport center breaks ties so nearby results stay surfaced when votes
//! are equal (the common case for a newly released metro). Ids break the
//! remaining ties so the order is total and stable across recomputes.

use site_map_geo::Coordinates;
use site_map_site_models::{CityBubble, Location};

/// Distance from the viewport center, with missing coordinates sorting
/// last.
fn distance_key(location: &Location, center: Coordinates) -> f64 {
    location
        .coordinates
        .map_or(f64::INFINITY, |coordinates| {
            coordinates.distance_miles(center)
        })
}

/// Orders locations: votes descending, then distance to the viewport
/// center ascending, then id ascending.
pub fn rank_locations(locations: &mut [Location], center: Coordinates) {
    locations.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| distance_key(a, center).total_cmp(&distance_key(b, center)))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Orders city bubbles: total votes descending, then metro label
/// ascending.
pub fn rank_bubbles(bubbles: &mut [CityBubble]) {
    bubbles.sort_by(|a, b| {
        b.total_votes
            .cmp(&a.total_votes)
            .then_with(|| a.metro_label().cmp(&b.metro_label()))
    });
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use site_map_site_models::{Scorecard, SiteStatus, SizeClass};

    use super::*;

    const CENTER: Coordinates = Coordinates::new(30.2672, -97.7431);

    fn location(id: &str, votes: u64, coordinates: Option<Coordinates>) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Site {id}"),
            address: "100 Main St".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            coordinates,
            votes,
            released: true,
            status: SiteStatus::Active,
            size_class: SizeClass::Micro,
            scores: Scorecard::default(),
            suggested_at: Utc::now(),
            notes: None,
        }
    }

    fn bubble(city: &str, state: &str, total_votes: u64) -> CityBubble {
        CityBubble {
            city: city.to_string(),
            state: state.to_string(),
            centroid: CENTER,
            location_count: 1,
            total_votes,
        }
    }

    #[test]
    fn votes_dominate_distance() {
        // The high-vote location is much farther from the center.
        let far = location("far", 9, Some(Coordinates::new(32.7767, -96.797)));
        let near = location("near", 2, Some(CENTER));
        let mut list = vec![near, far];

        rank_locations(&mut list, CENTER);
        assert_eq!(list[0].id, "far");
        assert_eq!(list[1].id, "near");
    }

    #[test]
    fn equal_votes_order_by_distance() {
        let near = location("near", 3, Some(Coordinates::new(30.27, -97.75)));
        let far = location("far", 3, Some(Coordinates::new(30.52, -97.68)));
        let mut list = vec![far.clone(), near.clone()];

        rank_locations(&mut list, CENTER);
        assert_eq!(list[0].id, "near");
        assert_eq!(list[1].id, "far");
    }

    #[test]
    fn missing_coordinates_sort_last_within_a_vote_band() {
        let missing = location("a-missing", 3, None);
        let placed = location("z-placed", 3, Some(CENTER));
        let mut list = vec![missing, placed];

        rank_locations(&mut list, CENTER);
        assert_eq!(list[0].id, "z-placed");
        assert_eq!(list[1].id, "a-missing");
    }

    #[test]
    fn id_breaks_exact_ties() {
        let a = location("a", 3, Some(CENTER));
        let b = location("b", 3, Some(CENTER));
        let mut list = vec![b, a];

        rank_locations(&mut list, CENTER);
        assert_eq!(list[0].id, "a");
        assert_eq!(list[1].id, "b");
    }

    #[test]
    fn ordering_is_total_and_stable_across_recomputes() {
        let mut first = vec![
            location("c", 5, Some(CENTER)),
            location("a", 3, None),
            location("b", 3, Some(Coordinates::new(30.3, -97.7))),
            location("d", 5, Some(Coordinates::new(30.5, -97.6))),
        ];
        let mut second = first.clone();
        second.reverse();

        rank_locations(&mut first, CENTER);
        rank_locations(&mut second, CENTER);
        let first_ids: Vec<&str> = first.iter().map(|l| l.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn bubbles_order_by_votes_then_label() {
        let mut bubbles = vec![
            bubble("Dallas-Fort Worth", "TX", 10),
            bubble("Austin", "TX", 11),
            bubble("Boston", "MA", 10),
        ];

        rank_bubbles(&mut bubbles);
        assert_eq!(bubbles[0].city, "Austin");
        // 10-vote tie: "Boston, MA" sorts before "Dallas-Fort Worth, TX".
        assert_eq!(bubbles[1].city, "Boston");
        assert_eq!(bubbles[2].city, "Dallas-Fort Worth");
    }
}
