#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geographic primitives shared across the site map system.
//!
//! Coordinates, viewport bounding boxes, and great-circle distance on a
//! spherical Earth approximation. Metro catchments are at most ~50 miles,
//! so the spherical haversine formula is precise enough; no ellipsoidal
//! correction is applied.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles for the spherical approximation.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair from latitude and longitude degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another coordinate in miles.
    ///
    /// Haversine formula on a sphere of radius [`EARTH_RADIUS_MILES`].
    #[must_use]
    pub fn distance_miles(self, other: Self) -> f64 {
        let lat_a = self.latitude.to_radians();
        let lat_b = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_MILES * c
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether a point falls within this box (inclusive edges).
    ///
    /// Boxes are assumed not to cross the antimeridian; US viewports
    /// never do.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }
}

/// An ephemeral, client-held map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the visible map.
    pub center: Coordinates,
    /// Map zoom level.
    pub zoom: f64,
    /// Rectangular extent of the visible map.
    pub bounds: BoundingBox,
}

impl Viewport {
    /// Creates a viewport from its center, zoom level, and bounds.
    #[must_use]
    pub const fn new(center: Coordinates, zoom: f64, bounds: BoundingBox) -> Self {
        Self {
            center,
            zoom,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUSTIN: Coordinates = Coordinates::new(30.2672, -97.7431);
    const DALLAS: Coordinates = Coordinates::new(32.7767, -96.797);
    const ROUND_ROCK: Coordinates = Coordinates::new(30.508_723, -97.677_449);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(AUSTIN.distance_miles(AUSTIN).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = AUSTIN.distance_miles(DALLAS);
        let ba = DALLAS.distance_miles(AUSTIN);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn austin_to_dallas_is_about_182_miles() {
        let dist = AUSTIN.distance_miles(DALLAS);
        assert!(
            (180.0..185.0).contains(&dist),
            "expected ~182 miles, got {dist}"
        );
    }

    #[test]
    fn round_rock_is_within_austin_catchment() {
        let dist = AUSTIN.distance_miles(ROUND_ROCK);
        assert!(dist < 50.0, "Round Rock should be < 50 miles, got {dist}");
    }

    #[test]
    fn bbox_contains_interior_and_edges() {
        let bbox = BoundingBox::new(-98.0, 30.0, -97.0, 31.0);
        assert!(bbox.contains(Coordinates::new(30.5, -97.5)));
        assert!(bbox.contains(Coordinates::new(30.0, -98.0)));
        assert!(!bbox.contains(Coordinates::new(29.999, -97.5)));
        assert!(!bbox.contains(Coordinates::new(30.5, -96.999)));
    }

    #[test]
    fn bbox_center_is_midpoint() {
        let bbox = BoundingBox::new(-98.0, 30.0, -97.0, 31.0);
        let center = bbox.center();
        assert!((center.latitude - 30.5).abs() < f64::EPSILON);
        assert!((center.longitude - -97.5).abs() < f64::EPSILON);
    }
}
