#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate and route geometry value types.
//!
//! These types are shared between the geometry engine and everything that
//! consumes its output. They carry no behavior beyond small conversions;
//! the math lives in `ride_route_geometry`.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees, nominally `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, nominally `[-180, 180]`.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite numbers.
    ///
    /// Feeds occasionally produce `NaN` positions; callers use this to skip
    /// such records instead of projecting garbage.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Self {
            x: value.longitude,
            y: value.latitude,
        }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(value: geo::Coord<f64>) -> Self {
        Self::new(value.y, value.x)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(value: Coordinate) -> Self {
        Self::new(value.longitude, value.latitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(value: geo::Point<f64>) -> Self {
        Self::new(value.y(), value.x())
    }
}

/// Cumulative distances along a route polyline.
///
/// `cumulative_miles` is aligned index-for-index with the route's vertices:
/// the first entry is always 0 and the sequence never decreases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Distance in miles from the route start to each vertex.
    pub cumulative_miles: Vec<f64>,
    /// Total route length in miles (the last cumulative value).
    pub total_miles: f64,
}

/// Result of projecting a single point onto a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProjection {
    /// Perpendicular offset from the route in miles. `f64::INFINITY` when
    /// the route has fewer than two vertices.
    pub distance_to_route_miles: f64,
    /// Distance along the route to the projected point, in miles.
    pub route_distance_miles: f64,
    /// Index of the first vertex of the nearest segment.
    pub segment_index: usize,
    /// The closest point on the route.
    pub projected_point: Coordinate,
}

impl RouteProjection {
    /// Whether the projected point lies within `corridor_miles` of the route.
    #[must_use]
    pub fn is_within(&self, corridor_miles: f64) -> bool {
        self.distance_to_route_miles <= corridor_miles
    }
}
